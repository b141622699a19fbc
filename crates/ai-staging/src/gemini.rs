/// Gemini image-generation backend
///
/// Wraps the two remote operations (stage, refine) of the Generative
/// Language API and normalizes its response/error shape into the workflow's
/// vocabulary. Both operations are single-shot: retry policy belongs to the
/// caller, and a failed call surfaces immediately.
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use staging::{GenerationError, ImageData, StagingGenerator, StyleOption};
use tracing::{debug, warn};

use crate::prompt::{self, StagingRequest};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Mime assumed for returned images when the service omits one.
const RESPONSE_FALLBACK_MIME: &str = "image/png";

/// Client configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// With a custom endpoint (also how tests point at a mock server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// With a different model id.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// With an upper-bound request timeout in seconds.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Gemini generation client.
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::Other(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Send one generateContent call and extract the first inline image of
    /// the response.
    async fn generate_content(&self, request: &StagingRequest) -> Result<ImageData, GenerationError> {
        // Image first: for editing/transformation the image provides the
        // context the directive refers to.
        let body = json!({
            "contents": [{
                "parts": [
                    {
                        "inline_data": {
                            "mime_type": request.image.mime(),
                            "data": request.image.payload(),
                        }
                    },
                    { "text": request.directive }
                ]
            }],
            "system_instruction": {
                "parts": [{ "text": request.persona }]
            }
        });

        debug!(model = %self.config.model, "sending generateContent request");
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(translate_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(%status, "generateContent returned an error: {detail}");
            return Err(GenerationError::Service {
                status: status.as_u16(),
                detail,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Other(e.to_string()))?;

        first_inline_image(&parsed).ok_or(GenerationError::NoImageReturned)
    }
}

#[async_trait]
impl StagingGenerator for GeminiClient {
    async fn stage(
        &self,
        image: &ImageData,
        style: &StyleOption,
        guidelines: &str,
    ) -> Result<ImageData, GenerationError> {
        let request = prompt::stage_request(image, style, guidelines);
        self.generate_content(&request).await
    }

    async fn refine(
        &self,
        image: &ImageData,
        instructions: &str,
    ) -> Result<ImageData, GenerationError> {
        let request = prompt::refine_request(image, instructions);
        self.generate_content(&request).await
    }
}

fn translate_transport_error(err: reqwest::Error) -> GenerationError {
    if err.is_connect() || err.is_timeout() {
        GenerationError::Connectivity {
            detail: err.to_string(),
        }
    } else {
        GenerationError::Other(err.to_string())
    }
}

/// Scan candidate parts for the first inline image payload and re-encode it
/// as a self-describing image. A response with no image part means the
/// collaborator did not follow instructions.
fn first_inline_image(response: &GenerateContentResponse) -> Option<ImageData> {
    for candidate in &response.candidates {
        let Some(content) = &candidate.content else {
            continue;
        };
        for part in &content.parts {
            if let Some(inline) = &part.inline_data {
                let mime = inline
                    .mime_type
                    .clone()
                    .unwrap_or_else(|| RESPONSE_FALLBACK_MIME.to_string());
                return Some(ImageData::new(mime, inline.data.clone()));
            }
        }
    }
    None
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    inline_data: Option<InlineData>,
    #[allow(dead_code)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: Option<String>,
    data: String,
}
