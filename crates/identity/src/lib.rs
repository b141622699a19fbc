/// Hosted identity client
///
/// Thin wrapper over an Appwrite-style account API: register, login, current
/// session, logout. Transport failures are surfaced as a distinguished
/// connectivity error with a configuration-oriented hint, never conflated
/// with bad credentials.
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

const DEFAULT_ENDPOINT: &str = "https://cloud.appwrite.io/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Connection failed. Please ensure this app's domain is registered as a platform in the identity project settings and the endpoint is reachable.")]
    Connectivity { detail: String },
    #[error("Authentication failed. Please check your credentials.")]
    InvalidCredentials,
    #[error("Identity service error (status {status}): {message}")]
    Service { status: u16, message: String },
    #[error("Identity request failed: {0}")]
    Other(String),
}

/// The signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "$id")]
    pub id: String,
    pub name: String,
    pub email: String,
}

/// An authenticated session. The secret authenticates follow-up calls and is
/// held by the caller (the CLI keeps it under the app data dir).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub secret: String,
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub endpoint: String,
    pub project_id: String,
    pub timeout_secs: u64,
}

impl IdentityConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            project_id: project_id.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// With a custom endpoint (also how tests point at a mock server).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

pub struct IdentityClient {
    config: IdentityConfig,
    client: reqwest::Client,
}

impl IdentityClient {
    pub fn new(config: IdentityConfig) -> Result<Self, IdentityError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| IdentityError::Other(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoint.trim_end_matches('/'), path)
    }

    fn base_request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("X-Appwrite-Project", &self.config.project_id)
            .header("Content-Type", "application/json")
    }

    /// Create an account, then log straight in with the new credentials.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Session, IdentityError> {
        let response = self
            .base_request(self.client.post(self.url("/account")))
            .json(&json!({
                "userId": "unique()",
                "email": email,
                "password": password,
                "name": name,
            }))
            .send()
            .await
            .map_err(translate_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(%status, "account creation failed");
            return Err(IdentityError::Service {
                status: status.as_u16(),
                message,
            });
        }

        self.login(email, password).await
    }

    /// Exchange credentials for a session.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        let response = self
            .base_request(self.client.post(self.url("/account/sessions/email")))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(translate_transport_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(IdentityError::InvalidCredentials);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IdentityError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let session: Session = response
            .json()
            .await
            .map_err(|e| IdentityError::Other(e.to_string()))?;
        debug!(user = %session.user_id, "session established");
        Ok(session)
    }

    /// The account behind a session secret; `None` when the session is
    /// missing or expired rather than an error.
    pub async fn current_user(&self, secret: &str) -> Result<Option<User>, IdentityError> {
        let response = self
            .base_request(self.client.get(self.url("/account")))
            .header("X-Appwrite-Session", secret)
            .send()
            .await
            .map_err(translate_transport_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IdentityError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let user: User = response
            .json()
            .await
            .map_err(|e| IdentityError::Other(e.to_string()))?;
        Ok(Some(user))
    }

    /// Tear down the current session.
    pub async fn logout(&self, secret: &str) -> Result<(), IdentityError> {
        let response = self
            .base_request(
                self.client
                    .delete(self.url("/account/sessions/current")),
            )
            .header("X-Appwrite-Session", secret)
            .send()
            .await
            .map_err(translate_transport_error)?;

        let status = response.status();
        if !status.is_success() && status != reqwest::StatusCode::UNAUTHORIZED {
            let message = response.text().await.unwrap_or_default();
            return Err(IdentityError::Service {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}

fn translate_transport_error(err: reqwest::Error) -> IdentityError {
    if err.is_connect() || err.is_timeout() {
        IdentityError::Connectivity {
            detail: err.to_string(),
        }
    } else {
        IdentityError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_parses_appwrite_shape() {
        let raw = serde_json::json!({
            "$id": "sess-1",
            "userId": "user-1",
            "secret": "s3cret",
            "provider": "email"
        });
        let session: Session = serde_json::from_value(raw).unwrap();
        assert_eq!(session.id, "sess-1");
        assert_eq!(session.user_id, "user-1");
        assert_eq!(session.secret, "s3cret");
    }

    #[test]
    fn test_connectivity_message_carries_configuration_hint() {
        let err = IdentityError::Connectivity {
            detail: "dns failure".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("registered as a platform"));
        assert!(!message.contains("credentials"));
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = IdentityConfig::new("proj").with_endpoint("http://localhost:7777/");
        let client = IdentityClient::new(config).unwrap();
        assert_eq!(client.url("/account"), "http://localhost:7777/account");
    }
}
