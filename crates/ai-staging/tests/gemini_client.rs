use ai_staging::{GeminiClient, GeminiConfig};
use staging::{catalog, GenerationError, ImageData, StagingGenerator};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash-image:generateContent";

fn source_image() -> ImageData {
    ImageData::new("image/jpeg", "b3JpZ2luYWw=")
}

async fn client_for(server: &MockServer) -> GeminiClient {
    GeminiClient::new(GeminiConfig::new("test-key").with_base_url(server.uri())).unwrap()
}

#[tokio::test]
async fn stage_returns_first_inline_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_string_contains("[CONFIGURATION]"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Staged as requested." },
                        { "inlineData": { "mimeType": "image/png", "data": "c3RhZ2Vk" } }
                    ]
                }
            }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let style = catalog().by_id("interior-scandi-clean").unwrap();
    let result = client.stage(&source_image(), style, "").await.unwrap();

    assert_eq!(result.mime(), "image/png");
    assert_eq!(result.payload(), "c3RhZ2Vk");
}

#[tokio::test]
async fn text_only_response_is_a_contract_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{
                "content": { "parts": [ { "text": "A lovely room with a sofa." } ] }
            }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let style = catalog().by_id("exterior-sunny-day").unwrap();
    let err = client
        .stage(&source_image(), style, "")
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::NoImageReturned));
    assert!(err.to_string().contains("returned text instead of an image"));
}

#[tokio::test]
async fn service_errors_carry_the_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let style = catalog().by_id("exterior-sunny-day").unwrap();
    let err = client
        .stage(&source_image(), style, "")
        .await
        .unwrap_err();

    match err {
        GenerationError::Service { status, .. } => assert_eq!(status, 500),
        other => panic!("expected service error, got {other:?}"),
    }
}

#[tokio::test]
async fn refine_sends_the_edit_template() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_string_contains("adjustment instructions"))
        .and(body_string_contains("make the sofa blue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [ { "inlineData": { "mimeType": "image/png", "data": "cmVmaW5lZA==" } } ]
                }
            }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client
        .refine(&source_image(), "make the sofa blue")
        .await
        .unwrap();

    assert_eq!(result.payload(), "cmVmaW5lZA==");
}

#[tokio::test]
async fn connection_failure_maps_to_connectivity() {
    // Point at a server that was shut down so the connection is refused.
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = GeminiClient::new(GeminiConfig::new("test-key").with_base_url(uri)).unwrap();
    let style = catalog().by_id("exterior-sunny-day").unwrap();
    let err = client
        .stage(&source_image(), style, "")
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Connectivity { .. }));
}
