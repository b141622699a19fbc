use identity::{IdentityClient, IdentityConfig, IdentityError};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> IdentityClient {
    IdentityClient::new(IdentityConfig::new("proj-1").with_endpoint(server.uri())).unwrap()
}

#[tokio::test]
async fn login_returns_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/account/sessions/email"))
        .and(header("X-Appwrite-Project", "proj-1"))
        .and(body_partial_json(serde_json::json!({
            "email": "agent@example.com"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "$id": "sess-1",
            "userId": "user-1",
            "secret": "s3cret"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let session = client.login("agent@example.com", "hunter22").await.unwrap();
    assert_eq!(session.user_id, "user-1");
    assert_eq!(session.secret, "s3cret");
}

#[tokio::test]
async fn bad_credentials_are_not_a_connectivity_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/account/sessions/email"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "message": "Invalid credentials"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.login("agent@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, IdentityError::InvalidCredentials));
}

#[tokio::test]
async fn register_creates_account_then_logs_in() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/account"))
        .and(body_partial_json(serde_json::json!({
            "email": "new@example.com",
            "name": "New Agent"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "$id": "user-9",
            "name": "New Agent",
            "email": "new@example.com"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/account/sessions/email"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "$id": "sess-9",
            "userId": "user-9",
            "secret": "fresh"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let session = client
        .register("new@example.com", "hunter22", "New Agent")
        .await
        .unwrap();
    assert_eq!(session.user_id, "user-9");
}

#[tokio::test]
async fn missing_session_is_none_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/account"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert_eq!(client.current_user("stale").await.unwrap(), None);
}

#[tokio::test]
async fn current_user_parses_the_account() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/account"))
        .and(header("X-Appwrite-Session", "s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "$id": "user-1",
            "name": "Agent",
            "email": "agent@example.com"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let user = client.current_user("s3cret").await.unwrap().unwrap();
    assert_eq!(user.email, "agent@example.com");
}

#[tokio::test]
async fn unreachable_endpoint_maps_to_connectivity() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = IdentityClient::new(IdentityConfig::new("proj-1").with_endpoint(uri)).unwrap();
    let err = client.login("agent@example.com", "pw").await.unwrap_err();
    assert!(matches!(err, IdentityError::Connectivity { .. }));
}
