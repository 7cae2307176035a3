use cloud_upload::{ApiError, BackendApi, HttpApi};
use serde_json::{json, Value};
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

#[tokio::test]
async fn posts_action_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/files"))
        .and(header("authorization", "Bearer secret-token"))
        .and(body_json(json!({ "action": "create", "body": { "dir": "docs" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "date": "2024-01-01", "uuid": "abc123"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpApi::new(
        format!("{}/api/files", server.uri()),
        Some("secret-token".to_string()),
    )
    .unwrap();
    let response = api.post("create", json!({ "dir": "docs" })).await.unwrap();

    assert_eq!(response["uuid"], "abc123");
}

#[tokio::test]
async fn empty_body_is_null() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let api = HttpApi::new(server.uri(), None).unwrap();
    let response = api.post("update", json!({})).await.unwrap();

    assert_eq!(response, Value::Null);
}

#[tokio::test]
async fn error_envelope_becomes_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "kind": "authn", "message": "Unauthenticated" }
        })))
        .mount(&server)
        .await;

    let api = HttpApi::new(server.uri(), None).unwrap();
    let err = api
        .post("getStsCredential", json!({ "region": "r", "bucket": "b" }))
        .await
        .unwrap_err();

    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "authn: Unauthenticated");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn plain_error_body_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database is down"))
        .mount(&server)
        .await;

    let api = HttpApi::new(server.uri(), None).unwrap();
    let err = api.post("create", json!({ "dir": "" })).await.unwrap_err();

    assert!(matches!(
        err,
        ApiError::Status { status: 500, ref message } if message == "database is down"
    ));
}
