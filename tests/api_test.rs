use axum::http::StatusCode;
use axum_test::TestServer;
use news_veracity::{
    app::{ComponentRegistry, build_router},
    artifacts::ModelArtifacts,
    config::Config,
};
use serde_json::{Value, json};

const SAMPLE_MODEL: &str = include_str!("../resources/sample_model.json");

fn test_server() -> TestServer {
    let artifacts = ModelArtifacts::from_json_str(SAMPLE_MODEL).expect("sample model loads");
    let config = Config::with_model_path("sample_model.json");
    let registry = ComponentRegistry::with_artifacts(config, artifacts).expect("registry builds");
    TestServer::new(build_router(registry)).unwrap()
}

#[tokio::test]
async fn test_form_prediction_returns_text() {
    let server = test_server();

    let response = server
        .post("/predict")
        .form(&[
            ("title", "Breaking: Scientists Confirm"),
            ("author", "John Doe"),
        ])
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body["prediction_text"],
        "The news is FAKE (Confidence: 80.74%)"
    );
    assert_eq!(body["label"], "FAKE");
}

#[tokio::test]
async fn test_form_missing_title_is_bad_request() {
    let server = test_server();

    let response = server.post("/predict").form(&[("author", "John Doe")]).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(
        body["prediction_text"],
        "An error occurred: missing required field: 'title'"
    );
    assert!(body.get("label").is_none());
}

fn assert_invalid_request(body: &Value) {
    let text = body["prediction_text"].as_str().expect("string");
    assert!(
        text.starts_with("An error occurred: invalid request: "),
        "unexpected text: {text}"
    );
    assert!(body.get("label").is_none());
}

#[tokio::test]
async fn test_form_with_wrong_content_type_is_bad_request() {
    let server = test_server();

    let response = server
        .post("/predict")
        .text("title=Breaking&author=John")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_invalid_request(&response.json());
}

#[tokio::test]
async fn test_form_with_repeated_field_is_bad_request() {
    let server = test_server();

    let response = server
        .post("/predict")
        .form(&[
            ("title", "first"),
            ("title", "second"),
            ("author", "John Doe"),
        ])
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_invalid_request(&response.json());
}

#[tokio::test]
async fn test_json_with_wrong_field_type_is_bad_request() {
    let server = test_server();

    let response = server
        .post("/v1/predict")
        .json(&json!({ "title": 5, "author": "x" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_invalid_request(&body);
    assert!(
        body["prediction_text"]
            .as_str()
            .is_some_and(|text| text.contains("invalid type"))
    );
}

#[tokio::test]
async fn test_malformed_requests_count_as_input_failures() {
    let server = test_server();

    server
        .post("/v1/predict")
        .json(&json!({ "title": ["a"], "author": "x" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let text = server.get("/metrics").await.text();
    assert!(text.contains("veracity_input_failures_total 1"));
}

#[tokio::test]
async fn test_json_prediction_accepts_empty_fields() {
    let server = test_server();

    let response = server
        .post("/v1/predict")
        .json(&json!({ "title": "", "author": "" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body["prediction_text"],
        "The news is FAKE (Confidence: 54.98%)"
    );
}

#[tokio::test]
async fn test_health_endpoints() {
    let server = test_server();

    let live = server.get("/health/live").await;
    live.assert_status_ok();
    live.assert_json(&json!({ "status": "live" }));

    let ready = server.get("/health/ready").await;
    ready.assert_status_ok();
    ready.assert_json(&json!({ "status": "ready", "feature_dim": 24 }));
}

#[tokio::test]
async fn test_metrics_count_outcomes() {
    let server = test_server();

    server
        .post("/v1/predict")
        .json(&json!({ "title": "Officials report", "author": "New York Times" }))
        .await
        .assert_status_ok();
    server
        .post("/v1/predict")
        .json(&json!({ "author": "John Doe" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let response = server.get("/metrics").await;
    response.assert_status_ok();
    let text = response.text();
    assert!(text.contains("veracity_predictions_real_total 1"));
    assert!(text.contains("veracity_input_failures_total 1"));
    assert!(text.contains("veracity_pipeline_duration_seconds_count 2"));
}
