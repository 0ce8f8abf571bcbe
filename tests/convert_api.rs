//! End-to-end tests for the HTTP surface

use std::net::SocketAddr;

use axum::{
    body::{to_bytes, Body},
    extract::connect_info::MockConnectInfo,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use json_convert_server::{app, config::Config, state::AppState};

const BODY_LIMIT: usize = 16 * 1024 * 1024;

fn unlimited_state() -> AppState {
    let mut config = Config::default();
    config.rate_limit.enabled = false;
    AppState::new(config)
}

fn limited_state(max_requests: u32) -> AppState {
    let mut config = Config::default();
    config.rate_limit.max_requests = max_requests;
    AppState::new(config)
}

async fn post_json(router: Router, body: Value) -> Response {
    post_raw(router, body.to_string()).await
}

async fn post_raw(router: Router, body: String) -> Response {
    router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/convert")
                .header(header::CONTENT_TYPE, "application/json")
                .header("x-forwarded-for", "198.51.100.4")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), BODY_LIMIT).await.unwrap().to_vec()
}

async fn error_message(response: Response) -> String {
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    body["message"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_csv_download() {
    let response = post_json(
        app(unlimited_state()),
        json!({"data": r#"[{"name":"A","age":1},{"name":"B","age":2}]"#, "format": "csv"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"data.csv\""
    );
    assert_eq!(
        body_bytes(response).await,
        b"\"name\",\"age\"\n\"A\",1\n\"B\",2\n"
    );
}

#[tokio::test]
async fn test_yaml_from_structured_data() {
    let response = post_json(
        app(unlimited_state()),
        json!({"data": {"x": 1}, "format": "yaml"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/x-yaml");
    assert_eq!(body_bytes(response).await, b"x: 1\n");
}

#[tokio::test]
async fn test_every_format_serves_its_headers() {
    let state = unlimited_state();
    let data = r#"[{"id":1,"label":"first"},{"id":2,"label":"second"}]"#;

    for (format, content_type) in [
        ("csv", "text/csv"),
        ("xml", "application/xml"),
        ("yaml", "application/x-yaml"),
        ("pdf", "application/pdf"),
        (
            "xlsx",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        ),
        ("png", "image/png"),
    ] {
        let response = post_json(app(state.clone()), json!({"data": data, "format": format})).await;
        assert_eq!(response.status(), StatusCode::OK, "format {}", format);
        assert_eq!(response.headers()[header::CONTENT_TYPE], content_type);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            format!("attachment; filename=\"data.{}\"", format).as_str()
        );
        assert!(!body_bytes(response).await.is_empty());
    }
}

#[tokio::test]
async fn test_invalid_json_data() {
    for format in ["csv", "yaml", "docx"] {
        let response = post_json(
            app(unlimited_state()),
            json!({"data": "{bad json", "format": format}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_message(response).await, "Invalid JSON data");
    }
}

#[tokio::test]
async fn test_unknown_format_is_rejected_and_not_cached() {
    let state = unlimited_state();
    let response = post_json(
        app(state.clone()),
        json!({"data": r#"{"a":1}"#, "format": "docx"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "Invalid format");
    assert!(state.converter().cache().is_empty().await);
}

#[tokio::test]
async fn test_empty_array_to_tabular_is_server_error() {
    let state = unlimited_state();
    for (format, name) in [("csv", "CSV"), ("xlsx", "Excel")] {
        let response = post_json(app(state.clone()), json!({"data": "[]", "format": format})).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            error_message(response).await,
            format!("Error converting to {}", name)
        );
    }
    assert!(state.converter().cache().is_empty().await);
}

#[tokio::test]
async fn test_malformed_envelope() {
    let response = post_raw(app(unlimited_state()), "{not json".to_string()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        error_message(response).await,
        "Check Json syntax and try again!"
    );
}

#[tokio::test]
async fn test_repeat_request_is_served_from_cache() {
    let state = unlimited_state();
    let body = json!({"data": r#"{"k":[1,2,3]}"#, "format": "png"});

    let first = body_bytes(post_json(app(state.clone()), body.clone()).await).await;
    let second = body_bytes(post_json(app(state.clone()), body).await).await;

    assert_eq!(first, second);
    let stats = state.converter().cache().stats().await;
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.hits, 1);
}

#[tokio::test]
async fn test_equivalent_inputs_get_separate_entries() {
    let state = unlimited_state();
    for data in [r#"{"a":1,"b":2}"#, r#"{"b":2,"a":1}"#] {
        let response = post_json(app(state.clone()), json!({"data": data, "format": "yaml"})).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    assert_eq!(state.converter().cache().len().await, 2);
}

#[tokio::test]
async fn test_rate_limit() {
    let state = limited_state(2);

    for remaining in ["1", "0"] {
        let response = post_json(app(state.clone()), json!({"data": "1", "format": "yaml"})).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-ratelimit-limit"], "2");
        assert_eq!(response.headers()["x-ratelimit-remaining"], remaining);
    }

    let response = post_json(app(state.clone()), json!({"data": "1", "format": "yaml"})).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key(header::RETRY_AFTER));
    assert_eq!(
        error_message(response).await,
        "You have reached the max quota of 2 requests. Please wait for 15 minutes!"
    );
}

async fn post_forwarded(router: Router, forwarded_for: &str) -> StatusCode {
    router
        .layer(MockConnectInfo(SocketAddr::from(([192, 0, 2, 10], 40000))))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/convert")
                .header(header::CONTENT_TYPE, "application/json")
                .header("x-forwarded-for", forwarded_for)
                .body(Body::from(json!({"data": "1", "format": "yaml"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn test_rotating_forwarded_for_is_still_limited() {
    let state = limited_state(2);

    let mut statuses = Vec::new();
    for i in 0..5 {
        statuses.push(post_forwarded(app(state.clone()), &format!("10.9.9.{}", i)).await);
    }

    assert_eq!(
        statuses,
        vec![
            StatusCode::OK,
            StatusCode::OK,
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::TOO_MANY_REQUESTS,
        ]
    );
}

#[tokio::test]
async fn test_trusted_proxy_keys_on_forwarded_for() {
    let mut config = Config::default();
    config.rate_limit.max_requests = 1;
    config.rate_limit.trust_proxy = true;
    let state = AppState::new(config);

    assert_eq!(post_forwarded(app(state.clone()), "10.9.9.1").await, StatusCode::OK);
    assert_eq!(post_forwarded(app(state.clone()), "10.9.9.2").await, StatusCode::OK);
    assert_eq!(
        post_forwarded(app(state.clone()), "10.9.9.1").await,
        StatusCode::TOO_MANY_REQUESTS
    );
}

#[tokio::test]
async fn test_array_envelope_is_malformed() {
    let response = post_json(app(unlimited_state()), json!(["[1]", "csv"])).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        error_message(response).await,
        "Check Json syntax and try again!"
    );
}

#[tokio::test]
async fn test_rate_limit_does_not_cover_health() {
    let state = limited_state(1);
    for _ in 0..3 {
        let response = app(state.clone())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_health_reports_cache() {
    let state = unlimited_state();
    post_json(app(state.clone()), json!({"data": "[1]", "format": "xml"})).await;

    let response = app(state)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["cache"]["entries"], 1);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let response = app(unlimited_state())
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/convert")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}
