mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};
use vc_scrape_gateway::{DeploymentMode, ScraperConfig};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::test_server;

fn remote_config(mock: &MockServer) -> ScraperConfig {
    ScraperConfig::new().with_python_api_url(mock.uri())
}

#[tokio::test]
async fn test_upstream_csv_is_returned_byte_identical() {
    let mock = MockServer::start().await;
    let csv: Vec<u8> = b"Company,URL\r\nCaf\xc3\xa9 Labs,https://cafe.example\r\n".to_vec();

    Mock::given(method("POST"))
        .and(path("/scrape"))
        .and(body_json(json!({ "url": "https://vc.example/portfolio" })))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(csv.clone()))
        .expect(1)
        .mount(&mock)
        .await;

    let server = test_server(&remote_config(&mock));
    let response = server
        .post("/api/scrape")
        .json(&json!({ "url": "https://vc.example/portfolio" }))
        .await;

    response.assert_status(StatusCode::OK);
    assert_eq!(response.header("content-type"), "text/csv");
    assert_eq!(
        response.header("content-disposition"),
        "attachment; filename=portfolio_companies.csv"
    );
    assert_eq!(response.as_bytes().to_vec(), csv);
}

#[tokio::test]
async fn test_upstream_failure_forwards_error_text() {
    let mock = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/scrape"))
        .respond_with(
            ResponseTemplate::new(500).set_body_string(r#"{"error": "No data was scraped"}"#),
        )
        .mount(&mock)
        .await;

    let server = test_server(&remote_config(&mock));
    let response = server
        .post("/api/scrape")
        .json(&json!({ "url": "https://vc.example" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("API Error: "), "{message}");
    assert!(message.contains("No data was scraped"), "{message}");
}

#[tokio::test]
async fn test_missing_url_never_reaches_upstream() {
    let mock = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock)
        .await;

    let server = test_server(&remote_config(&mock));
    let response = server.post("/api/scrape").json(&json!({})).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "URL is required" }));
}

#[tokio::test]
async fn test_production_without_api_url_is_config_error() {
    let config = ScraperConfig::new().with_mode(DeploymentMode::Production);
    let server = test_server(&config);

    let response = server
        .post("/api/scrape")
        .json(&json!({ "url": "https://vc.example" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({
        "error": "PYTHON_API_URL environment variable is not set"
    }));
}

#[tokio::test]
async fn test_unreachable_upstream_is_server_error() {
    // 接続できないポート
    let config = ScraperConfig::new().with_python_api_url("http://127.0.0.1:9");
    let server = test_server(&config);

    let response = server
        .post("/api/scrape")
        .json(&json!({ "url": "https://vc.example" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("HTTP request failed"));
}

#[tokio::test]
async fn test_health_and_form() {
    let server = test_server(&ScraperConfig::new());

    let health = server.get("/health").await;
    health.assert_status_ok();
    health.assert_json(&json!({ "status": "healthy" }));

    let form = server.get("/").await;
    form.assert_status_ok();
    assert!(form.text().contains("a.download = 'portfolio_companies.csv'"));
}
