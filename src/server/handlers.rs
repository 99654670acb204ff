//! ルートハンドラ

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tower::ServiceExt;

use crate::service::{ScrapeRequest, ScrapeResult};

use super::error::ApiError;
use super::state::AppState;

const FORM_HTML: &str = include_str!("../../assets/index.html");

pub const CSV_CONTENT_TYPE: &str = "text/csv";
pub const CSV_CONTENT_DISPOSITION: &str = "attachment; filename=portfolio_companies.csv";

/// `POST /api/scrape` の本文
#[derive(Debug, Deserialize)]
pub struct ScrapePayload {
    /// 文字列以外も受け取り、存在チェックは `ScrapeRequest::from_json` に任せる
    pub url: Option<serde_json::Value>,
}

/// GET / - 入力フォーム
pub async fn index() -> impl IntoResponse {
    Html(FORM_HTML)
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// POST /api/scrape
///
/// JSONの解析失敗は500、URL未指定は400として返す
pub async fn scrape(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let payload: ScrapePayload = serde_json::from_slice(&body)?;
    let request = ScrapeRequest::from_json(payload.url)?;

    let result = state.service.clone().oneshot(request).await?;

    Ok(csv_response(result))
}

fn csv_response(result: ScrapeResult) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE),
            (header::CONTENT_DISPOSITION, CSV_CONTENT_DISPOSITION),
        ],
        result.csv_content,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OUTPUT_FILE_NAME;

    #[test]
    fn test_disposition_names_output_file() {
        assert!(CSV_CONTENT_DISPOSITION.ends_with(&format!("filename={}", OUTPUT_FILE_NAME)));
    }

    #[test]
    fn test_form_downloads_output_file() {
        assert!(FORM_HTML.contains(&format!("a.download = '{}'", OUTPUT_FILE_NAME)));
        assert!(FORM_HTML.contains("/api/scrape"));
    }

    #[test]
    fn test_payload_url_is_optional() {
        let payload: ScrapePayload = serde_json::from_str("{}").unwrap();
        assert!(payload.url.is_none());
    }
}
