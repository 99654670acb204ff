use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::ScraperError;

/// HTTPレスポンスに変換されるエラー
///
/// URL未指定のみ400、それ以外はすべて500。本文は常に `{ "error": ... }`
#[derive(Debug)]
pub struct ApiError(pub ScraperError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

impl<E> From<E> for ApiError
where
    E: Into<ScraperError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
