//! APIエラーレスポンス型
//!
//! axum用の共通エラーハンドリング

use axum::{http::StatusCode, response::IntoResponse, Json};
use junitgen_common::error::GeneratorError;
use serde_json::json;

/// Axum用のエラーレスポンス型
#[derive(Debug)]
pub struct AppError(pub GeneratorError);

impl From<GeneratorError> for AppError {
    fn from(err: GeneratorError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            GeneratorError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GeneratorError::Http(_) => StatusCode::BAD_GATEWAY,
            GeneratorError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            GeneratorError::Extraction(_)
            | GeneratorError::Synthesis(_)
            | GeneratorError::Archive(_)
            | GeneratorError::Io(_)
            | GeneratorError::Serialization(_)
            | GeneratorError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = json!({
            "error": self.0.to_string()
        });

        (status, Json(payload)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_request_maps_to_400() {
        let err = AppError(GeneratorError::InvalidRequest("No files provided".to_string()));
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "No files provided");
    }

    #[tokio::test]
    async fn test_timeout_maps_to_504() {
        let err = AppError(GeneratorError::Timeout("backend timed out".to_string()));
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }
}
