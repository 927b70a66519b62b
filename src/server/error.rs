use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// An HTTP error response: `{"error": "...", "code": "..."}`, the `code`
/// being a stable machine-readable identifier that is omitted when a status
/// plus message says it all.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub code: Option<&'static str>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(status: StatusCode, message: impl Into<String>, code: &'static str) -> Self {
        Self {
            status,
            message: message.into(),
            code: Some(code),
        }
    }

    pub fn bad_request(message: impl Into<String>, code: &'static str) -> Self {
        Self::with_code(StatusCode::BAD_REQUEST, message, code)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            code: self.code,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_is_omitted_when_absent() {
        let body = ErrorBody {
            error: "Route not found".to_string(),
            code: None,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"error":"Route not found"}"#
        );
    }

    #[test]
    fn code_is_included_when_present() {
        let body = ErrorBody {
            error: "Invalid token".to_string(),
            code: Some("invalid_token"),
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"error":"Invalid token","code":"invalid_token"}"#
        );
    }
}
