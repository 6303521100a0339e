use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::{Format, TARGET_WEB_REQUEST};

/// Failures talking to the upstream text-generation service.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned error status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Upstream reported an error: {0}")]
    Api(String),

    #[error("Failed to decode upstream payload: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("model output could not be decoded into the requested shape")]
    MalformedModelOutput { raw: String },
}

/// Everything the summarize endpoint can fail with, mapped onto HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("content and format ({}) are required", Format::allowed_names().join(", "))]
    InvalidRequest,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("Invalid thread output from model")]
    MalformedModelOutput { raw: String },

    #[error("Something went wrong")]
    Upstream(#[from] LlmError),
}

impl From<NormalizeError> for ApiError {
    fn from(err: NormalizeError) -> Self {
        match err {
            NormalizeError::MalformedModelOutput { raw } => ApiError::MalformedModelOutput { raw },
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::FORBIDDEN,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::MalformedModelOutput { .. } | ApiError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::InvalidRequest => json!({
                "error": self.to_string(),
                "allowed_formats": Format::allowed_names(),
            }),
            ApiError::MalformedModelOutput { raw } => {
                warn!(target: TARGET_WEB_REQUEST, "Returning malformed model output ({} bytes)", raw.len());
                json!({ "error": self.to_string(), "raw": raw })
            }
            ApiError::Upstream(err) => {
                error!(target: TARGET_WEB_REQUEST, "API Error: {}", err);
                json!({ "error": self.to_string() })
            }
            ApiError::Unauthorized | ApiError::MethodNotAllowed | ApiError::PayloadTooLarge => {
                json!({ "error": self.to_string() })
            }
        };

        (status, Json(body)).into_response()
    }
}
