use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use tracing::{info, warn};

use super::response::SummaryResponse;
use super::AppState;
use crate::error::ApiError;
use crate::llm::collect_text;
use crate::{normalize, prompt, Format, TARGET_WEB_REQUEST};

/// Body as callers send it; validated into a [`SummarizeRequest`].
#[derive(Debug, Deserialize)]
pub struct SummarizeBody {
    pub content: Option<String>,
    pub format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizeRequest {
    pub content: String,
    pub format: Format,
}

impl TryFrom<SummarizeBody> for SummarizeRequest {
    type Error = ApiError;

    fn try_from(body: SummarizeBody) -> Result<Self, Self::Error> {
        let content = body
            .content
            .filter(|content| !content.trim().is_empty())
            .ok_or(ApiError::InvalidRequest)?;

        let format = match body.format {
            Some(name) => name.parse::<Format>().map_err(|err| {
                warn!(target: TARGET_WEB_REQUEST, "Rejected request: {}", err);
                ApiError::InvalidRequest
            })?,
            None => Format::default(),
        };

        Ok(Self { content, format })
    }
}

/// Summarize caller-supplied text in the requested format.
pub async fn summarize(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<SummarizeBody>, JsonRejection>,
) -> Result<Json<SummaryResponse>, ApiError> {
    state.auth.check(&headers)?;

    let Json(body) = body.map_err(|rejection| {
        warn!(target: TARGET_WEB_REQUEST, "Rejected request body: {}", rejection);
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::InvalidRequest
        }
    })?;
    let request = SummarizeRequest::try_from(body)?;

    info!(
        target: TARGET_WEB_REQUEST,
        "Summarizing {} bytes as {}",
        request.content.len(),
        request.format
    );

    let prompt = prompt::for_format(request.format, &request.content);
    let raw = collect_text(state.generator.stream_text(prompt)).await?;
    let result = normalize(&raw, request.format)?;

    Ok(Json(SummaryResponse::from_result(result, state.thread_shape)))
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Liveness probe.
pub async fn status_check() -> &'static str {
    "OK"
}
