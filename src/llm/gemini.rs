use futures::stream::{self, BoxStream};
use futures::{StreamExt, TryStreamExt};
use reqwest::{header, RequestBuilder};
use tracing::{debug, info, warn};

use super::sse::decode_event_stream;
use super::types::GenerateContentRequest;
use super::TextGenerator;
use crate::error::LlmError;
use crate::TARGET_LLM_REQUEST;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Streaming client for the Gemini `generateContent` family of endpoints.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn with_endpoint(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder().build()?;
        let base_url: String = base_url.into();

        Ok(Self {
            http,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Server-sent-events flavour of `streamGenerateContent`.
    pub fn stream_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.base_url, self.model
        )
    }

    fn request(&self, prompt: String) -> RequestBuilder {
        self.http
            .post(self.stream_url())
            .header(API_KEY_HEADER, &self.api_key)
            .header(header::ACCEPT, "text/event-stream")
            .json(&GenerateContentRequest::user_prompt(prompt))
    }
}

impl TextGenerator for GeminiClient {
    fn stream_text(&self, prompt: String) -> BoxStream<'static, Result<String, LlmError>> {
        info!(
            target: TARGET_LLM_REQUEST,
            "Requesting streamed generation from {} ({} byte prompt)",
            self.model,
            prompt.len()
        );
        debug!(target: TARGET_LLM_REQUEST, "Prompt: {}", prompt);

        let request = self.request(prompt);
        stream::once(open_stream(request)).try_flatten().boxed()
    }
}

/// Send the request and, once headers arrive, hand back the fragment stream.
async fn open_stream(
    request: RequestBuilder,
) -> Result<BoxStream<'static, Result<String, LlmError>>, LlmError> {
    let response = request.send().await?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        warn!(
            target: TARGET_LLM_REQUEST,
            "Upstream returned {}: {}", status, body
        );
        return Err(LlmError::Status {
            status: status.as_u16(),
            body,
        });
    }

    debug!(target: TARGET_LLM_REQUEST, "Upstream accepted request, streaming response");
    Ok(decode_event_stream(response.bytes_stream().boxed()).boxed())
}
