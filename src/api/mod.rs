//! HTTP surface: one summarize endpoint plus a liveness probe.

pub mod auth;
mod handlers;
pub mod response;
#[cfg(test)]
mod tests;

pub use self::auth::{AuthMode, AuthPolicy};
pub use self::handlers::{SummarizeBody, SummarizeRequest};
pub use self::response::{SummaryResponse, ThreadShape};

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::llm::TextGenerator;
use crate::Config;

pub const SUMMARIZE_PATH: &str = "/api/summarize";
pub const STATUS_PATH: &str = "/status";

/// Immutable per-process state shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn TextGenerator>,
    pub auth: AuthPolicy,
    pub thread_shape: ThreadShape,
}

impl AppState {
    pub fn new(generator: Arc<dyn TextGenerator>, config: &Config) -> Self {
        Self {
            generator,
            auth: AuthPolicy::new(
                config.auth_mode,
                config.client_api_key.clone(),
                config.rapidapi_proxy_secret.clone(),
            ),
            thread_shape: config.thread_shape,
        }
    }
}

pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route(
            SUMMARIZE_PATH,
            post(handlers::summarize).fallback(handlers::method_not_allowed),
        )
        .route(STATUS_PATH, get(handlers::status_check))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

/// Bind the configured address and serve until the process is stopped.
pub async fn app_api_loop(config: Config, generator: Arc<dyn TextGenerator>) -> Result<()> {
    let state = AppState::new(generator, &config);
    let app = router(state, config.max_body_bytes);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(
        "Server running on http://{} (auth mode: {}, thread response: {:?})",
        addr,
        config.auth_mode,
        config.thread_shape
    );

    axum::serve(listener, app.into_make_service())
        .await
        .context("Server terminated unexpectedly")?;

    Ok(())
}
