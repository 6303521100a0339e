pub mod api;
pub mod environment;
pub mod error;
pub mod format;
pub mod llm;
pub mod logging;
pub mod normalizer;
pub mod prompt;

pub use environment::Config;
pub use format::Format;
pub use normalizer::{normalize, NormalizedResult};

pub const TARGET_WEB_REQUEST: &str = "web_request";
pub const TARGET_LLM_REQUEST: &str = "llm_request";
pub const TARGET_NORMALIZER: &str = "normalizer";
