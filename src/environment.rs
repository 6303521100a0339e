use anyhow::{anyhow, Context, Result};
use std::env;
use std::fmt::Display;
use std::str::FromStr;

use crate::api::{AuthMode, ThreadShape};
use crate::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Process configuration, read once from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub client_api_key: Option<String>,
    pub auth_mode: AuthMode,
    pub rapidapi_proxy_secret: Option<String>,
    pub thread_shape: ThreadShape,
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a configuration from any variable source.
    ///
    /// Unset and empty variables are treated alike.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let gemini_api_key = get("GEMINI_API_KEY")
            .ok_or_else(|| anyhow!("GEMINI_API_KEY environment variable required"))?;

        Ok(Self {
            gemini_api_key,
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_base_url: get("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client_api_key: get("CLIENT_API_KEY"),
            auth_mode: parse_var("AUTH_MODE", get("AUTH_MODE"), AuthMode::default())?,
            rapidapi_proxy_secret: get("RAPIDAPI_PROXY_SECRET"),
            thread_shape: parse_var("THREAD_RESPONSE", get("THREAD_RESPONSE"), ThreadShape::default())?,
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_var("PORT", get("PORT"), DEFAULT_PORT)?,
            max_body_bytes: parse_var("MAX_BODY_BYTES", get("MAX_BODY_BYTES"), DEFAULT_MAX_BODY_BYTES)?,
            log_dir: get("LOG_DIR").unwrap_or_else(|| DEFAULT_LOG_DIR.to_string()),
        })
    }
}

fn parse_var<T>(name: &str, value: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match value {
        Some(value) => value
            .parse::<T>()
            .map_err(|err| anyhow!("{}", err))
            .with_context(|| format!("Invalid value '{}' for {}", value, name)),
        None => Ok(default),
    }
}
