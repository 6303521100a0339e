//! Header-based pre-check for the summarize endpoint.

use axum::http::HeaderMap;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::TARGET_WEB_REQUEST;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const RAPIDAPI_KEY_HEADER: &str = "x-rapidapi-key";
pub const RAPIDAPI_PROXY_SECRET_HEADER: &str = "x-rapidapi-proxy-secret";
pub const RAPIDAPI_HOST_HEADER: &str = "x-rapidapi-host";

/// How strictly callers must present the client API key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthMode {
    /// Every request must carry the key.
    Strict,
    /// Traffic relayed by the RapidAPI gateway is trusted; direct calls need the key.
    #[default]
    Gateway,
}

impl FromStr for AuthMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(AuthMode::Strict),
            "gateway" => Ok(AuthMode::Gateway),
            other => Err(format!(
                "unknown auth mode '{}', expected 'strict' or 'gateway'",
                other
            )),
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::Strict => f.write_str("strict"),
            AuthMode::Gateway => f.write_str("gateway"),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AuthPolicy {
    mode: AuthMode,
    client_api_key: Option<String>,
    proxy_secret: Option<String>,
}

impl AuthPolicy {
    pub fn new(
        mode: AuthMode,
        client_api_key: Option<String>,
        proxy_secret: Option<String>,
    ) -> Self {
        Self {
            mode,
            client_api_key,
            proxy_secret,
        }
    }

    /// A policy that admits every request.
    pub fn open() -> Self {
        Self::default()
    }

    pub fn check(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let Some(expected) = self.client_api_key.as_deref() else {
            return Ok(());
        };

        if self.mode == AuthMode::Gateway && self.is_gateway_traffic(headers) {
            debug!(target: TARGET_WEB_REQUEST, "Admitting gateway traffic without client key");
            return Ok(());
        }

        let presented =
            header_value(headers, API_KEY_HEADER).or_else(|| header_value(headers, RAPIDAPI_KEY_HEADER));

        match presented {
            Some(key) if keys_match(key, expected) => Ok(()),
            Some(_) => {
                warn!(target: TARGET_WEB_REQUEST, "Rejected request with invalid API key");
                Err(ApiError::Unauthorized)
            }
            None => {
                warn!(target: TARGET_WEB_REQUEST, "Rejected request without API key");
                Err(ApiError::Unauthorized)
            }
        }
    }

    fn is_gateway_traffic(&self, headers: &HeaderMap) -> bool {
        let secret = header_value(headers, RAPIDAPI_PROXY_SECRET_HEADER);
        match self.proxy_secret.as_deref() {
            Some(expected) => secret.is_some_and(|secret| keys_match(secret, expected)),
            None => secret.is_some() || header_value(headers, RAPIDAPI_HOST_HEADER).is_some(),
        }
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)?
        .to_str()
        .ok()
        .filter(|value| !value.is_empty())
}

/// Compare digests rather than the keys so timing does not leak a matching prefix.
fn keys_match(presented: &str, expected: &str) -> bool {
    Sha256::digest(presented.as_bytes()) == Sha256::digest(expected.as_bytes())
}
