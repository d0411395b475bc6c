//! Client configuration.

use std::time::Duration;

/// Default API location (the development server).
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Settings for [`crate::HttpApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server root. Routes are joined onto it, so a path prefix is kept.
    pub base_url: String,
    /// Whole-request timeout. Password attacks run inside a single request,
    /// so this must cover the longest search.
    pub timeout: Duration,
    /// `User-Agent` header.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(300),
            user_agent: concat!("cipherlab/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Config pointing at `base_url`, other fields default.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Self::default() }
    }
}
