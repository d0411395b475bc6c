//! Cipherlab HTTP client
//!
//! Typed access to the cipherlab API. Every JSON route is decoded once into
//! its payload or an [`ApiError`], so callers never see the `success`
//! envelope.
//!
//! # Components
//!
//! - [`Api`]: the async seam the application layer calls through
//! - [`HttpApi`]: `reqwest` implementation with a session cookie store
//! - [`ClientConfig`]: base URL, timeout and user agent
//! - [`ApiError`]: transport, decode and rejection failures

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod api;
mod config;
mod error;
mod http;

pub use api::Api;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use http::HttpApi;
