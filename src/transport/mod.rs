//! Authenticated request/response plumbing for the marketing platform.
//!
//! Everything above this module talks to the platform through the [`Transport`]
//! trait so the reconciliation logic can be exercised against a scripted
//! transport in tests.

mod http;
mod logging;

pub use http::HttpTransport;
pub use logging::LoggingTransport;

use crate::error::AudienceResult;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

/// Performs one platform call and returns the decoded JSON body.
///
/// Implementations surface non-success responses as
/// [`AudienceError::Transport`](crate::error::AudienceError::Transport) carrying
/// the upstream detail text. Timeouts and retries are the implementation's
/// business; callers never retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(&self, method: Method, path: &str, payload: Option<&Value>)
    -> AudienceResult<Value>;
}

