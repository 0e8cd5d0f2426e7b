use super::Transport;
use crate::error::AudienceResult;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::time::Instant;

/// Wraps a transport and logs one line per platform call with timing.
pub struct LoggingTransport<T> {
    inner: T,
}

impl<T> LoggingTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[async_trait]
impl<T: Transport> Transport for LoggingTransport<T> {
    async fn call(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
    ) -> AudienceResult<Value> {
        let started = Instant::now();
        let result = self.inner.call(method.clone(), path, payload).await;
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        match &result {
            Ok(_) => log::info!("{} {} -> ok ({:.2}ms)", method, path, elapsed_ms),
            Err(err) => log::warn!("{} {} -> {} ({:.2}ms)", method, path, err, elapsed_ms),
        }

        result
    }
}
