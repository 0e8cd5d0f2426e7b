//! Audience management for the Mailchimp Marketing API.
//!
//! Interests and tags are addressed by name; this crate resolves names to the
//! platform's opaque ids, memoizes the interest graph per list, and reconciles
//! tag membership.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod interests;
pub mod members;
pub mod models;
pub mod tags;
pub mod transport;

pub use client::AudienceClient;
pub use config::ClientConfig;
pub use error::{AudienceError, AudienceResult};
pub use interests::{InterestSpec, InterestsInput, OneOrMany};
pub use members::email_hash;
pub use models::{InterestFlags, MemberStatus, MergeFields};
pub use tags::TagAssignment;

use env_logger::Env;
use std::sync::Once;

static LOGGER: Once = Once::new();

pub fn init_logger() {
    LOGGER.call_once(|| {
        env_logger::Builder::from_env(
            Env::default().default_filter_or("info,reqwest=warn,hyper=warn"),
        )
        .format_timestamp(None)
        .init();
    });
}

#[cfg_attr(not(test), allow(dead_code))]
pub mod test_support {
    use crate::error::{AudienceError, AudienceResult};
    use crate::transport::Transport;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use reqwest::{Method, StatusCode};
    use serde_json::Value;

    /// One call observed by [`MockTransport`].
    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedCall {
        pub method: Method,
        pub path: String,
        pub payload: Option<Value>,
    }

    type Responder = Box<dyn Fn(Option<&Value>) -> Value + Send + Sync>;

    enum Reply {
        Body(Value),
        Dynamic(Responder),
        Failure { status: StatusCode, detail: String },
    }

    struct Route {
        method: Method,
        path: String,
        reply: Reply,
    }

    /// Scripted transport that answers by exact method + path and records every call.
    ///
    /// Unscripted calls fail with a 404 transport error.
    #[derive(Default)]
    pub struct MockTransport {
        routes: Vec<Route>,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Answer `method path` with a fixed body.
        pub fn route(mut self, method: Method, path: impl Into<String>, body: Value) -> Self {
            self.routes.push(Route {
                method,
                path: path.into(),
                reply: Reply::Body(body),
            });
            self
        }

        /// Answer `method path` with a body computed from the request payload.
        pub fn respond_with<F>(mut self, method: Method, path: impl Into<String>, responder: F) -> Self
        where
            F: Fn(Option<&Value>) -> Value + Send + Sync + 'static,
        {
            self.routes.push(Route {
                method,
                path: path.into(),
                reply: Reply::Dynamic(Box::new(responder)),
            });
            self
        }

        /// Fail `method path` with a non-success status and detail text.
        pub fn fail(
            mut self,
            method: Method,
            path: impl Into<String>,
            status: StatusCode,
            detail: impl Into<String>,
        ) -> Self {
            self.routes.push(Route {
                method,
                path: path.into(),
                reply: Reply::Failure {
                    status,
                    detail: detail.into(),
                },
            });
            self
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().clone()
        }

        pub fn calls_to(&self, method: Method, path: &str) -> Vec<RecordedCall> {
            self.calls
                .lock()
                .iter()
                .filter(|call| call.method == method && call.path == path)
                .cloned()
                .collect()
        }

        pub fn count(&self, method: Method, path: &str) -> usize {
            self.calls_to(method, path).len()
        }

        pub fn clear_calls(&self) {
            self.calls.lock().clear();
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn call(
            &self,
            method: Method,
            path: &str,
            payload: Option<&Value>,
        ) -> AudienceResult<Value> {
            self.calls.lock().push(RecordedCall {
                method: method.clone(),
                path: path.to_string(),
                payload: payload.cloned(),
            });

            let route = self
                .routes
                .iter()
                .find(|route| route.method == method && route.path == path);

            match route.map(|route| &route.reply) {
                Some(Reply::Body(body)) => Ok(body.clone()),
                Some(Reply::Dynamic(responder)) => Ok(responder(payload)),
                Some(Reply::Failure { status, detail }) => {
                    Err(AudienceError::transport(*status, detail.clone()))
                }
                None => Err(AudienceError::transport(
                    StatusCode::NOT_FOUND,
                    format!("no route for {} {}", method, path),
                )),
            }
        }
    }
}
