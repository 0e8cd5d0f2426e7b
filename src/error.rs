use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

pub type AudienceResult<T> = Result<T, AudienceError>;

/// Errors raised while talking to the marketing platform or reconciling state against it.
#[derive(Debug, Error)]
pub enum AudienceError {
    #[error("platform returned status {status}: {detail}")]
    Transport { status: StatusCode, detail: String },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("response field `{field}` is missing or not a list: {payload}")]
    DataFormat { field: &'static str, payload: Value },
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("tags not found: {}", .0.join(", "))]
    TagsNotFound(Vec<String>),
    #[error("configuration error: {0}")]
    Config(String),
}

impl AudienceError {
    pub fn transport(status: StatusCode, detail: impl Into<String>) -> Self {
        AudienceError::Transport {
            status,
            detail: detail.into(),
        }
    }

    pub fn data_format(field: &'static str, payload: Value) -> Self {
        AudienceError::DataFormat { field, payload }
    }

    /// Upstream status for errors that came back from the platform.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AudienceError::Transport { status, .. } => Some(*status),
            AudienceError::Http(err) => err.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tags_not_found_lists_every_name() {
        let err = AudienceError::TagsNotFound(vec!["vip".into(), "beta".into()]);
        assert_eq!(err.to_string(), "tags not found: vip, beta");
    }

    #[test]
    fn transport_error_keeps_upstream_detail() {
        let err = AudienceError::transport(StatusCode::NOT_FOUND, "The requested resource could not be found.");
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert!(err.to_string().contains("could not be found"));
    }

    #[test]
    fn data_format_embeds_payload() {
        let err = AudienceError::data_format("categories", json!({"total_items": 0}));
        assert!(err.status().is_none());
        assert!(err.to_string().contains("`categories`"));
        assert!(err.to_string().contains("total_items"));
    }
}
