use crate::error::{AudienceError, AudienceResult};
use std::env;
use std::time::Duration;

const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_USER_AGENT: &str = "mailchimp-audience/0.1";

fn env_duration_millis(key: &str, default_millis: u64) -> Duration {
    env::var(key)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or_else(|| Duration::from_millis(default_millis))
}

fn env_string(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Derive the API root from the datacenter suffix of a key (`<secret>-us6`).
pub fn base_url_for_key(api_key: &str) -> AudienceResult<String> {
    let datacenter = api_key
        .rsplit_once('-')
        .map(|(_, dc)| dc.trim())
        .filter(|dc| !dc.is_empty() && dc.chars().all(|c| c.is_ascii_alphanumeric()))
        .ok_or_else(|| {
            AudienceError::Config("API key is missing its datacenter suffix (expected `<key>-<dc>`)".into())
        })?;

    Ok(format!("https://{}.api.mailchimp.com/3.0", datacenter))
}

/// Connection settings for the marketing platform, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> AudienceResult<Self> {
        let api_key = api_key.into();
        let base_url = base_url_for_key(&api_key)?;

        Ok(Self {
            api_key,
            base_url,
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    pub fn from_env() -> AudienceResult<Self> {
        let api_key = env::var("MAILCHIMP_API_KEY")
            .map_err(|_| AudienceError::Config("MAILCHIMP_API_KEY is required".into()))?;

        let base_url = match env::var("MAILCHIMP_BASE_URL") {
            Ok(url) if !url.trim().is_empty() => url.trim_end_matches('/').to_string(),
            _ => base_url_for_key(&api_key)?,
        };

        Ok(Self {
            api_key,
            base_url,
            request_timeout: env_duration_millis("MAILCHIMP_TIMEOUT_MS", DEFAULT_TIMEOUT_MS),
            user_agent: env_string("MAILCHIMP_USER_AGENT", DEFAULT_USER_AGENT),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}
