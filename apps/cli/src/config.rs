use std::path::PathBuf;
use std::time::Duration;

use verdict_harness::backend::{DEFAULT_ENDPOINT, DEFAULT_REQUEST_TIMEOUT};
use verdict_harness::pacing::DEFAULT_REQUEST_DELAY;

/// Settings read from the environment (and `.env`). Command-line flags
/// override them per invocation.
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    pub model: String,
    pub request_delay: Duration,
    pub request_timeout: Duration,
    pub prompts_file: PathBuf,
    pub context_file: PathBuf,
    pub output_file: PathBuf,
    pub log_format: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let millis = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(default)
        };

        Self {
            endpoint: var("VERDICT_ENDPOINT", DEFAULT_ENDPOINT),
            model: var("VERDICT_MODEL", "filter"),
            request_delay: millis("VERDICT_REQUEST_DELAY_MS", DEFAULT_REQUEST_DELAY),
            request_timeout: millis("VERDICT_REQUEST_TIMEOUT_MS", DEFAULT_REQUEST_TIMEOUT),
            prompts_file: var("VERDICT_PROMPTS", "prompts.txt").into(),
            context_file: var("VERDICT_CONTEXT_FILE", "context.txt").into(),
            output_file: var("VERDICT_OUTPUT", "responses.json").into(),
            log_format: var("VERDICT_LOG_FORMAT", "text"),
        }
    }
}
