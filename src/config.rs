use std::path::PathBuf;
use std::time::Duration;

use crate::api::gemini::GEMINI_API_BASE;
use crate::api::RetryPolicy;
use crate::content::Models;
use crate::error::{Result, StudioError};

pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Runtime settings resolved from the command line and environment.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub api_key: String,
    pub api_base: String,
    pub models: Models,
    pub retry: RetryPolicy,
    pub request_timeout: Duration,
    /// Where durable settings such as the channel list are kept.
    pub data_dir: PathBuf,
}

impl StudioConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            api_base: GEMINI_API_BASE.to_string(),
            models: Models::default(),
            retry: RetryPolicy::default(),
            request_timeout: Duration::from_secs(300),
            data_dir: PathBuf::from("./studio-data"),
        }
    }
}

/// An explicit key wins; otherwise the first non-empty of
/// `GEMINI_API_KEY` and `API_KEY`.
pub fn resolve_api_key(explicit: Option<String>) -> Result<String> {
    resolve_api_key_with(explicit, |name| std::env::var(name).ok())
}

fn resolve_api_key_with(
    explicit: Option<String>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String> {
    explicit
        .into_iter()
        .chain(API_KEY_VARS.iter().filter_map(|name| lookup(*name)))
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
        .ok_or_else(|| {
            StudioError::EnvError(format!(
                "API key not found. Set it via --api-key or the {} environment variable",
                API_KEY_VARS.join(" / ")
            ))
        })
}
