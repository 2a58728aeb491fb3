//! Client configuration
//!
//! Read once at startup from the environment.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the check-in client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base address of the conversation service, without trailing slash
    pub api_url: String,
    /// Transport-level timeout for a single request
    pub request_timeout: Duration,
    /// Directory holding `checkin.log`
    pub log_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_dir: default_log_dir(None),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup (tests pass a map)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_url = lookup("CHECKIN_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout_secs = lookup("CHECKIN_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let log_dir = lookup("CHECKIN_LOG_DIR")
            .filter(|dir| !dir.is_empty())
            .map_or_else(|| default_log_dir(lookup("HOME")), PathBuf::from);

        Self {
            api_url,
            request_timeout: Duration::from_secs(timeout_secs),
            log_dir,
        }
    }

    /// Full URL for a service endpoint, e.g. `endpoint("start-session")`
    pub fn endpoint(&self, name: &str) -> String {
        format!("{}/{name}", self.api_url)
    }
}

fn default_log_dir(home: Option<String>) -> PathBuf {
    let home = home.unwrap_or_else(|| "/tmp".to_string());
    PathBuf::from(home).join(".checkin")
}
