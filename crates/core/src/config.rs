// Client configuration
//
// Configuration for the backend client, the poller and local persistence,
// loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_HOST: &str = "localhost";
pub const DEFAULT_API_PORT: u16 = 5000;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_STREAM_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_STATE_FILE: &str = "sitewatch-state.json";

/// Configuration for the dashboard client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL including the `/api` prefix, without trailing slash
    pub api_base_url: String,

    /// Interval between status checks for a watched camera
    pub poll_interval: Duration,

    /// Interval between status checks while a stream is open
    pub stream_poll_interval: Duration,

    /// Where the local store snapshot is kept
    pub state_file: PathBuf,

    /// Per-request timeout; `None` keeps the transport default
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Create configuration from environment variables
    ///
    /// Environment variables:
    /// - `SITEWATCH_API_URL`: Full base URL (overrides host/port)
    /// - `SITEWATCH_API_HOST`: Backend host (default: localhost)
    /// - `SITEWATCH_API_PORT`: Backend port (default: 5000)
    /// - `SITEWATCH_POLL_INTERVAL_SECS`: Status poll interval (default: 30)
    /// - `SITEWATCH_STREAM_POLL_INTERVAL_SECS`: Stream viewer poll interval (default: 5)
    /// - `SITEWATCH_STATE_FILE`: Local state file (default: sitewatch-state.json)
    /// - `SITEWATCH_REQUEST_TIMEOUT_SECS`: Request timeout (default: none)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = match lookup("SITEWATCH_API_URL").filter(|v| !v.is_empty()) {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => {
                let host = lookup("SITEWATCH_API_HOST")
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| DEFAULT_API_HOST.to_string());
                let port = lookup("SITEWATCH_API_PORT")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_API_PORT);
                base_url_for(&host, port)
            }
        };

        let secs = |key: &str| {
            lookup(key)
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|v| *v > 0)
                .map(Duration::from_secs)
        };

        Self {
            api_base_url,
            poll_interval: secs("SITEWATCH_POLL_INTERVAL_SECS").unwrap_or(DEFAULT_POLL_INTERVAL),
            stream_poll_interval: secs("SITEWATCH_STREAM_POLL_INTERVAL_SECS")
                .unwrap_or(DEFAULT_STREAM_POLL_INTERVAL),
            state_file: lookup("SITEWATCH_STATE_FILE")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE)),
            request_timeout: secs("SITEWATCH_REQUEST_TIMEOUT_SECS"),
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_state_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_file = path.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// `http://<host>:<port>/api`
pub fn base_url_for(host: &str, port: u16) -> String {
    format!("http://{}:{}/api", host, port)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:5000/api");
        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert_eq!(config.stream_poll_interval, Duration::from_secs(5));
        assert_eq!(config.state_file, PathBuf::from("sitewatch-state.json"));
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn test_host_and_port() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("SITEWATCH_API_HOST", "10.1.1.2"),
            ("SITEWATCH_API_PORT", "8000"),
        ]));
        assert_eq!(config.api_base_url, "http://10.1.1.2:8000/api");
    }

    #[test]
    fn test_full_url_overrides_host() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("SITEWATCH_API_URL", "https://monitor.example.com/api/"),
            ("SITEWATCH_API_HOST", "ignored"),
        ]));
        assert_eq!(config.api_base_url, "https://monitor.example.com/api");
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("SITEWATCH_API_PORT", "not-a-port"),
            ("SITEWATCH_POLL_INTERVAL_SECS", "0"),
            ("SITEWATCH_REQUEST_TIMEOUT_SECS", "15"),
        ]));
        assert_eq!(config.api_base_url, "http://localhost:5000/api");
        assert_eq!(config.poll_interval, DEFAULT_POLL_INTERVAL);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
    }
}
