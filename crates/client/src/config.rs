//! Client configuration.

/// Configuration for the back-office API client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the hotel-operations API, without a trailing slash.
    pub api_url: String,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Watchdog safety-net interval in seconds (default: `60`).
    pub watchdog_interval_secs: u64,
}

/// Default API base URL for local development.
const DEFAULT_API_URL: &str = "http://localhost:5000/api";

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                            | Default                     |
    /// |------------------------------------|-----------------------------|
    /// | `CONCIERGE_API_URL`                | `http://localhost:5000/api` |
    /// | `CONCIERGE_REQUEST_TIMEOUT_SECS`   | `30`                        |
    /// | `CONCIERGE_WATCHDOG_INTERVAL_SECS` | `60`                        |
    ///
    /// # Panics
    ///
    /// Panics if a numeric variable is set but not parseable.
    pub fn from_env() -> Self {
        let api_url =
            std::env::var("CONCIERGE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());

        let request_timeout_secs: u64 = std::env::var("CONCIERGE_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("CONCIERGE_REQUEST_TIMEOUT_SECS must be a valid u64");

        let watchdog_interval_secs: u64 = std::env::var("CONCIERGE_WATCHDOG_INTERVAL_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("CONCIERGE_WATCHDOG_INTERVAL_SECS must be a valid u64");

        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            request_timeout_secs,
            watchdog_interval_secs,
        }
    }

    /// A config pointed at `api_url`, with defaults otherwise.
    pub fn for_api(api_url: impl Into<String>) -> Self {
        let api_url: String = api_url.into();
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            request_timeout_secs: 30,
            watchdog_interval_secs: 60,
        }
    }
}
