// ── Runtime collector configuration ──
//
// Describes *what* to poll and how often. Carries the credential but never
// touches disk; `meraki-config` builds this and hands it in.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

pub use meraki_api::DEFAULT_BASE_URL;

/// Dashboard device status page size; larger organizations are truncated.
pub const DEFAULT_PER_PAGE: u32 = 1000;

/// Uplink loss/latency lookback window.
pub const DEFAULT_UPLINK_TIMESPAN_SECS: u32 = 300;

/// Configuration for the collection cycle.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Dashboard API root (e.g., `https://api.meraki.com/api/v1`).
    pub base_url: String,
    /// Organization to poll. `None` aborts every cycle.
    pub org_id: Option<String>,
    /// Dashboard API key. `None` aborts every cycle.
    pub api_key: Option<SecretString>,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    /// Sleep between the end of one cycle and the start of the next.
    pub interval: Duration,
    pub per_page: u32,
    pub uplink_timespan_secs: u32,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            org_id: None,
            api_key: None,
            timeout: Duration::from_secs(30),
            interval: Duration::from_secs(60),
            per_page: DEFAULT_PER_PAGE,
            uplink_timespan_secs: DEFAULT_UPLINK_TIMESPAN_SECS,
        }
    }
}

impl CollectorConfig {
    /// Names of required settings that are absent or blank.
    pub fn missing_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.org_id.as_deref().is_none_or(|id| id.trim().is_empty()) {
            missing.push("org_id");
        }
        if self
            .api_key
            .as_ref()
            .is_none_or(|key| key.expose_secret().trim().is_empty())
        {
            missing.push("api_key");
        }
        missing
    }
}
