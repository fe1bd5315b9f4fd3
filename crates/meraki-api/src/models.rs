// Dashboard API response types
//
// Every field is optional because the Dashboard omits or nulls fields
// depending on product type and firmware. Callers decide on defaults.

use serde::{Deserialize, Serialize};

// ── Organization ─────────────────────────────────────────────────────

/// Organization object from `GET /organizations/{organizationId}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Catch-all for fields the exporter does not model.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Device status ────────────────────────────────────────────────────

/// One entry of `GET /organizations/{organizationId}/devices/statuses`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStatus {
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default)]
    pub network_id: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    /// `online`, `alerting`, `offline`, or `dormant`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Uplink loss and latency ──────────────────────────────────────────

/// One entry of `GET /organizations/{organizationId}/devices/uplinksLossAndLatency`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UplinkLossLatency {
    #[serde(default)]
    pub network_id: Option<String>,
    #[serde(default)]
    pub serial: Option<String>,
    /// Interface name, e.g. `wan1`, `wan2`, `cellular`.
    #[serde(default)]
    pub uplink: Option<String>,
    /// Destination IP that loss and latency are measured against.
    #[serde(default)]
    pub ip: Option<String>,
    /// Samples ordered oldest first.
    #[serde(default)]
    pub time_series: Vec<TimeSeriesPoint>,
}

impl UplinkLossLatency {
    /// The chronologically last sample, if the window holds any.
    pub fn latest(&self) -> Option<&TimeSeriesPoint> {
        self.time_series.last()
    }
}

/// A single loss/latency sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub loss_percent: Option<f64>,
    #[serde(default)]
    pub latency_ms: Option<f64>,
}
