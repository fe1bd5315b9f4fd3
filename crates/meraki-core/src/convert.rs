// ── API record → metric identity conversion ──
//
// Every metric family needs the same label dimensions on every update, so
// each label set is a fixed-size struct whose fields are always populated.
// Absent or blank API fields become the literal "Unknown".

use meraki_api::{DeviceStatus, Organization, TimeSeriesPoint, UplinkLossLatency};
use strum::EnumString;

/// Placeholder for any label value the API did not supply.
pub const UNKNOWN: &str = "Unknown";

pub const DEVICE_LABEL_NAMES: [&str; 7] = [
    "serial",
    "name",
    "networkId",
    "productType",
    "model",
    "orgName",
    "orgId",
];

pub const UPLINK_LABEL_NAMES: [&str; 6] = ["serial", "networkId", "uplink", "ip", "orgName", "orgId"];

fn label(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(ToOwned::to_owned)
}

fn label_or_unknown(value: Option<&str>) -> String {
    label(value).unwrap_or_else(|| UNKNOWN.to_owned())
}

// ── Device health ────────────────────────────────────────────────────

/// Device status as published on `meraki_device_status`.
///
/// Parsing is exact and case-sensitive: `"Online"` is not `online`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum DeviceHealth {
    Dormant,
    Online,
    Alerting,
    Offline,
    Unknown,
}

impl DeviceHealth {
    /// Map a raw status string; anything unrecognized (or absent) is `Unknown`.
    pub fn from_status(status: Option<&str>) -> Self {
        status
            .and_then(|s| s.parse().ok())
            .unwrap_or(Self::Unknown)
    }

    /// Gauge value: dormant=0, online=1, alerting=2, offline=3, unknown=-1.
    pub fn code(self) -> i64 {
        match self {
            Self::Dormant => 0,
            Self::Online => 1,
            Self::Alerting => 2,
            Self::Offline => 3,
            Self::Unknown => -1,
        }
    }
}

// ── Organization ─────────────────────────────────────────────────────

/// Organization dimensions attached to every sample in a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgLabels {
    pub name: String,
    pub id: String,
}

impl From<&Organization> for OrgLabels {
    fn from(org: &Organization) -> Self {
        Self {
            name: label_or_unknown(org.name.as_deref()),
            id: label_or_unknown(org.id.as_deref()),
        }
    }
}

// ── Device status labels ─────────────────────────────────────────────

/// Label identity for one `meraki_device_status` sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceLabels {
    pub serial: String,
    /// Device name, else its MAC address, else "Unknown".
    pub name: String,
    pub network_id: String,
    pub product_type: String,
    pub model: String,
    pub org_name: String,
    pub org_id: String,
}

impl DeviceLabels {
    pub fn new(device: &DeviceStatus, org: &OrgLabels) -> Self {
        let name = label(device.name.as_deref())
            .or_else(|| label(device.mac.as_deref()))
            .unwrap_or_else(|| UNKNOWN.to_owned());

        Self {
            serial: label_or_unknown(device.serial.as_deref()),
            name,
            network_id: label_or_unknown(device.network_id.as_deref()),
            product_type: label_or_unknown(device.product_type.as_deref()),
            model: label_or_unknown(device.model.as_deref()),
            org_name: org.name.clone(),
            org_id: org.id.clone(),
        }
    }

    /// Values in [`DEVICE_LABEL_NAMES`] order.
    pub fn values(&self) -> [&str; 7] {
        [
            &self.serial,
            &self.name,
            &self.network_id,
            &self.product_type,
            &self.model,
            &self.org_name,
            &self.org_id,
        ]
    }
}

// ── Uplink labels ────────────────────────────────────────────────────

/// Label identity shared by the uplink loss and latency samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UplinkLabels {
    pub serial: String,
    pub network_id: String,
    pub uplink: String,
    pub ip: String,
    pub org_name: String,
    pub org_id: String,
}

impl UplinkLabels {
    pub fn new(uplink: &UplinkLossLatency, org: &OrgLabels) -> Self {
        Self {
            serial: label_or_unknown(uplink.serial.as_deref()),
            network_id: label_or_unknown(uplink.network_id.as_deref()),
            uplink: label_or_unknown(uplink.uplink.as_deref()),
            ip: label_or_unknown(uplink.ip.as_deref()),
            org_name: org.name.clone(),
            org_id: org.id.clone(),
        }
    }

    /// Values in [`UPLINK_LABEL_NAMES`] order.
    pub fn values(&self) -> [&str; 6] {
        [
            &self.serial,
            &self.network_id,
            &self.uplink,
            &self.ip,
            &self.org_name,
            &self.org_id,
        ]
    }
}

/// Loss percent and latency (ms) of a sample; nulls read as zero.
pub fn loss_and_latency(point: &TimeSeriesPoint) -> (f64, f64) {
    (
        point.loss_percent.unwrap_or(0.0),
        point.latency_ms.unwrap_or(0.0),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn org() -> OrgLabels {
        OrgLabels {
            name: "DevNet Sandbox".into(),
            id: "549236".into(),
        }
    }

    #[test]
    fn known_statuses_map_to_codes() {
        let cases = [("dormant", 0), ("online", 1), ("alerting", 2), ("offline", 3)];
        for (status, code) in cases {
            assert_eq!(DeviceHealth::from_status(Some(status)).code(), code, "{status}");
        }
    }

    #[test]
    fn unrecognized_statuses_map_to_minus_one() {
        for status in ["Online", "OFFLINE", "rebooting", "", "unknown", " online"] {
            assert_eq!(DeviceHealth::from_status(Some(status)).code(), -1, "{status:?}");
        }
        assert_eq!(DeviceHealth::from_status(None), DeviceHealth::Unknown);
    }

    #[test]
    fn device_name_falls_back_to_mac_then_unknown() {
        let with_mac = DeviceStatus {
            mac: Some("00:18:0a:00:00:01".into()),
            ..DeviceStatus::default()
        };
        assert_eq!(DeviceLabels::new(&with_mac, &org()).name, "00:18:0a:00:00:01");

        let bare = DeviceStatus::default();
        assert_eq!(DeviceLabels::new(&bare, &org()).name, UNKNOWN);

        let named = DeviceStatus {
            name: Some("HQ Gateway".into()),
            mac: Some("00:18:0a:00:00:01".into()),
            ..DeviceStatus::default()
        };
        assert_eq!(DeviceLabels::new(&named, &org()).name, "HQ Gateway");
    }

    #[test]
    fn device_labels_are_fully_populated() {
        let labels = DeviceLabels::new(&DeviceStatus::default(), &org());
        assert_eq!(
            labels.values(),
            [UNKNOWN, UNKNOWN, UNKNOWN, UNKNOWN, UNKNOWN, "DevNet Sandbox", "549236"]
        );
    }

    #[test]
    fn org_labels_default_to_unknown() {
        let labels = OrgLabels::from(&Organization::default());
        assert_eq!(labels.name, UNKNOWN);
        assert_eq!(labels.id, UNKNOWN);
    }

    #[test]
    fn uplink_labels_follow_name_order() {
        let uplink = UplinkLossLatency {
            serial: Some("Q2QN-9J8L-SLPD".into()),
            network_id: Some("N_24329156".into()),
            uplink: Some("wan1".into()),
            ip: None,
            time_series: Vec::new(),
        };
        assert_eq!(
            UplinkLabels::new(&uplink, &org()).values(),
            ["Q2QN-9J8L-SLPD", "N_24329156", "wan1", UNKNOWN, "DevNet Sandbox", "549236"]
        );
    }

    #[test]
    fn null_sample_values_read_as_zero() {
        let point = TimeSeriesPoint {
            ts: None,
            loss_percent: None,
            latency_ms: Some(12.5),
        };
        assert_eq!(loss_and_latency(&point), (0.0, 12.5));
    }
}
