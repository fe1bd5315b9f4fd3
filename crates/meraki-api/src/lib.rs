// meraki-api: Async Rust client for the Meraki Dashboard API (v1)
//
// Only the organization-scoped health endpoints the exporter needs are
// modelled: organization metadata, device statuses, and uplink loss/latency.

pub mod client;
pub mod error;
pub mod models;
pub mod organizations;
pub mod transport;

pub use client::{DEFAULT_BASE_URL, MerakiClient};
pub use error::Error;
pub use models::{DeviceStatus, Organization, TimeSeriesPoint, UplinkLossLatency};
pub use transport::TransportConfig;
