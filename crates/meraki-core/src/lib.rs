//! Collection cycle and metric publication for `meraki-exporter`.
//!
//! - **[`Collector`]** - One request/transform/publish cycle against the
//!   Dashboard API. [`run_cycle()`](Collector::run_cycle) never fails: errors
//!   are logged once and previously published values stay in place.
//!
//! - **[`ExporterMetrics`]** - Owned Prometheus registry holding the device
//!   status, uplink loss/latency and cycle timing families. Shared with the
//!   scrape endpoint behind an `Arc`.
//!
//! - **[`run_periodic`]** - Run-to-completion scheduler driven by a
//!   `CancellationToken`; cycles never overlap.
//!
//! - **[`convert`]** - Mapping from API records onto stable label sets.

pub mod collector;
pub mod config;
pub mod convert;
pub mod error;
pub mod metrics;
pub mod poller;

// ── Primary re-exports ──────────────────────────────────────────────
pub use collector::{Collector, CycleSummary};
pub use config::CollectorConfig;
pub use convert::{DeviceHealth, DeviceLabels, OrgLabels, UplinkLabels};
pub use error::{CollectError, CollectStep, CoreError};
pub use metrics::ExporterMetrics;
pub use poller::{CollectionCycle, run_periodic};
