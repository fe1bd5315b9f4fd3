// ── Collection cycle ──
//
// Fetches organization metadata, device statuses, and uplink loss/latency,
// then overwrites the matching registry samples. A failed step ends the
// cycle; samples not yet written keep their previous values.

use std::sync::Arc;
use std::time::Instant;

use meraki_api::{DeviceStatus, MerakiClient, TransportConfig, UplinkLossLatency};
use tracing::{debug, error, info, warn};

use crate::config::CollectorConfig;
use crate::convert::{DeviceHealth, DeviceLabels, OrgLabels, UplinkLabels, loss_and_latency};
use crate::error::{CollectError, CollectStep, CoreError};
use crate::metrics::ExporterMetrics;

/// Counts from one successful cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleSummary {
    pub org: OrgLabels,
    pub devices: usize,
    pub uplinks: usize,
    pub skipped_uplinks: usize,
}

/// Publishes `request_processing_seconds` when dropped, however the cycle ends.
struct CycleTimer<'a> {
    metrics: &'a ExporterMetrics,
    started: Instant,
}

impl<'a> CycleTimer<'a> {
    fn start(metrics: &'a ExporterMetrics) -> Self {
        Self {
            metrics,
            started: Instant::now(),
        }
    }
}

impl Drop for CycleTimer<'_> {
    fn drop(&mut self) {
        let elapsed = self.started.elapsed().as_secs_f64();
        self.metrics.set_processing_seconds(elapsed);
        info!(elapsed_secs = elapsed, "metrics collection completed in {elapsed:.2} seconds");
    }
}

/// One Dashboard organization polled into one metric registry.
pub struct Collector {
    config: CollectorConfig,
    client: Option<MerakiClient>,
    metrics: Arc<ExporterMetrics>,
}

impl Collector {
    /// Build a collector. The HTTP client is only created when every
    /// required setting is present; otherwise each cycle aborts up front.
    pub fn new(config: CollectorConfig, metrics: Arc<ExporterMetrics>) -> Result<Self, CoreError> {
        let client = match config.api_key {
            Some(ref key) if config.missing_settings().is_empty() => {
                let transport = TransportConfig::default().with_timeout(config.timeout);
                Some(MerakiClient::from_api_key(&config.base_url, key, &transport)?)
            }
            _ => None,
        };

        Ok(Self {
            config,
            client,
            metrics,
        })
    }

    /// Run one cycle. Never fails: the outcome is logged once.
    ///
    /// Without credentials the registry is left untouched, timing gauge
    /// included. Otherwise the timing gauge is updated however the cycle ends.
    pub async fn run_cycle(&self) {
        if self.client.is_none() {
            error!(
                kind = "config_missing",
                missing = ?self.config.missing_settings(),
                "MERAKI_ORG_ID and MERAKI_API_KEY must be set; skipping collection"
            );
            return;
        }

        let _timer = CycleTimer::start(&self.metrics);

        match self.collect().await {
            Ok(summary) => info!(
                org = %summary.org.name,
                devices = summary.devices,
                uplinks = summary.uplinks,
                skipped_uplinks = summary.skipped_uplinks,
                "metrics updated"
            ),
            Err(e) => error!(
                kind = e.kind(),
                transient = e.is_transient(),
                error = %e,
                "collection cycle aborted"
            ),
        }
    }

    /// The fetch/transform pipeline behind [`run_cycle`](Self::run_cycle).
    pub async fn collect(&self) -> Result<CycleSummary, CollectError> {
        let (Some(client), Some(org_id)) = (self.client.as_ref(), self.config.org_id.as_deref())
        else {
            return Err(CollectError::ConfigMissing {
                missing: self.config.missing_settings(),
            });
        };

        let org = client
            .get_organization(org_id)
            .await
            .map_err(CollectError::api(CollectStep::Organization))?;
        let org = OrgLabels::from(&org);
        debug!(org_name = %org.name, org_id = %org.id, "resolved organization");

        let per_page = self.config.per_page;
        let devices = client
            .list_device_statuses(org_id, per_page)
            .await
            .map_err(CollectError::api(CollectStep::DeviceStatuses))?;
        info!(count = devices.len(), "fetched devices from device status API");
        if usize::try_from(per_page).is_ok_and(|limit| devices.len() >= limit) {
            warn!(
                per_page,
                "device status page is full; devices beyond the first page are not exported"
            );
        }

        let device_count = publish_device_statuses(&self.metrics, &devices, &org);

        let uplinks = client
            .list_uplinks_loss_and_latency(org_id, self.config.uplink_timespan_secs)
            .await
            .map_err(CollectError::api(CollectStep::UplinksLossAndLatency))?;
        info!(count = uplinks.len(), "fetched uplink entries from loss and latency API");

        let (uplink_count, skipped) = publish_uplinks(&self.metrics, &uplinks, &org);

        Ok(CycleSummary {
            org,
            devices: device_count,
            uplinks: uplink_count,
            skipped_uplinks: skipped,
        })
    }
}

/// Write one status sample per device. Returns the number written.
pub fn publish_device_statuses(
    metrics: &ExporterMetrics,
    devices: &[DeviceStatus],
    org: &OrgLabels,
) -> usize {
    for device in devices {
        let labels = DeviceLabels::new(device, org);
        let health = DeviceHealth::from_status(device.status.as_deref());
        metrics.set_device_status(&labels, health);
    }
    devices.len()
}

/// Write loss and latency from each uplink's latest sample.
///
/// Uplinks with an empty window are skipped, not zero-filled.
/// Returns `(published, skipped)`.
pub fn publish_uplinks(
    metrics: &ExporterMetrics,
    uplinks: &[UplinkLossLatency],
    org: &OrgLabels,
) -> (usize, usize) {
    let mut published = 0;
    let mut skipped = 0;

    for uplink in uplinks {
        let labels = UplinkLabels::new(uplink, org);
        let Some(latest) = uplink.latest() else {
            warn!(
                serial = %labels.serial,
                uplink = %labels.uplink,
                "no time series data for device uplink"
            );
            skipped += 1;
            continue;
        };

        let (loss, latency) = loss_and_latency(latest);
        metrics.set_uplink(&labels, loss, latency);
        published += 1;
    }

    (published, skipped)
}
