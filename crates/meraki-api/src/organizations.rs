// Organization-scoped endpoints
//
// Metadata, device status list, and uplink loss/latency. The list endpoints
// are fetched as a single page; the Dashboard's Link-header pagination is
// intentionally not followed.

use tracing::debug;

use crate::client::MerakiClient;
use crate::error::Error;
use crate::models::{DeviceStatus, Organization, UplinkLossLatency};

impl MerakiClient {
    /// Fetch organization metadata.
    ///
    /// `GET /organizations/{organizationId}`
    pub async fn get_organization(&self, org_id: &str) -> Result<Organization, Error> {
        let url = self.endpoint(&["organizations", org_id])?;
        debug!(org_id, "fetching organization");
        self.get(url).await
    }

    /// List the status of every device in the organization (first page only).
    ///
    /// `GET /organizations/{organizationId}/devices/statuses?perPage={per_page}`
    pub async fn list_device_statuses(
        &self,
        org_id: &str,
        per_page: u32,
    ) -> Result<Vec<DeviceStatus>, Error> {
        let url = self.endpoint(&["organizations", org_id, "devices", "statuses"])?;
        debug!(org_id, per_page, "listing device statuses");
        self.get_records(url, &[("perPage", per_page.to_string())])
            .await
    }

    /// Uplink loss and latency samples for the last `timespan_secs` seconds.
    ///
    /// `GET /organizations/{organizationId}/devices/uplinksLossAndLatency?timespan={timespan_secs}`
    pub async fn list_uplinks_loss_and_latency(
        &self,
        org_id: &str,
        timespan_secs: u32,
    ) -> Result<Vec<UplinkLossLatency>, Error> {
        let url = self.endpoint(&[
            "organizations",
            org_id,
            "devices",
            "uplinksLossAndLatency",
        ])?;
        debug!(org_id, timespan_secs, "listing uplink loss and latency");
        self.get_records(url, &[("timespan", timespan_secs.to_string())])
            .await
    }
}
