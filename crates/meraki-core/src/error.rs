// ── Core error types ──
//
// `CollectError` is the single error union returned by the fetch/transform
// pipeline; it never escapes a collection cycle. `CoreError` covers the
// setup failures a caller can act on before any cycle runs.

use strum::{AsRefStr, Display};
use thiserror::Error;

/// The pipeline step that was running when a cycle aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum CollectStep {
    Organization,
    DeviceStatuses,
    UplinksLossAndLatency,
}

/// Why a collection cycle aborted.
#[derive(Debug, Error)]
pub enum CollectError {
    /// Required settings absent; no HTTP call was made.
    #[error("missing required configuration: {}", .missing.join(", "))]
    ConfigMissing { missing: Vec<&'static str> },

    /// A Dashboard call failed; later steps were skipped.
    #[error("{step} request failed: {source}")]
    Api {
        step: CollectStep,
        #[source]
        source: meraki_api::Error,
    },
}

impl CollectError {
    pub(crate) fn api(step: CollectStep) -> impl FnOnce(meraki_api::Error) -> Self {
        move |source| Self::Api { step, source }
    }

    /// Whether the next scheduled cycle is likely to succeed unchanged.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ConfigMissing { .. } => false,
            Self::Api { source, .. } => source.is_transient(),
        }
    }

    /// Short machine-friendly classification for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigMissing { .. } => "config_missing",
            Self::Api { source, .. } => match source {
                meraki_api::Error::Http { .. } => "http_status",
                meraki_api::Error::InvalidApiKey { .. }
                | meraki_api::Error::InvalidCredential { .. } => "auth",
                meraki_api::Error::RateLimited { .. } => "rate_limited",
                meraki_api::Error::Deserialization { .. } => "decode",
                meraki_api::Error::Transport(_)
                | meraki_api::Error::InvalidUrl(_)
                | meraki_api::Error::ClientBuild(_) => "transport",
            },
        }
    }
}

/// Setup errors surfaced to the binary.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Failed to create Dashboard client: {0}")]
    Client(#[from] meraki_api::Error),

    #[error("Metric registry error: {0}")]
    Metrics(#[from] prometheus::Error),
}
