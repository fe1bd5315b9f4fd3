use thiserror::Error;

/// Top-level error type for the `meraki-api` crate.
///
/// Covers every way a Dashboard API call can fail: credential rejection,
/// non-2xx responses, transport failures, and undecodable bodies.
/// `meraki-core` wraps these into its per-cycle error union.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The Dashboard rejected the API key (401/403).
    #[error("Invalid API key (HTTP {status})")]
    InvalidApiKey { status: u16 },

    /// The API key could not be encoded as an HTTP header value.
    #[error("Invalid API key header value: {message}")]
    InvalidCredential { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Failure while building the underlying `reqwest::Client`.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Dashboard API ───────────────────────────────────────────────
    /// Rate limited by the Dashboard. Includes retry-after in seconds.
    #[error("Rate limited -- retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Any other non-2xx response.
    #[error("Dashboard API error (HTTP {status}): {message}")]
    Http { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying next cycle.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::RateLimited { .. } => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
