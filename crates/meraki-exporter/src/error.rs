//! Startup errors with miette diagnostics.
//!
//! Only failures that stop the process live here. Collection failures are
//! contained by the collector and never reach this type.

use std::net::SocketAddr;

use miette::Diagnostic;
use thiserror::Error;

use meraki_config::ConfigError;
use meraki_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(unused_assignments)]
pub enum ExporterError {
    // ── Configuration ────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(
        code(meraki_exporter::validation),
        help("Fix it in the config file or override it with the matching MERAKI_* variable.")
    )]
    Validation { field: String, reason: String },

    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(meraki_exporter::no_config),
        help("Pass an existing file with --config, or omit it to use environment variables.")
    )]
    NoConfig { path: String },

    #[error("Failed to load configuration")]
    #[diagnostic(
        code(meraki_exporter::config),
        help("Check the TOML syntax and the types of MERAKI_* environment variables.")
    )]
    Config {
        #[source]
        source: ConfigError,
    },

    // ── Startup ──────────────────────────────────────────────────────

    #[error("Exporter setup failed")]
    #[diagnostic(code(meraki_exporter::setup))]
    Setup(#[from] CoreError),

    #[error("Could not bind scrape endpoint on {addr}")]
    #[diagnostic(
        code(meraki_exporter::bind),
        help("Another process may hold the port. Choose another with --listen or MERAKI_LISTEN.")
    )]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Scrape endpoint stopped unexpectedly")]
    #[diagnostic(code(meraki_exporter::serve))]
    Serve(#[source] std::io::Error),
}

impl From<ConfigError> for ExporterError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NotFound(path) => Self::NoConfig {
                path: path.display().to_string(),
            },
            other @ ConfigError::Figment(_) => Self::Config { source: other },
        }
    }
}

impl ExporterError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } | Self::NoConfig { .. } | Self::Config { .. } => {
                exit_code::USAGE
            }
            Self::Bind { .. } => exit_code::CONNECTION,
            Self::Setup(_) | Self::Serve(_) => exit_code::GENERAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn config_errors_are_usage_errors() {
        let err = ExporterError::from(ConfigError::Validation {
            field: "interval_secs".into(),
            reason: "must be greater than zero".into(),
        });
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert_eq!(
            err.to_string(),
            "Invalid value for interval_secs: must be greater than zero"
        );

        let err = ExporterError::from(ConfigError::NotFound(PathBuf::from("/etc/meraki.toml")));
        assert!(matches!(err, ExporterError::NoConfig { ref path } if path == "/etc/meraki.toml"));
    }

    #[test]
    fn bind_failure_has_its_own_exit_code() {
        let err = ExporterError::Bind {
            addr: SocketAddr::from(([127, 0, 0, 1], 9090)),
            source: std::io::Error::from(std::io::ErrorKind::AddrInUse),
        };
        assert_eq!(err.exit_code(), exit_code::CONNECTION);
    }
}
