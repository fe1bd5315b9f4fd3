//! Configuration for `meraki-exporter`.
//!
//! Settings are layered lowest to highest: built-in defaults, an optional
//! TOML file, `MERAKI_*` environment variables, then command-line overrides.
//! The result is validated and translated into `meraki_core::CollectorConfig`.
//! Missing credentials are not an error here; the collector reports them on
//! every cycle instead.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use meraki_core::CollectorConfig;
use meraki_core::config::{DEFAULT_PER_PAGE, DEFAULT_UPLINK_TIMESPAN_SECS};

/// Environment variable prefix for every setting.
pub const ENV_PREFIX: &str = "MERAKI_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// Every exporter setting after layering.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExporterSettings {
    /// Organization to poll.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_string"
    )]
    pub org_id: Option<String>,

    /// Dashboard API key. Never serialized.
    #[serde(default, skip_serializing, deserialize_with = "lenient_secret")]
    pub api_key: Option<SecretString>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Scrape endpoint bind address.
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_per_page")]
    pub per_page: u32,

    #[serde(default = "default_uplink_timespan_secs")]
    pub uplink_timespan_secs: u32,
}

impl Default for ExporterSettings {
    fn default() -> Self {
        Self {
            org_id: None,
            api_key: None,
            base_url: default_base_url(),
            listen: default_listen(),
            interval_secs: default_interval_secs(),
            timeout_secs: default_timeout_secs(),
            per_page: default_per_page(),
            uplink_timespan_secs: default_uplink_timespan_secs(),
        }
    }
}

fn default_base_url() -> String {
    meraki_core::config::DEFAULT_BASE_URL.into()
}
fn default_listen() -> String {
    "0.0.0.0:9090".into()
}
fn default_interval_secs() -> u64 {
    60
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}
fn default_uplink_timespan_secs() -> u32 {
    DEFAULT_UPLINK_TIMESPAN_SECS
}

/// Command-line values that win over every other layer.
#[derive(Debug, Default, Clone, Serialize)]
pub struct SettingsOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

// A bare `org_id = 549236` in TOML arrives as a number; IDs and keys are
// still strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Unsigned(n) => n.to_string(),
            Self::Signed(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
        }
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Scalar>::deserialize(de)?.map(Scalar::into_string))
}

fn lenient_secret<'de, D: Deserializer<'de>>(de: D) -> Result<Option<SecretString>, D::Error> {
    Ok(lenient_string(de)?.map(SecretString::from))
}

impl ExporterSettings {
    /// Parsed scrape endpoint address.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.listen
            .parse()
            .map_err(|e| invalid("listen", format!("'{}': {e}", self.listen)))
    }

    /// Reject values no cycle could run with. Credentials are not checked.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url: url::Url = self
            .base_url
            .parse()
            .map_err(|e| invalid("base_url", format!("'{}': {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(
                "base_url",
                format!("expected an http(s) URL, got '{}'", self.base_url),
            ));
        }
        if self.interval_secs == 0 {
            return Err(invalid("interval_secs", "must be greater than zero"));
        }
        if self.timeout_secs == 0 {
            return Err(invalid("timeout_secs", "must be greater than zero"));
        }
        if self.per_page == 0 {
            return Err(invalid("per_page", "must be greater than zero"));
        }
        if self.uplink_timespan_secs == 0 {
            return Err(invalid("uplink_timespan_secs", "must be greater than zero"));
        }
        self.listen_addr()?;
        Ok(())
    }

    /// Validate and build the collector's runtime config.
    pub fn to_collector_config(&self) -> Result<CollectorConfig, ConfigError> {
        self.validate()?;

        Ok(CollectorConfig {
            base_url: self.base_url.clone(),
            org_id: self
                .org_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(ToOwned::to_owned),
            api_key: self.api_key.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            interval: Duration::from_secs(self.interval_secs),
            per_page: self.per_page,
            uplink_timespan_secs: self.uplink_timespan_secs,
        })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Platform config file location (e.g. `~/.config/meraki-exporter/config.toml`).
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "meraki-exporter", "meraki-exporter").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("meraki-exporter");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Loading ─────────────────────────────────────────────────────────

/// Layer defaults, TOML, environment, and `overrides`.
///
/// An explicit `path` must exist; the platform default path is optional.
pub fn load_settings(
    path: Option<&Path>,
    overrides: &SettingsOverrides,
) -> Result<ExporterSettings, ConfigError> {
    let file = match path {
        Some(p) if !p.exists() => return Err(ConfigError::NotFound(p.to_path_buf())),
        Some(p) => p.to_path_buf(),
        None => config_path(),
    };

    let settings: ExporterSettings = Figment::new()
        .merge(Serialized::defaults(ExporterSettings::default()))
        .merge(Toml::file(&file))
        .merge(Env::prefixed(ENV_PREFIX).ignore(&VERBATIM_ENV_KEYS))
        .merge(verbatim_env())
        .merge(Serialized::defaults(overrides))
        .extract()?;

    Ok(settings)
}

const VERBATIM_ENV_KEYS: [&str; 2] = ["org_id", "api_key"];

// Credentials are taken as written so `0012345` keeps its leading zeros.
fn verbatim_env() -> Figment {
    VERBATIM_ENV_KEYS.iter().fold(Figment::new(), |figment, key| {
        let var = format!("{ENV_PREFIX}{}", key.to_ascii_uppercase());
        match std::env::var(var) {
            Ok(value) => figment.merge(Serialized::default(key, value)),
            Err(_) => figment,
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn load(jail: &Jail, overrides: &SettingsOverrides) -> figment::error::Result<ExporterSettings> {
        let path = jail.directory().join("config.toml");
        load_settings(Some(&path), overrides).map_err(|e| e.to_string().into())
    }

    #[test]
    fn defaults_apply_without_file_values() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "")?;
            let settings = load(jail, &SettingsOverrides::default())?;

            assert_eq!(settings.base_url, "https://api.meraki.com/api/v1");
            assert_eq!(settings.listen, "0.0.0.0:9090");
            assert_eq!(settings.interval_secs, 60);
            assert_eq!(settings.timeout_secs, 30);
            assert_eq!(settings.per_page, 1000);
            assert_eq!(settings.uplink_timespan_secs, 300);
            assert!(settings.org_id.is_none());
            assert!(settings.api_key.is_none());
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file_and_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                org_id = "111"
                listen = "127.0.0.1:9100"
                interval_secs = 120
                "#,
            )?;
            jail.set_env("MERAKI_INTERVAL_SECS", "30");
            jail.set_env("MERAKI_API_KEY", "6bec40cf957de430a6f1f2baa056b99a4fac9ea0");

            let settings = load(jail, &SettingsOverrides::default())?;

            assert_eq!(settings.org_id.as_deref(), Some("111"));
            assert_eq!(settings.listen, "127.0.0.1:9100");
            assert_eq!(settings.interval_secs, 30);
            assert_eq!(
                settings.api_key.as_ref().map(|k| k.expose_secret().to_owned()),
                Some("6bec40cf957de430a6f1f2baa056b99a4fac9ea0".to_owned())
            );
            Ok(())
        });
    }

    #[test]
    fn numeric_env_org_id_stays_a_string() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "")?;
            jail.set_env("MERAKI_ORG_ID", "549236");

            let settings = load(jail, &SettingsOverrides::default())?;

            assert_eq!(settings.org_id.as_deref(), Some("549236"));
            Ok(())
        });
    }

    #[test]
    fn env_credentials_keep_leading_zeros() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "org_id = \"111\"\n")?;
            jail.set_env("MERAKI_ORG_ID", "0012345");
            jail.set_env("MERAKI_API_KEY", "000123");

            let settings = load(jail, &SettingsOverrides::default())?;

            assert_eq!(settings.org_id.as_deref(), Some("0012345"));
            assert_eq!(
                settings.api_key.as_ref().map(|k| k.expose_secret().to_owned()),
                Some("000123".to_owned())
            );
            Ok(())
        });
    }

    #[test]
    fn bare_numeric_org_id_in_file_is_accepted() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "org_id = 549236\n")?;

            let settings = load(jail, &SettingsOverrides::default())?;

            assert_eq!(settings.org_id.as_deref(), Some("549236"));
            Ok(())
        });
    }

    #[test]
    fn overrides_win_over_env() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "")?;
            jail.set_env("MERAKI_LISTEN", "0.0.0.0:9999");
            jail.set_env("MERAKI_TIMEOUT_SECS", "5");

            let overrides = SettingsOverrides {
                listen: Some("127.0.0.1:8080".into()),
                ..SettingsOverrides::default()
            };
            let settings = load(jail, &overrides)?;

            assert_eq!(settings.listen, "127.0.0.1:8080");
            assert_eq!(settings.timeout_secs, 5);
            Ok(())
        });
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = load_settings(
            Some(Path::new("/nonexistent/meraki-exporter.toml")),
            &SettingsOverrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn missing_credentials_are_not_a_config_error() {
        let config = ExporterSettings::default().to_collector_config();
        assert!(config.is_ok_and(|c| c.missing_settings() == vec!["org_id", "api_key"]));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let settings = ExporterSettings {
            interval_secs: 0,
            ..ExporterSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "interval_secs"
        ));
    }

    #[test]
    fn bad_base_url_and_listen_are_rejected() {
        let bad_url = ExporterSettings {
            base_url: "not a url".into(),
            ..ExporterSettings::default()
        };
        assert!(bad_url.validate().is_err());

        let ftp = ExporterSettings {
            base_url: "ftp://api.meraki.com/api/v1".into(),
            ..ExporterSettings::default()
        };
        assert!(ftp.validate().is_err());

        let bad_listen = ExporterSettings {
            listen: "localhost".into(),
            ..ExporterSettings::default()
        };
        assert!(matches!(
            bad_listen.listen_addr(),
            Err(ConfigError::Validation { ref field, .. }) if field == "listen"
        ));
    }

    #[test]
    fn blank_org_id_becomes_none() {
        let settings = ExporterSettings {
            org_id: Some("  ".into()),
            ..ExporterSettings::default()
        };
        let config = settings.to_collector_config().map(|c| c.org_id);
        assert!(matches!(config, Ok(None)));
    }
}
