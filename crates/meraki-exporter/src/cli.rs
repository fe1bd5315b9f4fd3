use std::path::PathBuf;

use clap::{ArgAction, Parser};

use meraki_config::SettingsOverrides;

/// Prometheus exporter for Cisco Meraki Dashboard device health
#[derive(Debug, Parser)]
#[command(name = "meraki-exporter", version, about, long_about = None)]
pub struct Cli {
    /// TOML config file (defaults to the platform config directory)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Scrape endpoint bind address
    #[arg(long, value_name = "ADDR")]
    pub listen: Option<String>,

    /// Seconds between the end of one collection and the start of the next
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,

    /// Per-request Dashboard API timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Dashboard API root URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Flag values that take precedence over file and environment settings.
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            base_url: self.base_url.clone(),
            listen: self.listen.clone(),
            interval_secs: self.interval,
            timeout_secs: self.timeout,
        }
    }
}
