// Standard library
use std::path::PathBuf;
use std::sync::Arc;

// 3rd party crates
use serde::Deserialize;

// Project imports
use crate::checks::types::Group;

use super::constants::{
    default_listen, default_log_format, default_log_level, default_max_in_flight,
    default_metrics_path,
};

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct Log {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `text` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Append logs to this file instead of stdout.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct Server {
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default = "default_metrics_path")]
    pub metrics_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct Probe {
    /// Upper bound on concurrently running probes within one scrape
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Mtls {
    #[serde(default)]
    pub enabled: bool,
    /// PEM certificate chain presented by the exporter
    #[serde(default)]
    pub cert: Option<PathBuf>,
    /// PEM private key matching `cert`
    #[serde(default)]
    pub key: Option<PathBuf>,
    /// PEM bundle used to verify client certificates, `cert` when unset
    #[serde(default)]
    pub client_ca: Option<PathBuf>,
    /// Client certificate common names allowed to scrape
    #[serde(default, alias = "allowedCN", alias = "allowedcn")]
    pub allowed_cn: Vec<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(from = "RawSettings")]
pub struct Settings {
    pub log: Log,
    pub server: Server,
    pub probe: Probe,
    pub mtls: Mtls,
    pub groups: Vec<Group>,
}

/// Settings as written in the configuration file.
///
/// Besides the sectioned layout this accepts the flat `config.json` layout
/// (`logLevel`, `logPath`, `mtlsExporter`, `groupsDns`). Unknown keys are
/// rejected in both.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSettings {
    #[serde(default)]
    pub(super) log: Log,
    #[serde(default)]
    pub(super) server: Server,
    #[serde(default)]
    pub(super) probe: Probe,

    #[serde(default, alias = "mtlsExporter", alias = "mtlsexporter")]
    pub(super) mtls: Mtls,

    #[serde(default, alias = "groupsDns", alias = "groupsdns")]
    pub(super) groups: Vec<Group>,

    /// Flat form of `log.level`
    #[serde(default, rename = "logLevel", alias = "loglevel")]
    pub(super) log_level: Option<String>,
    /// Flat form of `log.path`
    #[serde(default, rename = "logPath", alias = "logpath")]
    pub(super) log_path: Option<PathBuf>,
}

/// Settings that passed [`Settings::validate`].
#[derive(Debug)]
pub struct ValidatedSettings(pub(super) Settings);

/// Loads the application settings once at startup.
pub struct ConfigManager {
    pub settings: Arc<Settings>,
    pub config_path: PathBuf,
    /// Whether the default configuration was written to `config_path`
    pub default_written: bool,
}
