// Standard library
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{env, fs};

// 3rd party crates
use config::{Config, ConfigError, Environment, File};
use log::{error, info};

// Current module imports
use super::constants::{
    default_listen, default_log_format, default_log_level, default_max_in_flight,
    default_metrics_path, CONFIG_PATH_ENV, DEFAULT_CONFIG, ENV_PREFIX,
};
use super::errors::ValidationError;
use super::types::{
    ConfigManager, Log, Mtls, Probe, RawSettings, Server, Settings, ValidatedSettings,
};

impl Default for Log {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            path: None,
        }
    }
}

impl Default for Server {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            metrics_path: default_metrics_path(),
        }
    }
}

impl Default for Probe {
    fn default() -> Self {
        Self {
            max_in_flight: default_max_in_flight(),
        }
    }
}

impl From<RawSettings> for Settings {
    fn from(raw: RawSettings) -> Self {
        let mut log: Log = raw.log;
        if let Some(level) = raw.log_level.filter(|level| !level.is_empty()) {
            log.level = level;
        }
        if let Some(path) = raw.log_path {
            log.path = Some(path);
        }
        log.path = non_empty_path(log.path);

        let mut mtls: Mtls = raw.mtls;
        mtls.cert = non_empty_path(mtls.cert);
        mtls.key = non_empty_path(mtls.key);
        mtls.client_ca = non_empty_path(mtls.client_ca);

        Self {
            log,
            server: raw.server,
            probe: raw.probe,
            mtls,
            groups: raw.groups,
        }
    }
}

/// An empty path in the file means "not set".
fn non_empty_path(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|path| !path.as_os_str().is_empty())
}

impl Settings {
    /// Group names configured more than once, each reported once, in
    /// configuration order. Only the first group of each name is exported.
    pub fn duplicate_group_names(&self) -> Vec<&str> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut duplicates: Vec<&str> = Vec::new();
        for group in &self.groups {
            if !seen.insert(group.name.as_str()) && !duplicates.contains(&group.name.as_str()) {
                duplicates.push(group.name.as_str());
            }
        }
        duplicates
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        // Validate log level
        match self.log.level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            _ => return Err(ValidationError::InvalidLogLevel(self.log.level.clone())),
        }

        match self.log.format.to_lowercase().as_str() {
            "text" | "json" => {}
            _ => return Err(ValidationError::InvalidLogFormat(self.log.format.clone())),
        }

        if self.server.listen.parse::<SocketAddr>().is_err() {
            return Err(ValidationError::InvalidListenAddress(
                self.server.listen.clone(),
            ));
        }

        if !self.server.metrics_path.starts_with('/') {
            return Err(ValidationError::InvalidMetricsPath(
                self.server.metrics_path.clone(),
            ));
        }

        if self.probe.max_in_flight == 0 {
            return Err(ValidationError::InvalidMaxInFlight);
        }

        if self.mtls.enabled {
            if self.mtls.cert.is_none() {
                return Err(ValidationError::MissingMtlsFile("mtls.cert"));
            }
            if self.mtls.key.is_none() {
                return Err(ValidationError::MissingMtlsFile("mtls.key"));
            }
        }

        for (group_index, group) in self.groups.iter().enumerate() {
            if group.name.trim().is_empty() {
                return Err(ValidationError::EmptyGroupName(group_index));
            }


            for (index, target) in group.targets.iter().enumerate() {
                let missing = if target.id.trim().is_empty() {
                    Some("id")
                } else if target.address.trim().is_empty() {
                    Some("address")
                } else if target.record.trim().is_empty() {
                    Some("record")
                } else {
                    None
                };
                if let Some(field) = missing {
                    return Err(ValidationError::MissingTargetField {
                        group: group.name.clone(),
                        index,
                        field,
                    });
                }

                if target.port == 0 {
                    return Err(ValidationError::InvalidPort {
                        group: group.name.clone(),
                        target: target.id.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

impl ConfigManager {
    /// Creates a new `ConfigManager` instance by loading and validating the configuration.
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path: PathBuf = Self::get_config_path()?;
        let default_written: bool = Self::ensure_config_file_exists(&config_path)?;
        let mut manager = Self::from_path(config_path)?;
        manager.default_written = default_written;
        Ok(manager)
    }

    /// Loads and validates the configuration stored at `config_path`.
    pub fn from_path(config_path: PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let settings: Settings = Self::load_settings(&config_path)?;

        // Validate settings before proceeding
        let validated_settings = ValidatedSettings::new(settings).map_err(|e| {
            error!("Configuration validation failed: {}", e);
            e
        })?;

        Ok(ConfigManager {
            settings: Arc::new(validated_settings.into_inner()),
            config_path,
            default_written: false,
        })
    }

    /// Determines the configuration file path.
    fn get_config_path() -> Result<PathBuf, ConfigError> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            Ok(PathBuf::from(path))
        } else if let Some(config_dir) = dirs::config_dir() {
            Ok(config_dir.join("dns-pulse").join("config.toml"))
        } else {
            let msg: &str = "Could not determine the configuration directory";
            error!("{}", msg);
            Err(ConfigError::Message(msg.into()))
        }
    }

    /// Ensures that the configuration file exists, creating it if necessary.
    ///
    /// Returns whether the default configuration was written.
    fn ensure_config_file_exists(config_path: &Path) -> Result<bool, ConfigError> {
        if !config_path.exists() {
            if let Some(parent_dir) = config_path.parent() {
                fs::create_dir_all(parent_dir).map_err(|e| {
                    let msg: String = format!("Failed to create configuration directory: {}", e);
                    error!("{}", msg);
                    ConfigError::Message(msg)
                })?;
            }
            fs::write(config_path, DEFAULT_CONFIG).map_err(|e| {
                let msg: String = format!("Failed to create default configuration file: {}", e);
                error!("{}", msg);
                ConfigError::Message(msg)
            })?;
            info!("Default configuration file created at: {:?}", config_path);
            return Ok(true);
        }
        Ok(false)
    }

    /// Loads the settings from the configuration file and environment variables.
    fn load_settings(config_path: &Path) -> Result<Settings, ConfigError> {
        let config_file: &str = config_path.to_str().ok_or_else(|| {
            let msg: &str = "Configuration file path contains invalid UTF-8 characters";
            error!("{}", msg);
            ConfigError::Message(msg.into())
        })?;

        let settings: Config = Config::builder()
            .add_source(File::with_name(config_file))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Provides a shared handle to the loaded settings.
    pub fn get_settings(&self) -> Arc<Settings> {
        Arc::clone(&self.settings)
    }
}

impl ValidatedSettings {
    pub fn new(settings: Settings) -> Result<Self, ValidationError> {
        settings.validate()?;
        Ok(ValidatedSettings(settings))
    }

    pub fn into_inner(self) -> Settings {
        self.0
    }
}

impl std::ops::Deref for ValidatedSettings {
    type Target = Settings;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        write_config_as(contents, ".toml")
    }

    fn write_config_as(contents: &str, suffix: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config_is_valid() {
        let file = write_config(DEFAULT_CONFIG);
        let manager = ConfigManager::from_path(file.path().to_path_buf()).unwrap();
        let settings = manager.get_settings();

        assert_eq!(settings.server.listen, "0.0.0.0:9100");
        assert_eq!(settings.server.metrics_path, "/metrics");
        assert_eq!(settings.groups.len(), 1);
        assert_eq!(settings.groups[0].targets.len(), 2);
        assert!(settings.groups[0].targets[1].maintenance);
        assert!(!settings.mtls.enabled);
    }

    #[test]
    fn test_sections_fall_back_to_defaults() {
        let file = write_config(
            r#"
[[groups]]
name = "edge"

[[groups.targets]]
id = "ns1"
address = "192.0.2.1"
record = "example.org"
"#,
        );
        let manager = ConfigManager::from_path(file.path().to_path_buf()).unwrap();
        let settings = manager.get_settings();

        assert_eq!(settings.log.level, "info");
        assert_eq!(settings.probe.max_in_flight, 256);
        assert_eq!(settings.groups[0].targets[0].port, 53);
        assert!(!settings.groups[0].targets[0].maintenance);
    }

    #[test]
    fn test_duplicate_group_names_are_accepted() {
        let file = write_config(
            r#"
[[groups]]
name = "shared"

[[groups]]
name = "edge"

[[groups]]
name = "shared"

[[groups]]
name = "shared"
"#,
        );
        let manager = ConfigManager::from_path(file.path().to_path_buf()).unwrap();
        let settings = manager.get_settings();

        assert_eq!(settings.groups.len(), 4);
        assert_eq!(settings.duplicate_group_names(), vec!["shared"]);
        assert!(!manager.default_written);
    }

    #[test]
    fn test_unique_group_names_have_no_duplicates() {
        let settings = ConfigManager::load_settings(write_config(DEFAULT_CONFIG).path()).unwrap();
        assert!(settings.duplicate_group_names().is_empty());
    }

    #[test]
    fn test_flat_json_layout_is_loaded() {
        let file = write_config_as(
            r#"{
  "logPath": "",
  "logLevel": "DEBUG",
  "mtlsExporter": {
    "enabled": false,
    "key": "",
    "cert": "",
    "allowedCN": ["prometheus"],
    "description": "exporter"
  },
  "groupsDns": [
    {
      "groupName": "resolvers",
      "dnsServers": [
        {
          "serverID": "ns1",
          "IP": "192.0.2.1",
          "dnsPort": 5353,
          "requestedRecord": "example.org",
          "maintenance": false,
          "description": "primary"
        },
        {
          "serverID": "ns2",
          "IP": "192.0.2.2",
          "dnsPort": 53,
          "requestedRecord": "example.org",
          "maintenance": true,
          "description": "standby"
        }
      ]
    }
  ]
}"#,
            ".json",
        );
        let manager = ConfigManager::from_path(file.path().to_path_buf()).unwrap();
        let settings = manager.get_settings();

        assert_eq!(settings.log.level, "DEBUG");
        assert!(settings.log.path.is_none());
        assert!(settings.mtls.cert.is_none());
        assert_eq!(settings.mtls.allowed_cn, vec!["prometheus".to_string()]);
        assert_eq!(settings.groups.len(), 1);

        let group = &settings.groups[0];
        assert_eq!(group.name, "resolvers");
        assert_eq!(group.targets.len(), 2);
        assert_eq!(group.targets[0].id, "ns1");
        assert_eq!(group.targets[0].address, "192.0.2.1");
        assert_eq!(group.targets[0].port, 5353);
        assert_eq!(group.targets[0].record, "example.org");
        assert!(group.targets[1].maintenance);
    }

    #[test]
    fn test_misspelled_groups_section_is_rejected() {
        let file = write_config(
            r#"
[[group]]
name = "edge"
"#,
        );
        assert!(ConfigManager::from_path(file.path().to_path_buf()).is_err());
    }

    #[test]
    fn test_unknown_target_key_is_rejected() {
        let file = write_config(
            r#"
[[groups]]
name = "edge"

[[groups.targets]]
id = "ns1"
adress = "192.0.2.1"
record = "example.org"
"#,
        );
        assert!(ConfigManager::load_settings(file.path()).is_err());
    }

    #[test]
    fn test_mtls_enabled_with_empty_paths_is_rejected() {
        let file = write_config_as(
            r#"{"mtlsExporter": {"enabled": true, "key": "", "cert": ""}}"#,
            ".json",
        );
        let settings = ConfigManager::load_settings(file.path()).unwrap();
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::MissingMtlsFile("mtls.cert"))
        ));
    }

    #[test]
    fn test_invalid_log_level_is_rejected() {
        let file = write_config("[log]\nlevel = \"loud\"\n");
        assert!(ConfigManager::from_path(file.path().to_path_buf()).is_err());
    }

    #[test]
    fn test_zero_max_in_flight_is_rejected() {
        let file = write_config("[probe]\nmax_in_flight = 0\n");
        let settings = ConfigManager::load_settings(file.path()).unwrap();
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::InvalidMaxInFlight)
        ));
    }

    #[test]
    fn test_target_without_record_is_rejected() {
        let file = write_config(
            r#"
[[groups]]
name = "edge"

[[groups.targets]]
id = "ns1"
address = "192.0.2.1"
record = ""
"#,
        );
        let settings = ConfigManager::load_settings(file.path()).unwrap();
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::MissingTargetField { field: "record", .. })
        ));
    }

    #[test]
    fn test_mtls_requires_key_and_cert() {
        let file = write_config("[mtls]\nenabled = true\ncert = \"/tmp/cert.pem\"\n");
        let settings = ConfigManager::load_settings(file.path()).unwrap();
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::MissingMtlsFile("mtls.key"))
        ));
    }

    #[test]
    fn test_relative_metrics_path_is_rejected() {
        let file = write_config("[server]\nmetrics_path = \"metrics\"\n");
        let settings = ConfigManager::load_settings(file.path()).unwrap();
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::InvalidMetricsPath(_))
        ));
    }
}
