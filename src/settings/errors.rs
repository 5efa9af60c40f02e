// 3rd party crates
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid log level: {0}. Must be one of: error, warn, info, debug, trace")]
    InvalidLogLevel(String),
    #[error("Invalid log format: {0}. Must be one of: text, json")]
    InvalidLogFormat(String),
    #[error("Invalid listen address '{0}'")]
    InvalidListenAddress(String),
    #[error("Metrics path must start with '/', got '{0}'")]
    InvalidMetricsPath(String),
    #[error("probe.max_in_flight must be greater than 0")]
    InvalidMaxInFlight,
    #[error("Group #{0} has an empty name")]
    EmptyGroupName(usize),
    #[error("Target #{index} in group '{group}' is missing '{field}'")]
    MissingTargetField {
        group: String,
        index: usize,
        field: &'static str,
    },
    #[error("Target '{target}' in group '{group}' has port 0")]
    InvalidPort { group: String, target: String },
    #[error("mTLS is enabled but '{0}' is not set")]
    MissingMtlsFile(&'static str),
}
