// 3rd party crates
use thiserror::Error;
use tracing_subscriber::filter::ParseError;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to open log file {path}: {source}")]
    OpenFile {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid log filter directive: {0}")]
    Directive(#[from] ParseError),

    #[error("Failed to install the log subscriber: {0}")]
    Init(String),
}
