// Standard library
use std::fs::OpenOptions;
use std::sync::Mutex;

// 3rd party crates
use tracing::Subscriber;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

// Project imports
use crate::settings::types::Log;

// Current module imports
use super::constants::NOISE_DIRECTIVES;
use super::errors::LoggingError;

/// Builds the filter for `level`, with dependency noise silenced.
pub fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    let mut filter: EnvFilter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(level.to_lowercase());

    for directive in NOISE_DIRECTIVES {
        filter = filter.add_directive(directive.parse()?);
    }
    Ok(filter)
}

/// Builds the subscriber described by `log` without installing it.
///
/// Logs go to stdout unless `log.path` is set, in which case they are
/// appended to that file.
pub fn build_subscriber(log: &Log) -> Result<Box<dyn Subscriber + Send + Sync>, LoggingError> {
    let filter: EnvFilter = build_filter(&log.level)?;

    let (writer, ansi): (BoxMakeWriter, bool) = match &log.path {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::OpenFile {
                    path: path.display().to_string(),
                    source,
                })?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stdout), true),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(ansi)
        .with_writer(writer);

    if log.format.eq_ignore_ascii_case("json") {
        Ok(Box::new(builder.json().finish()))
    } else {
        Ok(Box::new(builder.finish()))
    }
}

/// Installs the subscriber described by `log` as the global default.
///
/// Also routes records of the `log` facade into it.
pub fn init_logging(log: &Log) -> Result<(), LoggingError> {
    build_subscriber(log)?
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))
}
