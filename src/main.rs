// Standard library
use std::process::ExitCode;
use std::sync::Arc;

// 3rd party crates
use tokio::signal::ctrl_c;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

// Project imports
use dns_pulse::functions::run;
use dns_pulse::settings::types::{ConfigManager, Settings};
use dns_pulse::utility::logging::init_logging;

/// Main entry point for the DNS liveness exporter.
///
/// Loads the configuration, installs logging and serves the metrics endpoint
/// until Ctrl+C is received.
#[tokio::main]
async fn main() -> ExitCode {
    // loads the .env file from the current directory or parents.
    dotenvy::dotenv_override().ok();

    let config: ConfigManager = match ConfigManager::new() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to initialize configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let settings: Arc<Settings> = config.get_settings();

    // setup logging.
    if let Err(e) = init_logging(&settings.log) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    if config.default_written {
        info!(
            path = %config.config_path.display(),
            "Default configuration file created."
        );
    }
    info!(
        path = %config.config_path.display(),
        groups = settings.groups.len(),
        "Settings have been loaded."
    );
    for name in settings.duplicate_group_names() {
        warn!(
            group = %name,
            "Group is configured more than once, only the first one will be exported"
        );
    }

    // Create a broadcast channel for shutdown signal
    let (shutdown_tx, _) = broadcast::channel(1);
    let shutdown_tx_clone = shutdown_tx.clone();

    // Handle Ctrl+C
    tokio::spawn(async move {
        if let Err(e) = ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        info!("Received shutdown signal, initiating graceful shutdown...");
        let _ = shutdown_tx_clone.send(());
    });

    // Run the exporter with shutdown signal
    let exit_code = match run(settings, shutdown_tx.subscribe()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Application error: {}", e);
            ExitCode::FAILURE
        }
    };

    info!("Shutdown complete.");
    exit_code
}
