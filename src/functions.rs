// Standard library
use std::error::Error;
use std::sync::Arc;

// 3rd party crates
use prometheus::Registry;
use tokio::net::TcpListener;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tracing::info;

// Project imports
use crate::checks::types::ScrapeOrchestrator;
use crate::metrics::types::DnsGroupCollector;
use crate::probes::dns::types::DnsProber;
use crate::probes::traits::Prober;
use crate::server::functions::{build_router, serve_plain, serve_tls};
use crate::server::tls::load_server_config;
use crate::server::types::AccessPolicy;
use crate::server::ServerError;
use crate::settings::types::Settings;

/// Builds the registry backed by live DNS probes of every configured group.
pub fn build_registry(settings: &Settings, prober: Arc<dyn Prober>) -> Result<Registry, ServerError> {
    let orchestrator = ScrapeOrchestrator::from_settings(settings, prober);
    info!(
        groups = orchestrator.group_count(),
        max_in_flight = settings.probe.max_in_flight,
        "Scrape engine ready"
    );

    let collector = DnsGroupCollector::new(orchestrator, Handle::current())?;
    Ok(collector.into_registry()?)
}

/// Runs the exporter until a shutdown signal arrives.
///
/// Every scrape of the metrics path probes all configured DNS servers anew;
/// nothing is cached between scrapes.
pub async fn run(
    settings: Arc<Settings>,
    shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), Box<dyn Error>> {
    let prober: Arc<dyn Prober> = Arc::new(DnsProber::new());
    let registry: Registry = build_registry(&settings, prober)?;

    let policy = Arc::new(AccessPolicy::from_settings(&settings.mtls));
    let router = build_router(registry, &settings.server.metrics_path, policy);

    let listener: TcpListener = TcpListener::bind(&settings.server.listen)
        .await
        .map_err(|source| ServerError::Bind {
            addr: settings.server.listen.clone(),
            source,
        })?;

    if settings.mtls.enabled {
        info!("Run server with mtls.");
        let tls_config = load_server_config(&settings.mtls).await?;
        serve_tls(listener, router, tls_config, shutdown_rx).await?;
    } else {
        info!("Run server without mtls.");
        serve_plain(listener, router, shutdown_rx).await?;
    }

    Ok(())
}
