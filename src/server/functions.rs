// Standard library
use std::net::SocketAddr;
use std::sync::Arc;

// 3rd party crates
use axum::extract::{ConnectInfo, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{middleware, Router};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use prometheus::Registry;
use rustls::ServerConfig;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio_rustls::TlsAcceptor;
use tower::ServiceExt;
use tracing::{debug, error, info, warn};

// Project imports
use crate::metrics::functions::render;

// Current module imports
use super::auth::require_allowed_cn;
use super::errors::ServerError;
use super::tls::peer_identity;
use super::types::{AccessPolicy, AppState, AppStateArc};

/// Builds the router serving `registry` on `metrics_path`, gated by `policy`.
///
/// Every other path answers 404.
pub fn build_router(registry: Registry, metrics_path: &str, policy: Arc<AccessPolicy>) -> Router {
    let state: AppStateArc = Arc::new(AppState { registry });

    Router::new()
        .route(metrics_path, get(metrics_handler))
        .route_layer(middleware::from_fn_with_state(policy, require_allowed_cn))
        .with_state(state)
}

async fn metrics_handler(State(state): State<AppStateArc>) -> Response {
    // Gathering blocks on the scrape, keep it off the async workers.
    let registry: Registry = state.registry.clone();
    let rendered = tokio::task::spawn_blocking(move || render(&registry)).await;

    match rendered {
        Ok(Ok(body)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
            body,
        )
            .into_response(),
        Ok(Err(e)) => {
            error!("Failed to encode metrics: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(e) => {
            error!("Metrics gathering task failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Serves `router` over plain HTTP until a shutdown signal arrives.
pub async fn serve_plain(
    listener: TcpListener,
    router: Router,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), ServerError> {
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        let _ = shutdown_rx.recv().await;
        info!("Received shutdown signal, stopping HTTP server...");
    })
    .await?;

    Ok(())
}

/// Serves `router` over TLS with client certificate verification until a
/// shutdown signal arrives.
///
/// The verified client identity of each connection is attached to every
/// request as a [`super::types::PeerIdentity`] extension, next to the
/// remote address as [`ConnectInfo`].
pub async fn serve_tls(
    listener: TcpListener,
    router: Router,
    tls_config: Arc<ServerConfig>,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), ServerError> {
    info!("Listening on https://{}", listener.local_addr()?);
    let acceptor = TlsAcceptor::from(tls_config);

    loop {
        let (stream, remote) = tokio::select! {
            _ = shutdown_rx.recv() => {
                info!("Received shutdown signal, stopping HTTPS server...");
                break;
            }
            accepted = listener.accept() => match accepted {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("Failed to accept connection: {}", e);
                    continue;
                }
            },
        };

        let acceptor: TlsAcceptor = acceptor.clone();
        let router: Router = router.clone();

        tokio::spawn(async move {
            let tls_stream = match acceptor.accept(stream).await {
                Ok(tls_stream) => tls_stream,
                Err(e) => {
                    warn!(remote = %remote, "TLS handshake failed: {}", e);
                    return;
                }
            };
            let identity = peer_identity(tls_stream.get_ref().1);
            debug!(remote = %remote, identity = ?identity, "TLS connection established");

            let service = service_fn(move |mut request: hyper::Request<Incoming>| {
                let router: Router = router.clone();
                let identity = identity.clone();
                async move {
                    request.extensions_mut().insert(ConnectInfo(remote));
                    if let Some(identity) = identity {
                        request.extensions_mut().insert(identity);
                    }
                    router.oneshot(request).await
                }
            });

            let builder = auto::Builder::new(TokioExecutor::new());
            if let Err(e) = builder
                .serve_connection(TokioIo::new(tls_stream), service)
                .await
            {
                debug!(remote = %remote, "Connection closed with error: {}", e);
            }
        });
    }

    Ok(())
}
