// 3rd party crates
use thiserror::Error;

/// Startup failures of the HTTP surface. All of them are fatal.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    #[error("No certificates found in {0}")]
    NoCertificates(String),

    #[error("No private key found in {0}")]
    NoPrivateKey(String),

    #[error("mTLS setting '{0}' is missing")]
    MissingSetting(&'static str),

    #[error("TLS configuration error: {0}")]
    Tls(#[from] rustls::Error),

    #[error("Client certificate verifier error: {0}")]
    ClientVerifier(#[from] rustls::server::VerifierBuilderError),

    #[error("Metrics registry error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}
