// Standard library
use std::sync::Arc;

// 3rd party crates
use prometheus::Registry;

/// Identity taken from the verified client certificate of a TLS connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerIdentity {
    /// Subject common name of the leaf certificate
    pub common_name: Option<String>,
}

/// Which clients may reach the metrics handler.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    pub mtls_enabled: bool,
    pub allowed_cn: Vec<String>,
}

/// Outcome of checking a request against an [`AccessPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// The certificate common name is on the allow-list.
    Listed(String),
    /// No restriction applies: no client certificate, mTLS off, or empty allow-list.
    Unrestricted,
    /// The certificate common name is not on the allow-list.
    Denied(String),
}

/// State shared by the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Registry,
}

pub type AppStateArc = Arc<AppState>;
