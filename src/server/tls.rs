// Standard library
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

// 3rd party crates
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::server::WebPkiClientVerifier;
use rustls::{RootCertStore, ServerConfig, ServerConnection};
use rustls_pemfile::{certs, private_key};
use tokio::fs;
use tracing::info;
use x509_parser::prelude::{FromDer, X509Certificate};

// Project imports
use crate::settings::types::Mtls;

// Current module imports
use super::constants::ALPN_PROTOCOLS;
use super::errors::ServerError;
use super::types::PeerIdentity;

async fn read_pem(path: &Path) -> Result<Vec<u8>, ServerError> {
    fs::read(path).await.map_err(|source| ServerError::ReadFile {
        path: path.display().to_string(),
        source,
    })
}

/// Reads every certificate of a PEM bundle.
pub async fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>, ServerError> {
    let pem: Vec<u8> = read_pem(path).await?;
    let mut reader = BufReader::new(&pem[..]);
    let parsed = certs(&mut reader)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| ServerError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;

    if parsed.is_empty() {
        return Err(ServerError::NoCertificates(path.display().to_string()));
    }
    Ok(parsed)
}

/// Reads the first PKCS#8, PKCS#1 or SEC1 private key of a PEM file.
pub async fn load_private_key(path: &Path) -> Result<PrivateKeyDer<'static>, ServerError> {
    let pem: Vec<u8> = read_pem(path).await?;
    let mut reader = BufReader::new(&pem[..]);
    private_key(&mut reader)
        .map_err(|source| ServerError::ReadFile {
            path: path.display().to_string(),
            source,
        })?
        .ok_or_else(|| ServerError::NoPrivateKey(path.display().to_string()))
}

/// Builds a rustls server configuration that requires and verifies client
/// certificates against `client_ca` (or `cert` when no CA bundle is set).
pub async fn load_server_config(mtls: &Mtls) -> Result<Arc<ServerConfig>, ServerError> {
    let cert_path = mtls.cert.as_deref().ok_or(ServerError::MissingSetting("cert"))?;
    let key_path = mtls.key.as_deref().ok_or(ServerError::MissingSetting("key"))?;
    let ca_path = mtls.client_ca.as_deref().unwrap_or(cert_path);

    // Create root store
    let mut root_store = RootCertStore::empty();
    for ca in load_certs(ca_path).await? {
        root_store.add(ca)?;
    }

    let server_certs = load_certs(cert_path).await?;
    let server_key = load_private_key(key_path).await?;

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let client_verifier =
        WebPkiClientVerifier::builder_with_provider(Arc::new(root_store), Arc::clone(&provider))
            .build()?;

    // TLS 1.2 and 1.3 only
    let mut config = ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()?
        .with_client_cert_verifier(client_verifier)
        .with_single_cert(server_certs, server_key)?;
    config.alpn_protocols = ALPN_PROTOCOLS.iter().map(|p| p.to_vec()).collect();

    info!(
        cert = %cert_path.display(),
        client_ca = %ca_path.display(),
        "TLS server config loaded (mTLS enabled)"
    );
    Ok(Arc::new(config))
}

/// Subject common name of a DER encoded certificate.
pub fn common_name_from_der(der: &[u8]) -> Option<String> {
    let (_, certificate) = X509Certificate::from_der(der).ok()?;
    let common_name = certificate
        .subject()
        .iter_common_name()
        .next()
        .and_then(|attribute| attribute.as_str().ok())
        .map(str::to_string);
    common_name
}

/// Identity of the verified client of `connection`, if it sent a certificate.
pub fn peer_identity(connection: &ServerConnection) -> Option<PeerIdentity> {
    let leaf = connection.peer_certificates()?.first()?;
    Some(PeerIdentity {
        common_name: common_name_from_der(leaf.as_ref()),
    })
}
