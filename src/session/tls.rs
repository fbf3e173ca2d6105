//! Client TLS for the IRC connection.

use std::sync::Arc;

use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls::crypto::aws_lc_rs;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;
use tracing::warn;

use crate::error::SessionError;

/// Handshake over `stream`, verifying `hostname` against the system roots.
pub(crate) async fn connect(
    stream: TcpStream,
    hostname: &str,
) -> Result<TlsStream<TcpStream>, SessionError> {
    let mut roots = RootCertStore::empty();
    let certs = rustls_native_certs::load_native_certs();
    for cert in certs.certs {
        if let Err(e) = roots.add(cert) {
            warn!("Failed to add root cert: {}", e);
        }
    }
    for e in &certs.errors {
        warn!("Error loading native certs: {}", e);
    }

    // reqwest links a second crypto provider, so name one explicitly.
    let config = ClientConfig::builder_with_provider(Arc::new(aws_lc_rs::default_provider()))
        .with_safe_default_protocol_versions()
        .map_err(|e| SessionError::Tls(e.to_string()))?
        .with_root_certificates(roots)
        .with_no_client_auth();

    let connector = TlsConnector::from(Arc::new(config));
    let server_name = ServerName::try_from(hostname.to_owned())
        .map_err(|e| SessionError::Tls(format!("invalid server name {hostname}: {e}")))?;

    connector
        .connect(server_name, stream)
        .await
        .map_err(|e| SessionError::Tls(e.to_string()))
}
