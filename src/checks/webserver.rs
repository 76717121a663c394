//! Webserver TLS test
//!
//! Performs a TLS handshake against the target using only the certificates
//! of one PEM trust store as trust anchors. A completed handshake means the
//! server's chain is trusted by that store.

use super::certificate::CertificateChecker;
use crate::cert_ops::read_pem_certificates;
use crate::config::SslSettings;
use crate::models::{PeerCertificate, TrustStoreFormat, TrustStoreRecord};
use crate::utils::{CertificateError, TlsTestError};
use rustls::pki_types::{CertificateDer, ServerName};
use rustls::{ClientConfig, ProtocolVersion, RootCertStore};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpStream;

/// Webserver trust checker
pub struct WebserverChecker {
    settings: SslSettings,
}

impl WebserverChecker {
    /// Create a new webserver checker with the given settings
    pub fn new(settings: SslSettings) -> Self {
        // Ensure a default crypto provider is installed (reqwest may pull in
        // a second one)
        let _ = rustls::crypto::ring::default_provider().install_default();
        Self { settings }
    }

    /// Handshake with `host:port` trusting only `store`.
    pub async fn check(
        &self,
        store: &TrustStoreRecord,
        host: &str,
        port: u16,
    ) -> Result<PeerCertificate, TlsTestError> {
        if store.format != TrustStoreFormat::Pem {
            return Err(TlsTestError::UnsupportedFormat {
                format: store.format.to_string(),
            });
        }

        let roots = load_root_store(&store.path)?;
        let config = ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();
        let connector = tokio_rustls::TlsConnector::from(Arc::new(config));

        let server_name =
            ServerName::try_from(host.to_string()).map_err(|_| TlsTestError::InvalidServerName {
                host: host.to_string(),
            })?;

        let target = format!("{}:{}", host, port);
        let stream = tokio::time::timeout(
            self.settings.connect_timeout(),
            TcpStream::connect((host, port)),
        )
        .await
        .map_err(|_| TlsTestError::Timeout {
            stage: "TCP connection".to_string(),
            seconds: self.settings.connect_timeout_secs,
        })?
        .map_err(|e| TlsTestError::Connection {
            target: target.clone(),
            message: e.to_string(),
        })?;

        let tls_stream = tokio::time::timeout(
            self.settings.handshake_timeout(),
            connector.connect(server_name, stream),
        )
        .await
        .map_err(|_| TlsTestError::Timeout {
            stage: "TLS handshake".to_string(),
            seconds: self.settings.handshake_timeout_secs,
        })?
        .map_err(|e| TlsTestError::Handshake {
            message: e.to_string(),
        })?;

        let (_, connection) = tls_stream.get_ref();

        let protocol_version = protocol_name(connection.protocol_version());
        let cipher_suite = connection
            .negotiated_cipher_suite()
            .map(|cs| format!("{:?}", cs.suite()))
            .unwrap_or_else(|| "Unknown".to_string());

        let leaf = connection
            .peer_certificates()
            .and_then(|certs| certs.first())
            .ok_or(CertificateError::NoPeerCertificate)?;

        let details = CertificateChecker::new().parse_details(leaf.as_ref())?;
        tracing::debug!(
            "Handshake with {} succeeded using {} ({}, {})",
            target,
            store.path.display(),
            protocol_version,
            cipher_suite
        );

        Ok(PeerCertificate::from_details(
            details,
            protocol_version,
            cipher_suite,
        ))
    }
}

/// Build a rustls root store from every certificate in a PEM bundle.
/// Certificates rustls cannot use as anchors are skipped; a store with no
/// usable anchor is an error.
pub fn load_root_store(path: &Path) -> Result<RootCertStore, TlsTestError> {
    let ders = read_pem_certificates(path).map_err(|e| TlsTestError::TrustStore {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut roots = RootCertStore::empty();
    let (added, ignored) =
        roots.add_parsable_certificates(ders.into_iter().map(CertificateDer::from));
    if ignored > 0 {
        tracing::debug!(
            "Ignored {} unusable certificates in {}",
            ignored,
            path.display()
        );
    }
    if added == 0 {
        return Err(TlsTestError::TrustStore {
            path: path.to_path_buf(),
            message: "no usable trust anchors".to_string(),
        });
    }
    Ok(roots)
}

/// Conventional name of a negotiated protocol version
pub fn protocol_name(version: Option<ProtocolVersion>) -> String {
    match version {
        Some(ProtocolVersion::TLSv1_3) => "TLSv1.3".to_string(),
        Some(ProtocolVersion::TLSv1_2) => "TLSv1.2".to_string(),
        Some(other) => format!("{:?}", other),
        None => "Unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_names() {
        assert_eq!(protocol_name(Some(ProtocolVersion::TLSv1_3)), "TLSv1.3");
        assert_eq!(protocol_name(Some(ProtocolVersion::TLSv1_2)), "TLSv1.2");
        assert_eq!(protocol_name(None), "Unknown");
    }

    #[tokio::test]
    async fn test_jks_store_is_unsupported() {
        let checker = WebserverChecker::new(SslSettings::default());
        let store = TrustStoreRecord::jks("cacerts.jks", 3, "changeit".to_string());

        let err = checker.check(&store, "localhost", 443).await.unwrap_err();
        assert!(matches!(err, TlsTestError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_store_without_anchors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bogus.pem");
        std::fs::write(
            &path,
            "-----BEGIN CERTIFICATE-----\nAQID\n-----END CERTIFICATE-----\n",
        )
        .unwrap();

        let err = load_root_store(&path).unwrap_err();
        assert!(matches!(err, TlsTestError::TrustStore { .. }));
    }
}
