//! Unverified TLS probe
//!
//! Connects to a TLS endpoint without validating its certificate, only to
//! learn the negotiated protocol version and cipher suite. Used by the info
//! server to describe the terminating proxy in front of it.

use super::webserver::protocol_name;
use crate::utils::TlsTestError;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, Error as RustlsError, SignatureScheme};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;

/// A certificate verifier that accepts any certificate.
#[derive(Debug)]
struct AcceptAnyCertVerifier;

impl ServerCertVerifier for AcceptAnyCertVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, RustlsError> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, RustlsError> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, RustlsError> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        rustls::crypto::ring::default_provider()
            .signature_verification_algorithms
            .supported_schemes()
    }
}

/// Negotiated session parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub protocol_version: String,
    pub cipher_suite: String,
}

/// Handshake with `addr` presenting `server_name` as SNI, accepting any
/// certificate.
pub async fn probe_session(
    addr: &str,
    server_name: &str,
    timeout: Duration,
) -> Result<SessionInfo, TlsTestError> {
    let _ = rustls::crypto::ring::default_provider().install_default();

    let config = ClientConfig::builder()
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(AcceptAnyCertVerifier))
        .with_no_client_auth();
    let connector = tokio_rustls::TlsConnector::from(Arc::new(config));

    let name = ServerName::try_from(server_name.to_string()).map_err(|_| {
        TlsTestError::InvalidServerName {
            host: server_name.to_string(),
        }
    })?;

    let stream = tokio::time::timeout(timeout, TcpStream::connect(addr))
        .await
        .map_err(|_| TlsTestError::Timeout {
            stage: "TCP connection".to_string(),
            seconds: timeout.as_secs(),
        })?
        .map_err(|e| TlsTestError::Connection {
            target: addr.to_string(),
            message: e.to_string(),
        })?;

    let tls_stream = tokio::time::timeout(timeout, connector.connect(name, stream))
        .await
        .map_err(|_| TlsTestError::Timeout {
            stage: "TLS handshake".to_string(),
            seconds: timeout.as_secs(),
        })?
        .map_err(|e| TlsTestError::Handshake {
            message: e.to_string(),
        })?;

    let (_, connection) = tls_stream.get_ref();
    Ok(SessionInfo {
        protocol_version: protocol_name(connection.protocol_version()),
        cipher_suite: connection
            .negotiated_cipher_suite()
            .map(|cs| format!("{:?}", cs.suite()))
            .unwrap_or_else(|| "Unknown".to_string()),
    })
}
