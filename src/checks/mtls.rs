//! Mutual-TLS test
//!
//! Issues `GET https://host:port/mtls` presenting the client certificate,
//! trusting only the certificates of one PEM trust store.

use crate::cert_ops::read_pem_certificates;
use crate::config::SslSettings;
use crate::models::{TrustStoreFormat, TrustStoreRecord};
use crate::utils::TlsTestError;
use std::error::Error as StdError;
use std::path::Path;

/// Endpoint the mTLS test requests
pub const MTLS_PATH: &str = "/mtls";

/// Mutual-TLS checker
pub struct MtlsChecker {
    settings: SslSettings,
}

impl MtlsChecker {
    pub fn new(settings: SslSettings) -> Self {
        let _ = rustls::crypto::ring::default_provider().install_default();
        Self { settings }
    }

    /// Run the mTLS request.
    ///
    /// Returns `Ok(None)` without touching the network when either
    /// credential file is missing. On HTTP 200 the body is returned, parsed
    /// as JSON when possible and as a JSON string otherwise.
    pub async fn check(
        &self,
        store: &TrustStoreRecord,
        host: &str,
        port: u16,
        client_cert: &Path,
        client_key: &Path,
    ) -> Result<Option<serde_json::Value>, TlsTestError> {
        if !client_cert.is_file() || !client_key.is_file() {
            tracing::debug!(
                "Client credentials {} / {} not found, skipping mTLS test",
                client_cert.display(),
                client_key.display()
            );
            return Ok(None);
        }

        if store.format != TrustStoreFormat::Pem {
            return Err(TlsTestError::UnsupportedFormat {
                format: store.format.to_string(),
            });
        }

        let client = self.build_client(&store.path, client_cert, client_key)?;
        let url = mtls_url(host, port);
        tracing::debug!("Requesting {} with {}", url, store.path.display());

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.classify(e, host, port))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.classify(e, host, port))?;

        if status != reqwest::StatusCode::OK {
            return Err(TlsTestError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let payload = serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body));
        Ok(Some(payload))
    }

    fn build_client(
        &self,
        trust_store: &Path,
        client_cert: &Path,
        client_key: &Path,
    ) -> Result<reqwest::Client, TlsTestError> {
        let store_error = |message: String| TlsTestError::TrustStore {
            path: trust_store.to_path_buf(),
            message,
        };

        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .tls_built_in_root_certs(false)
            .timeout(self.settings.mtls_timeout());

        let ders = read_pem_certificates(trust_store).map_err(|e| store_error(e.to_string()))?;
        for der in &ders {
            let cert =
                reqwest::Certificate::from_der(der).map_err(|e| store_error(e.to_string()))?;
            builder = builder.add_root_certificate(cert);
        }

        builder
            .identity(load_identity(client_cert, client_key)?)
            .build()
            .map_err(|e| TlsTestError::Request {
                message: error_chain(&e),
            })
    }

    fn classify(&self, err: reqwest::Error, host: &str, port: u16) -> TlsTestError {
        let message = error_chain(&err);
        if is_tls_failure(&err) {
            TlsTestError::Handshake { message }
        } else if err.is_timeout() {
            TlsTestError::Timeout {
                stage: "mTLS request".to_string(),
                seconds: self.settings.mtls_timeout_secs,
            }
        } else if err.is_connect() {
            TlsTestError::Connection {
                target: format!("{}:{}", host, port),
                message,
            }
        } else {
            TlsTestError::Request { message }
        }
    }
}

/// Client identity from a PEM certificate and a PEM private key
fn load_identity(cert: &Path, key: &Path) -> Result<reqwest::Identity, TlsTestError> {
    let read = |path: &Path| {
        std::fs::read(path).map_err(|e| TlsTestError::ClientIdentity {
            message: format!("{}: {}", path.display(), e),
        })
    };

    let mut pem = read(cert)?;
    if !pem.ends_with(b"\n") {
        pem.push(b'\n');
    }
    pem.extend(read(key)?);

    reqwest::Identity::from_pem(&pem).map_err(|e| TlsTestError::ClientIdentity {
        message: e.to_string(),
    })
}

/// URL requested by the mTLS test, bracketing IPv6 hosts
pub fn mtls_url(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("https://[{}]:{}{}", host, port, MTLS_PATH)
    } else {
        format!("https://{}:{}{}", host, port, MTLS_PATH)
    }
}

/// Whether a rustls error sits anywhere in the source chain
fn is_tls_failure(err: &reqwest::Error) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = current {
        if e.is::<rustls::Error>() {
            return true;
        }
        // io::Error hides its payload from source()
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            if io.get_ref().is_some_and(|inner| inner.is::<rustls::Error>()) {
                return true;
            }
        }
        current = e.source();
    }
    false
}

/// Display of an error followed by each of its sources
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut current = err.source();
    while let Some(e) = current {
        let text = e.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        current = e.source();
    }
    message
}
