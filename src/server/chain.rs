//! Certificate chain assembly for the info server
//!
//! Reads the server certificate, optional chain file and optional CA bundle
//! from disk on every call. Nothing is cached.

use crate::cert_ops::read_pem_certificates;
use crate::checks::{probe_session, CertificateChecker};
use crate::config::ServerSettings;
use crate::models::{CertificateChainInfo, CertificateDetails, MtlsInfo};
use crate::utils::{CertFileError, Result};
use std::path::Path;

/// `X-SSL-Client-Verify` value meaning the proxy verified a client certificate
pub const CLIENT_VERIFY_SUCCESS: &str = "SUCCESS";

/// Leaf, intermediate and root; longer chain files still report this
const MAX_CHAIN_LENGTH: usize = 3;

/// Details of the first certificate in `path`
pub fn load_server_certificate(path: &Path) -> Result<CertificateDetails> {
    let ders = read_pem_certificates(path)?;
    let first = ders.first().ok_or_else(|| CertFileError::NoCertificates {
        path: path.display().to_string(),
    })?;
    Ok(CertificateChecker::new().parse_details(first)?)
}

/// Every certificate of an optional PEM file.
///
/// A missing file is an empty list. A file that fails to parse is logged and
/// also treated as empty.
pub fn load_optional_bundle(path: &Path) -> Vec<CertificateDetails> {
    if !path.exists() {
        tracing::debug!("{} not found", path.display());
        return Vec::new();
    }

    match parse_bundle(path) {
        Ok(certs) => certs,
        Err(e) => {
            tracing::error!("Error reading {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

fn parse_bundle(path: &Path) -> Result<Vec<CertificateDetails>> {
    let ders = read_pem_certificates(path)?;
    Ok(CertificateChecker::new().parse_all(&ders)?)
}

/// Body of `GET /api/cert-info`
pub async fn build_chain_info(settings: &ServerSettings) -> Result<CertificateChainInfo> {
    let server_certificate = load_server_certificate(&settings.server_cert_path)?;
    let chain = load_optional_bundle(&settings.chain_path);
    let trust_store = load_optional_bundle(&settings.trust_store_path);

    let (protocol_version, cipher_suite) = match probe_session(
        &settings.probe_addr,
        &settings.probe_server_name,
        settings.probe_timeout(),
    )
    .await
    {
        Ok(session) => (Some(session.protocol_version), Some(session.cipher_suite)),
        Err(e) => (
            Some(format!("Error getting protocol version: {}", e)),
            None,
        ),
    };

    Ok(CertificateChainInfo {
        server_certificate,
        intermediate_ca: chain.first().cloned(),
        root_ca: chain.get(1).cloned(),
        chain_length: (1 + chain.len()).min(MAX_CHAIN_LENGTH),
        chain,
        protocol_version,
        cipher_suite,
        trust_store,
    })
}

/// Body of `GET /mtls`, given the verification headers set by the proxy
pub fn build_mtls_info(
    settings: &ServerSettings,
    client_verify: Option<String>,
    client_dn: Option<String>,
) -> Result<MtlsInfo> {
    let server_certificate = load_server_certificate(&settings.server_cert_path)?;
    let trust_store = load_optional_bundle(&settings.trust_store_path);
    let has_client_cert = client_verify.as_deref() == Some(CLIENT_VERIFY_SUCCESS);

    Ok(MtlsInfo {
        status: "ok".to_string(),
        server_certificate,
        trust_store,
        client_verify,
        client_dn,
        has_client_cert,
    })
}
