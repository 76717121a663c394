//! Certificate information types

use serde::Serialize;
use std::collections::BTreeMap;

/// Detailed certificate information exported by the info server
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CertificateDetails {
    /// Subject RDN attributes keyed by short name (`CN`, `O`, ...)
    pub subject: BTreeMap<String, String>,
    /// Issuer RDN attributes keyed by short name
    pub issuer: BTreeMap<String, String>,
    /// X.509 version field as encoded (0-based, v3 is 2)
    pub version: u32,
    /// Serial number in decimal
    pub serial_number: String,
    /// Not valid before, `%Y-%m-%d %H:%M:%S UTC`
    pub not_before: String,
    /// Not valid after, `%Y-%m-%d %H:%M:%S UTC`
    pub not_after: String,
    pub signature_algorithm: String,
    /// Extension short name to rendered value
    pub extensions: BTreeMap<String, String>,
    /// SHA-256 fingerprint, colon separated upper-case hex
    pub fingerprint: String,
}

/// Peer certificate and session data captured by the webserver test
#[derive(Debug, Clone, Serialize)]
pub struct PeerCertificate {
    pub subject: BTreeMap<String, String>,
    pub issuer: BTreeMap<String, String>,
    pub serial_number: String,
    pub not_before: String,
    pub not_after: String,
    /// Negotiated protocol, e.g. `TLSv1.3`
    pub protocol_version: String,
    /// Negotiated cipher suite
    pub cipher_suite: String,
}

impl PeerCertificate {
    pub fn from_details(
        details: CertificateDetails,
        protocol_version: String,
        cipher_suite: String,
    ) -> Self {
        Self {
            subject: details.subject,
            issuer: details.issuer,
            serial_number: details.serial_number,
            not_before: details.not_before,
            not_after: details.not_after,
            protocol_version,
            cipher_suite,
        }
    }
}

/// Response body of the `/api/cert-info` endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CertificateChainInfo {
    pub server_certificate: CertificateDetails,
    /// First certificate of the chain file
    pub intermediate_ca: Option<CertificateDetails>,
    /// Second certificate of the chain file
    pub root_ca: Option<CertificateDetails>,
    /// Every certificate of the chain file, in file order
    pub chain: Vec<CertificateDetails>,
    pub protocol_version: Option<String>,
    pub cipher_suite: Option<String>,
    /// Server certificate plus intermediate and root, at most 3
    pub chain_length: usize,
    /// Certificates of the CA trust store file
    pub trust_store: Vec<CertificateDetails>,
}

/// Response body of the `/mtls` endpoint
#[derive(Debug, Clone, Serialize)]
pub struct MtlsInfo {
    pub status: String,
    pub server_certificate: CertificateDetails,
    pub trust_store: Vec<CertificateDetails>,
    /// Raw `X-SSL-Client-Verify` header value
    pub client_verify: Option<String>,
    /// Raw `X-SSL-Client-DN` header value
    pub client_dn: Option<String>,
    pub has_client_cert: bool,
}
