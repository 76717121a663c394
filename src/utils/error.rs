//! Custom error types for the trust chain validator
//!
//! Domain-specific error types built with `thiserror`, one enum per failure
//! area, wrapped by [`ValidatorError`] for callers that do not care which.

use crate::models::FailureKind;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the library
#[derive(Error, Debug)]
pub enum ValidatorError {
    #[error("Trust store discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("Keystore error: {0}")]
    Keystore(#[from] KeystoreError),

    #[error("Certificate file error: {0}")]
    CertFile(#[from] CertFileError),

    #[error("Certificate error: {0}")]
    Certificate(#[from] CertificateError),

    #[error("Connection test error: {0}")]
    Test(#[from] TlsTestError),

    #[error("Client certificate error: {0}")]
    ClientCert(#[from] ClientCertError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trust store discovery errors
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Scan directory does not exist or is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Failed to read {path}: {message}")]
    ReadFailed { path: PathBuf, message: String },
}

/// Java keystore listing errors
#[derive(Error, Debug)]
pub enum KeystoreError {
    #[error("keytool not found")]
    ToolNotFound,

    #[error("Failed to run {tool}: {message}")]
    ToolFailed { tool: String, message: String },
}

/// Errors reading PEM certificate files
#[derive(Error, Debug)]
pub enum CertFileError {
    #[error("Failed to read {path}: {message}")]
    FileReadError { path: String, message: String },

    #[error("Certificate block starting at byte {offset} has no END marker")]
    UnterminatedBlock { offset: usize },

    #[error("Invalid PEM block at byte {offset}: {message}")]
    InvalidBlock { offset: usize, message: String },

    #[error("No CERTIFICATE blocks found in {path}")]
    NoCertificates { path: String },
}

/// Certificate parsing errors
#[derive(Error, Debug)]
pub enum CertificateError {
    #[error("Failed to parse certificate: {message}")]
    ParseError { message: String },

    #[error("Peer presented no certificate")]
    NoPeerCertificate,
}

/// Failures of a single webserver or mTLS connection test
#[derive(Error, Debug)]
pub enum TlsTestError {
    #[error("Unable to load trust store {path}: {message}")]
    TrustStore { path: PathBuf, message: String },

    #[error("Trust store format {format} cannot be used as a TLS trust anchor")]
    UnsupportedFormat { format: String },

    #[error("Invalid server name: {host}")]
    InvalidServerName { host: String },

    #[error("Connection to {target} failed: {message}")]
    Connection { target: String, message: String },

    #[error("{stage} timed out after {seconds}s")]
    Timeout { stage: String, seconds: u64 },

    #[error("SSL Error: {message}")]
    Handshake { message: String },

    #[error("Unable to load client identity: {message}")]
    ClientIdentity { message: String },

    #[error("HTTP Error: {status} - {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Error: {message}")]
    Request { message: String },

    #[error("Failed to read peer certificate: {0}")]
    PeerCertificate(#[from] CertificateError),
}

impl TlsTestError {
    /// Category recorded on the failed test case
    pub fn kind(&self) -> FailureKind {
        match self {
            TlsTestError::TrustStore { .. } | TlsTestError::ClientIdentity { .. } => {
                FailureKind::TrustStore
            }
            TlsTestError::UnsupportedFormat { .. } => FailureKind::Unsupported,
            TlsTestError::Connection { .. } | TlsTestError::InvalidServerName { .. } => {
                FailureKind::Connection
            }
            TlsTestError::Timeout { .. } => FailureKind::Timeout,
            TlsTestError::Handshake { .. } | TlsTestError::PeerCertificate(_) => FailureKind::Tls,
            TlsTestError::HttpStatus { .. } => FailureKind::Http,
            TlsTestError::Request { .. } => FailureKind::Other,
        }
    }
}

/// Client certificate generation errors
#[derive(Error, Debug)]
pub enum ClientCertError {
    #[error("Failed to generate key pair: {message}")]
    KeyGeneration { message: String },

    #[error("Failed to sign certificate: {message}")]
    Signing { message: String },

    #[error("Failed to write {path}: {message}")]
    WriteError { path: String, message: String },
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },
}

/// Report writing errors
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to serialize report: {message}")]
    Serialize { message: String },

    #[error("Failed to write report to {path}: {message}")]
    WriteError { path: String, message: String },
}

/// Result type alias using ValidatorError
pub type Result<T> = std::result::Result<T, ValidatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handshake_errors_are_tls_failures() {
        let err = TlsTestError::Handshake {
            message: "invalid peer certificate: UnknownIssuer".to_string(),
        };
        assert_eq!(err.kind(), FailureKind::Tls);
        assert!(err.to_string().starts_with("SSL Error:"));
    }

    #[test]
    fn test_http_status_error_message() {
        let err = TlsTestError::HttpStatus {
            status: 403,
            body: "forbidden".to_string(),
        };
        assert_eq!(err.kind(), FailureKind::Http);
        assert_eq!(err.to_string(), "HTTP Error: 403 - forbidden");
    }
}
