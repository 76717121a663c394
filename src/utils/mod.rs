//! Utility modules for the validator
//!
//! Error types and terminal progress helpers.

pub mod error;
pub mod progress;

pub use error::{
    CertFileError, CertificateError, ClientCertError, ConfigError, DiscoveryError, KeystoreError,
    ReportError, Result, TlsTestError, ValidatorError,
};
