//! Discovered trust store records

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// On-disk format of a trust store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustStoreFormat {
    Pem,
    Jks,
}

impl fmt::Display for TrustStoreFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrustStoreFormat::Pem => write!(f, "pem"),
            TrustStoreFormat::Jks => write!(f, "jks"),
        }
    }
}

/// A trust store found during discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrustStoreRecord {
    /// Path to the trust store file
    pub path: PathBuf,
    /// File format
    pub format: TrustStoreFormat,
    /// Number of certificates found in the store
    pub certificate_count: usize,
    /// Password that opened the keystore (JKS only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keystore_password: Option<String>,
}

impl TrustStoreRecord {
    /// Record for a PEM bundle
    pub fn pem(path: impl Into<PathBuf>, certificate_count: usize) -> Self {
        Self {
            path: path.into(),
            format: TrustStoreFormat::Pem,
            certificate_count,
            keystore_password: None,
        }
    }

    /// Record for a Java keystore opened with `password`
    pub fn jks(path: impl Into<PathBuf>, certificate_count: usize, password: String) -> Self {
        Self {
            path: path.into(),
            format: TrustStoreFormat::Jks,
            certificate_count,
            keystore_password: Some(password),
        }
    }
}
