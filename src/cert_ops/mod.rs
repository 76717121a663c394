//! Certificate file operations
//!
//! Reading PEM bundles and generating the client certificate used by the
//! mTLS test.

pub mod client_cert;
pub mod reader;

pub use client_cert::{ensure_client_certificate, ClientCertStatus};
pub use reader::{
    count_certificate_markers, parse_pem_certificates, read_pem_certificates,
    PemCertificateBlocks,
};
