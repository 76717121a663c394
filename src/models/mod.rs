//! Data models for the validator and info server

pub mod certificate;
pub mod test_result;
pub mod trust_store;

pub use certificate::{CertificateChainInfo, CertificateDetails, MtlsInfo, PeerCertificate};
pub use test_result::{
    ClientCredentials, FailureKind, RunReport, RunSummary, TestCase, TestCategory, TestOutcome,
    TestPayload,
};
pub use trust_store::{TrustStoreFormat, TrustStoreRecord};
