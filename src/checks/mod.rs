//! Connection checks
//!
//! Certificate parsing plus the webserver and mutual-TLS trust tests.

pub mod certificate;
pub mod mtls;
pub mod probe;
pub mod webserver;

pub use certificate::CertificateChecker;
pub use mtls::{mtls_url, MtlsChecker};
pub use probe::{probe_session, SessionInfo};
pub use webserver::WebserverChecker;
