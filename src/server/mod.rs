//! Certificate info server
//!
//! Read-only JSON endpoints describing the certificates a TLS-terminating
//! proxy serves, and the client certificate verification it performed.

pub mod chain;
pub mod handlers;
pub mod routes;

pub use chain::{build_chain_info, build_mtls_info};
pub use routes::{create_app, paths};
