//! Trust Chain Validator Library
//!
//! Tooling for checking that trust stores on disk can validate a TLS
//! webserver's certificate chain:
//! - Discovery of PEM bundles and Java keystores under a directory tree
//! - A TLS handshake per trust store, anchored only on that store
//! - A mutual-TLS request per trust store using a client certificate
//! - A small HTTP service exposing the server's certificate chain as JSON
//!
//! # Usage
//!
//! ```rust,ignore
//! use trust_chain_validator::runner::{TrustChainValidator, ValidationConfig, ValidationEvent};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ValidationConfig::new("/etc/ssl", "localhost", 443);
//!     let validator = TrustChainValidator::new(config);
//!     let result = validator.run_tests(&|_: ValidationEvent| {}).await?;
//!     println!("{}", result.report.summary.passed);
//!     Ok(())
//! }
//! ```

pub mod cert_ops;
pub mod checks;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod models;
pub mod output;
pub mod runner;
pub mod server;
pub mod utils;

// Re-export commonly used types
pub use cli::{Cli, ServerCli};
pub use config::Settings;
pub use models::{RunReport, RunSummary, TestCase, TrustStoreRecord};
pub use runner::{RunResult, TrustChainValidator, ValidationConfig, ValidationEvent};
pub use utils::{Result, ValidatorError};
