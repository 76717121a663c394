//! Trust store discovery
//!
//! Finds PEM bundles and Java keystores under a directory tree.

pub mod keystore;
pub mod scanner;

pub use keystore::{
    find_keytool, open_keystore, Keytool, KeystoreCredentials, KeystoreLister, ListOutcome,
    StaticPasswords,
};
pub use scanner::TrustStoreScanner;
