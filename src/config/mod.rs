//! Configuration module
//!
//! Handles loading settings from TOML files.

pub mod settings;

pub use settings::{DiscoverySettings, KeystoreSettings, ServerSettings, Settings, SslSettings};
