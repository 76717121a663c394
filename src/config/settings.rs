//! Application settings configuration
//!
//! Timeouts, discovery rules, keystore passwords and info server paths.

use crate::utils::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// SSL/TLS settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SslSettings {
    pub connect_timeout_secs: u64,
    pub handshake_timeout_secs: u64,
    pub mtls_timeout_secs: u64,
}

impl Default for SslSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            handshake_timeout_secs: 10,
            mtls_timeout_secs: 10,
        }
    }
}

impl SslSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_secs(self.handshake_timeout_secs)
    }

    pub fn mtls_timeout(&self) -> Duration {
        Duration::from_secs(self.mtls_timeout_secs)
    }
}

/// Trust store discovery settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiscoverySettings {
    /// Extensions (without dot) treated as PEM bundles
    pub pem_extensions: Vec<String>,
    /// Extensions (without dot) treated as Java keystores
    pub keystore_extensions: Vec<String>,
    /// Directory names never descended into
    pub skip_dirs: Vec<String>,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            pem_extensions: vec!["pem".into(), "crt".into(), "cert".into()],
            keystore_extensions: vec!["jks".into(), "keystore".into(), "truststore".into()],
            skip_dirs: vec!["node_modules".into()],
        }
    }
}

/// Java keystore settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeystoreSettings {
    /// Candidate store passwords, tried in order
    pub passwords: Vec<String>,
    /// Explicit keytool location
    pub keytool_path: Option<PathBuf>,
}

impl Default for KeystoreSettings {
    fn default() -> Self {
        Self {
            passwords: vec!["changeit".into(), "password".into(), "truststore".into()],
            keytool_path: None,
        }
    }
}

/// Certificate info server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub server_cert_path: PathBuf,
    pub chain_path: PathBuf,
    pub trust_store_path: PathBuf,
    /// Address the server probes to report the live protocol and cipher
    pub probe_addr: String,
    /// SNI sent by the probe
    pub probe_server_name: String,
    pub probe_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            server_cert_path: PathBuf::from("/etc/nginx/ssl/server.crt"),
            chain_path: PathBuf::from("/etc/nginx/ssl/chain.crt"),
            trust_store_path: PathBuf::from("/etc/nginx/ssl/ca-bundle.crt"),
            probe_addr: "127.0.0.1:443".to_string(),
            probe_server_name: "localhost".to_string(),
            probe_timeout_secs: 5,
        }
    }
}

impl ServerSettings {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

/// Application settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub ssl: SslSettings,
    #[serde(default)]
    pub discovery: DiscoverySettings,
    #[serde(default)]
    pub keystore: KeystoreSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

impl Settings {
    /// Load settings from the default config file
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_path = Path::new("config/default.toml");
        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load settings from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })
    }

    /// Load from `path` when given, otherwise from the default location
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => Self::load_default(),
        }
    }
}
