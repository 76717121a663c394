//! Java keystore access
//!
//! Keystores are opened through the external `keytool` command. Both the
//! tool and the password source sit behind traits so deployments can plug in
//! real credentials and tests can avoid a JDK.

use crate::config::KeystoreSettings;
use crate::utils::KeystoreError;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use walkdir::WalkDir;

/// Marker `keytool -list` prints once per certificate entry
const FINGERPRINT_MARKER: &str = "Certificate fingerprint";

/// Source of candidate passwords for a keystore
pub trait KeystoreCredentials: Send + Sync {
    /// Passwords to try for `path`, in order
    fn candidates(&self, path: &Path) -> Vec<String>;
}

/// Fixed password list applied to every keystore
#[derive(Debug, Clone)]
pub struct StaticPasswords {
    passwords: Vec<String>,
}

impl StaticPasswords {
    pub fn new(passwords: Vec<String>) -> Self {
        Self { passwords }
    }

    /// Passwords from `extra` first, then the configured list, without duplicates
    pub fn from_settings(settings: &KeystoreSettings, extra: &[String]) -> Self {
        let mut passwords: Vec<String> = Vec::new();
        for p in extra.iter().chain(settings.passwords.iter()) {
            if !passwords.contains(p) {
                passwords.push(p.clone());
            }
        }
        Self { passwords }
    }
}

impl KeystoreCredentials for StaticPasswords {
    fn candidates(&self, _path: &Path) -> Vec<String> {
        self.passwords.clone()
    }
}

/// Result of trying one password
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOutcome {
    /// The store opened and holds this many certificate entries
    Opened { certificate_count: usize },
    /// The store could not be opened with the password
    Rejected,
}

/// Something that can list the entries of a keystore
pub trait KeystoreLister: Send + Sync {
    fn list(&self, path: &Path, password: &str) -> Result<ListOutcome, KeystoreError>;
}

/// `keytool`-backed keystore lister
#[derive(Debug, Clone)]
pub struct Keytool {
    path: PathBuf,
}

impl Keytool {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Locate keytool on this host
    pub fn locate(configured: Option<&Path>) -> Result<Self, KeystoreError> {
        find_keytool(configured)
            .map(Self::new)
            .ok_or(KeystoreError::ToolNotFound)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeystoreLister for Keytool {
    fn list(&self, path: &Path, password: &str) -> Result<ListOutcome, KeystoreError> {
        let output = Command::new(&self.path)
            .arg("-list")
            .arg("-keystore")
            .arg(path)
            .arg("-storepass")
            .arg(password)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| KeystoreError::ToolFailed {
                tool: self.path.display().to_string(),
                message: e.to_string(),
            })?;

        if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            Ok(ListOutcome::Opened {
                certificate_count: count_fingerprints(&stdout),
            })
        } else {
            Ok(ListOutcome::Rejected)
        }
    }
}

/// Number of certificate entries in `keytool -list` output
pub fn count_fingerprints(listing: &str) -> usize {
    listing.matches(FINGERPRINT_MARKER).count()
}

/// Try every candidate password and return the first that opens the store
/// along with its certificate count. A failing attempt is logged and the next
/// password is tried.
pub fn open_keystore(
    lister: &dyn KeystoreLister,
    credentials: &dyn KeystoreCredentials,
    path: &Path,
) -> Option<(String, usize)> {
    for password in credentials.candidates(path) {
        match lister.list(path, &password) {
            Ok(ListOutcome::Opened { certificate_count }) => {
                return Some((password, certificate_count));
            }
            Ok(ListOutcome::Rejected) => {}
            Err(e) => {
                tracing::error!("Error with keytool for {}: {}", path.display(), e);
            }
        }
    }
    tracing::debug!("No candidate password opened {}", path.display());
    None
}

/// Search for a keytool executable.
///
/// Order: the configured path, `PATH`, `$JAVA_HOME/bin`, then the usual JVM
/// install directories.
pub fn find_keytool(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = configured {
        return is_executable(path).then(|| path.to_path_buf());
    }

    let binary = keytool_binary_name();

    if let Some(paths) = std::env::var_os("PATH") {
        for dir in std::env::split_paths(&paths) {
            let candidate = dir.join(binary);
            if is_executable(&candidate) {
                return Some(candidate);
            }
        }
    }

    if let Some(java_home) = std::env::var_os("JAVA_HOME") {
        let candidate = PathBuf::from(java_home).join("bin").join(binary);
        if is_executable(&candidate) {
            return Some(candidate);
        }
    }

    let mut roots: Vec<PathBuf> = [
        "/usr/lib/jvm",
        "/usr/java",
        "/usr/local/java",
        "/opt/java",
        "/opt/jdk",
        "/opt/openjdk",
        "/Library/Java/JavaVirtualMachines",
    ]
    .iter()
    .map(PathBuf::from)
    .collect();
    if let Some(home) = std::env::var_os("HOME") {
        roots.push(PathBuf::from(home).join(".sdkman/candidates/java"));
    }

    roots
        .iter()
        .filter(|root| root.is_dir())
        .flat_map(|root| {
            WalkDir::new(root)
                .max_depth(6)
                .into_iter()
                .filter_map(|e| e.ok())
        })
        .find(|entry| entry.file_name() == binary && is_executable(entry.path()))
        .map(|entry| entry.into_path())
}

fn keytool_binary_name() -> &'static str {
    if cfg!(windows) {
        "keytool.exe"
    } else {
        "keytool"
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
