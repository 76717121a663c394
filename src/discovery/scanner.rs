//! Trust store discovery
//!
//! Walks a directory tree and collects PEM bundles containing certificates
//! and Java keystores that open with one of the candidate passwords.

use super::keystore::{open_keystore, KeystoreCredentials, KeystoreLister};
use crate::cert_ops::count_certificate_markers;
use crate::config::DiscoverySettings;
use crate::models::TrustStoreRecord;
use crate::utils::DiscoveryError;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Keystore support plugged into the scanner
struct KeystoreSupport {
    lister: Box<dyn KeystoreLister>,
    credentials: Box<dyn KeystoreCredentials>,
}

/// Trust store scanner
pub struct TrustStoreScanner {
    settings: DiscoverySettings,
    keystores: Option<KeystoreSupport>,
}

impl TrustStoreScanner {
    /// Scanner that only finds PEM bundles until keystore support is added
    pub fn new(settings: DiscoverySettings) -> Self {
        Self {
            settings,
            keystores: None,
        }
    }

    /// Enable keystore discovery
    pub fn with_keystores(
        mut self,
        lister: Box<dyn KeystoreLister>,
        credentials: Box<dyn KeystoreCredentials>,
    ) -> Self {
        self.keystores = Some(KeystoreSupport {
            lister,
            credentials,
        });
        self
    }

    /// Scan `root` for trust stores.
    ///
    /// PEM records come first, then keystore records, each in file-name
    /// order. Unreadable files are logged and skipped.
    pub fn scan(&self, root: &Path) -> Result<Vec<TrustStoreRecord>, DiscoveryError> {
        if !root.is_dir() {
            return Err(DiscoveryError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        let (pem_candidates, keystore_candidates) = self.collect_candidates(root);
        let mut stores = Vec::new();

        for path in pem_candidates {
            match inspect_pem(&path) {
                Ok(0) => tracing::debug!("No certificates in {}", path.display()),
                Ok(count) => stores.push(TrustStoreRecord::pem(path, count)),
                Err(e) => tracing::error!("{}", e),
            }
        }

        match &self.keystores {
            Some(support) => {
                for path in keystore_candidates {
                    if let Some((password, count)) = open_keystore(
                        support.lister.as_ref(),
                        support.credentials.as_ref(),
                        &path,
                    ) {
                        stores.push(TrustStoreRecord::jks(path, count, password));
                    }
                }
            }
            None => {
                tracing::warn!("keytool not found, skipping JKS trust store discovery");
            }
        }

        tracing::info!("Discovered {} trust stores", stores.len());
        Ok(stores)
    }

    fn collect_candidates(&self, root: &Path) -> (Vec<PathBuf>, Vec<PathBuf>) {
        let mut pem = Vec::new();
        let mut keystores = Vec::new();

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.is_skipped_dir(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Error walking {}: {}", root.display(), e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let Some(ext) = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_ascii_lowercase())
            else {
                continue;
            };

            if matches_extension(&self.settings.pem_extensions, &ext) {
                pem.push(entry.into_path());
            } else if matches_extension(&self.settings.keystore_extensions, &ext) {
                keystores.push(entry.into_path());
            }
        }

        (pem, keystores)
    }

    fn is_skipped_dir(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        name.starts_with('.') || self.settings.skip_dirs.iter().any(|d| d.as_str() == name)
    }
}

fn matches_extension(extensions: &[String], ext: &str) -> bool {
    extensions
        .iter()
        .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

/// Count certificate markers in a candidate PEM file
fn inspect_pem(path: &Path) -> Result<usize, DiscoveryError> {
    let data = std::fs::read(path).map_err(|e| DiscoveryError::ReadFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(count_certificate_markers(&data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrustStoreFormat;

    const CERT: &str = "-----BEGIN CERTIFICATE-----\nAQID\n-----END CERTIFICATE-----\n";

    #[test]
    fn test_counts_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bundle.pem"), CERT.repeat(3)).unwrap();
        std::fs::write(dir.path().join("single.CRT"), CERT).unwrap();
        std::fs::write(dir.path().join("empty.cert"), "no certs").unwrap();
        std::fs::write(dir.path().join("notes.txt"), CERT).unwrap();

        let stores = TrustStoreScanner::new(DiscoverySettings::default())
            .scan(dir.path())
            .unwrap();

        assert_eq!(stores.len(), 2);
        assert_eq!(stores[0].path, dir.path().join("bundle.pem"));
        assert_eq!(stores[0].certificate_count, 3);
        assert_eq!(stores[1].path, dir.path().join("single.CRT"));
        assert_eq!(stores[1].certificate_count, 1);
        assert!(stores.iter().all(|s| s.format == TrustStoreFormat::Pem));
    }

    #[test]
    fn test_skips_hidden_and_node_modules() {
        let dir = tempfile::tempdir().unwrap();
        for sub in [".git", "node_modules", "certs"] {
            std::fs::create_dir(dir.path().join(sub)).unwrap();
            std::fs::write(dir.path().join(sub).join("ca.pem"), CERT).unwrap();
        }

        let stores = TrustStoreScanner::new(DiscoverySettings::default())
            .scan(dir.path())
            .unwrap();

        assert_eq!(stores.len(), 1);
        assert_eq!(stores[0].path, dir.path().join("certs").join("ca.pem"));
    }

    #[test]
    fn test_missing_root() {
        let err = TrustStoreScanner::new(DiscoverySettings::default())
            .scan(Path::new("/nonexistent/trust/stores"))
            .unwrap_err();
        assert!(matches!(err, DiscoveryError::NotADirectory { .. }));
    }
}
