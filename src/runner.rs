//! Validation orchestration engine
//!
//! Discovers trust stores and runs the webserver and mTLS tests against each
//! one, strictly in sequence. Progress is reported through an event callback
//! so any frontend can render it.

use crate::checks::{mtls_url, MtlsChecker, WebserverChecker};
use crate::config::Settings;
use crate::discovery::{Keytool, StaticPasswords, TrustStoreScanner};
use crate::models::{
    ClientCredentials, RunReport, TestCase, TestCategory, TestPayload, TrustStoreRecord,
};
use crate::output::json::write_json_file;
use anyhow::Result;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for a validation run
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Root directory searched for trust stores
    pub scan_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub client_cert: PathBuf,
    pub client_key: PathBuf,
    /// Where to write the JSON report, if anywhere
    pub output: Option<PathBuf>,
    /// Run the mTLS test next to the webserver test
    pub mtls_enabled: bool,
    /// Extra keystore passwords tried before the configured ones
    pub keystore_passwords: Vec<String>,
    pub settings: Settings,
}

impl ValidationConfig {
    pub fn new(scan_dir: impl Into<PathBuf>, host: impl Into<String>, port: u16) -> Self {
        Self {
            scan_dir: scan_dir.into(),
            host: host.into(),
            port,
            client_cert: PathBuf::from("certs/client.crt"),
            client_key: PathBuf::from("certs/client.key"),
            output: None,
            mtls_enabled: true,
            keystore_passwords: Vec::new(),
            settings: Settings::default(),
        }
    }

    fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Events emitted during a run
#[derive(Debug, Clone)]
pub enum ValidationEvent {
    DiscoveryStarted {
        root: PathBuf,
    },
    DiscoveryComplete {
        stores: Vec<TrustStoreRecord>,
    },
    NoTrustStores,
    /// Upper bound on the number of tests about to run
    TestsStarted {
        planned: usize,
    },
    TestStarted {
        category: TestCategory,
        trust_store: PathBuf,
    },
    TestComplete {
        category: TestCategory,
        case: TestCase,
    },
    MtlsSkipped {
        trust_store: PathBuf,
    },
    ReportWritten {
        path: PathBuf,
    },
}

/// Complete results from a validation run
#[derive(Debug, Clone)]
pub struct RunResult {
    pub report: RunReport,
    /// True when at least one test ran and every executed test passed
    pub success: bool,
}

/// Runs trust chain validation against one target
pub struct TrustChainValidator {
    config: ValidationConfig,
    scanner: Arc<TrustStoreScanner>,
    webserver: WebserverChecker,
    mtls: MtlsChecker,
}

impl TrustChainValidator {
    /// Create a validator, enabling keystore discovery when keytool can be
    /// found on this host.
    pub fn new(config: ValidationConfig) -> Self {
        let settings = &config.settings;
        let mut scanner = TrustStoreScanner::new(settings.discovery.clone());

        match Keytool::locate(settings.keystore.keytool_path.as_deref()) {
            Ok(keytool) => {
                tracing::debug!("Using keytool at {}", keytool.path().display());
                let credentials =
                    StaticPasswords::from_settings(&settings.keystore, &config.keystore_passwords);
                scanner = scanner.with_keystores(Box::new(keytool), Box::new(credentials));
            }
            Err(e) => tracing::debug!("{}", e),
        }

        Self::with_scanner(config, scanner)
    }

    /// Create a validator with a preconfigured scanner
    pub fn with_scanner(config: ValidationConfig, scanner: TrustStoreScanner) -> Self {
        let webserver = WebserverChecker::new(config.settings.ssl.clone());
        let mtls = MtlsChecker::new(config.settings.ssl.clone());
        Self {
            config,
            scanner: Arc::new(scanner),
            webserver,
            mtls,
        }
    }

    /// Discover trust stores and test each of them.
    ///
    /// Test failures are recorded in the report and never abort the run.
    /// Errors are returned only for an unusable scan directory or a report
    /// that cannot be written.
    pub async fn run_tests(&self, on_event: &dyn Fn(ValidationEvent)) -> Result<RunResult> {
        let mut report = RunReport::new();

        on_event(ValidationEvent::DiscoveryStarted {
            root: self.config.scan_dir.clone(),
        });
        // Keystore listing spawns keytool and waits on it
        let scanner = Arc::clone(&self.scanner);
        let root = self.config.scan_dir.clone();
        let stores = tokio::task::spawn_blocking(move || scanner.scan(&root)).await??;
        on_event(ValidationEvent::DiscoveryComplete {
            stores: stores.clone(),
        });

        if stores.is_empty() {
            tracing::error!("No trust stores found in {}", self.config.scan_dir.display());
            on_event(ValidationEvent::NoTrustStores);
            return Ok(RunResult {
                report,
                success: false,
            });
        }

        let per_store = if self.config.mtls_enabled { 2 } else { 1 };
        on_event(ValidationEvent::TestsStarted {
            planned: stores.len() * per_store,
        });

        for store in &stores {
            on_event(ValidationEvent::TestStarted {
                category: TestCategory::Webserver,
                trust_store: store.path.clone(),
            });
            let case = self.run_webserver_test(store).await;
            report.push(TestCategory::Webserver, case.clone());
            on_event(ValidationEvent::TestComplete {
                category: TestCategory::Webserver,
                case,
            });

            if !self.config.mtls_enabled {
                continue;
            }

            on_event(ValidationEvent::TestStarted {
                category: TestCategory::Mtls,
                trust_store: store.path.clone(),
            });
            match self.run_mtls_test(store).await {
                Some(case) => {
                    report.push(TestCategory::Mtls, case.clone());
                    on_event(ValidationEvent::TestComplete {
                        category: TestCategory::Mtls,
                        case,
                    });
                }
                None => on_event(ValidationEvent::MtlsSkipped {
                    trust_store: store.path.clone(),
                }),
            }
        }

        report.summary.finish();

        if let Some(path) = &self.config.output {
            write_json_file(&report, path)?;
            on_event(ValidationEvent::ReportWritten { path: path.clone() });
        }

        let success = report.summary.total_tests > 0 && report.summary.failed == 0;
        Ok(RunResult { report, success })
    }

    /// Webserver test for one trust store; always yields a case
    pub async fn run_webserver_test(&self, store: &TrustStoreRecord) -> TestCase {
        let timestamp = Utc::now();
        let target = self.config.target();

        match self
            .webserver
            .check(store, &self.config.host, self.config.port)
            .await
        {
            Ok(peer) => TestCase::passed(
                &store.path,
                target,
                timestamp,
                TestPayload::CertificateInfo(peer),
            ),
            Err(e) => {
                tracing::debug!("Webserver test with {} failed: {}", store.path.display(), e);
                TestCase::failed(&store.path, target, timestamp, e.kind(), e.to_string())
            }
        }
    }

    /// mTLS test for one trust store; `None` when it was skipped
    pub async fn run_mtls_test(&self, store: &TrustStoreRecord) -> Option<TestCase> {
        let timestamp = Utc::now();
        let target = mtls_url(&self.config.host, self.config.port);
        let credentials = ClientCredentials {
            client_cert: self.config.client_cert.clone(),
            client_key: self.config.client_key.clone(),
        };

        let case = match self
            .mtls
            .check(
                store,
                &self.config.host,
                self.config.port,
                &self.config.client_cert,
                &self.config.client_key,
            )
            .await
        {
            Ok(None) => return None,
            Ok(Some(body)) => {
                TestCase::passed(&store.path, target, timestamp, TestPayload::Response(body))
            }
            Err(e) => {
                tracing::debug!("mTLS test with {} failed: {}", store.path.display(), e);
                TestCase::failed(&store.path, target, timestamp, e.kind(), e.to_string())
            }
        };

        Some(case.with_credentials(credentials))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::{KeystoreLister, ListOutcome};
    use crate::utils::KeystoreError;
    use std::path::Path;
    use std::sync::Mutex;
    use std::thread::ThreadId;

    /// Lister that records which thread it was called on
    struct ThreadRecorder {
        threads: Arc<Mutex<Vec<ThreadId>>>,
    }

    impl KeystoreLister for ThreadRecorder {
        fn list(&self, _path: &Path, _password: &str) -> Result<ListOutcome, KeystoreError> {
            self.threads
                .lock()
                .unwrap()
                .push(std::thread::current().id());
            Ok(ListOutcome::Opened {
                certificate_count: 2,
            })
        }
    }

    #[tokio::test]
    async fn test_empty_directory_fails_without_tests() {
        let dir = tempfile::tempdir().unwrap();
        let config = ValidationConfig::new(dir.path(), "localhost", 443);
        let scanner = TrustStoreScanner::new(config.settings.discovery.clone());
        let validator = TrustChainValidator::with_scanner(config, scanner);

        let events = Mutex::new(Vec::new());
        let result = validator
            .run_tests(&|e: ValidationEvent| events.lock().unwrap().push(e))
            .await
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.report.summary.total_tests, 0);
        assert_eq!(result.report.summary.passed, 0);
        assert_eq!(result.report.summary.failed, 0);
        assert!(events
            .lock()
            .unwrap()
            .iter()
            .any(|e| matches!(e, ValidationEvent::NoTrustStores)));
    }

    #[tokio::test]
    async fn test_missing_scan_dir_is_an_error() {
        let config = ValidationConfig::new("/nonexistent/scan/root", "localhost", 443);
        let scanner = TrustStoreScanner::new(config.settings.discovery.clone());
        let validator = TrustChainValidator::with_scanner(config, scanner);

        assert!(validator.run_tests(&|_: ValidationEvent| {}).await.is_err());
    }

    #[tokio::test]
    async fn test_keystore_listing_runs_off_the_runtime_thread() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cacerts.jks"), b"\xfe\xed\xfe\xed").unwrap();

        let mut config = ValidationConfig::new(dir.path(), "localhost", 443);
        config.mtls_enabled = false;
        let threads = Arc::new(Mutex::new(Vec::new()));
        let scanner = TrustStoreScanner::new(config.settings.discovery.clone()).with_keystores(
            Box::new(ThreadRecorder {
                threads: Arc::clone(&threads),
            }),
            Box::new(StaticPasswords::new(vec!["changeit".to_string()])),
        );
        let validator = TrustChainValidator::with_scanner(config, scanner);

        let result = validator.run_tests(&|_: ValidationEvent| {}).await.unwrap();
        assert_eq!(result.report.summary.total_tests, 1);

        let threads = threads.lock().unwrap();
        assert_eq!(threads.len(), 1);
        assert_ne!(threads[0], std::thread::current().id());
    }
}
