//! Test case and run summary types

use super::PeerCertificate;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Outcome of a single test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestOutcome {
    Passed,
    Failed,
}

/// Category of a failed test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Handshake or certificate verification failure
    Tls,
    /// TCP connection could not be established
    Connection,
    /// Connect, handshake or request deadline expired
    Timeout,
    /// Server answered with a non-200 status
    Http,
    /// Trust store or client identity could not be loaded
    TrustStore,
    /// Trust store format cannot anchor a handshake
    Unsupported,
    Other,
}

/// Result data attached to a test case
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestPayload {
    /// Peer certificate seen by the webserver test
    CertificateInfo(PeerCertificate),
    /// Response body returned by the `/mtls` endpoint
    Response(serde_json::Value),
}

/// Client credentials presented by an mTLS test
#[derive(Debug, Clone, Serialize)]
pub struct ClientCredentials {
    pub client_cert: PathBuf,
    pub client_key: PathBuf,
}

/// A single executed test
#[derive(Debug, Clone, Serialize)]
pub struct TestCase {
    /// Trust store used as the anchor
    pub trust_store: PathBuf,
    /// `host:port` for webserver tests, URL for mTLS tests
    pub target: String,
    /// When the test ran
    pub timestamp: DateTime<Utc>,
    pub status: TestOutcome,
    #[serde(flatten)]
    pub credentials: Option<ClientCredentials>,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<FailureKind>,
    #[serde(flatten)]
    pub payload: Option<TestPayload>,
}

impl TestCase {
    /// Create a passing test case
    pub fn passed(
        trust_store: impl Into<PathBuf>,
        target: impl Into<String>,
        timestamp: DateTime<Utc>,
        payload: TestPayload,
    ) -> Self {
        Self {
            trust_store: trust_store.into(),
            target: target.into(),
            timestamp,
            status: TestOutcome::Passed,
            credentials: None,
            error: None,
            error_kind: None,
            payload: Some(payload),
        }
    }

    /// Create a failing test case
    pub fn failed(
        trust_store: impl Into<PathBuf>,
        target: impl Into<String>,
        timestamp: DateTime<Utc>,
        kind: FailureKind,
        error: impl Into<String>,
    ) -> Self {
        Self {
            trust_store: trust_store.into(),
            target: target.into(),
            timestamp,
            status: TestOutcome::Failed,
            credentials: None,
            error: Some(error.into()),
            error_kind: Some(kind),
            payload: None,
        }
    }

    /// Attach the client credentials used for the test
    pub fn with_credentials(mut self, credentials: ClientCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn is_passed(&self) -> bool {
        self.status == TestOutcome::Passed
    }
}

/// Aggregate counters for a run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub total_tests: usize,
    pub passed: usize,
    pub failed: usize,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

impl RunSummary {
    /// Start a new summary at the current time
    pub fn start() -> Self {
        Self {
            total_tests: 0,
            passed: 0,
            failed: 0,
            start_time: Utc::now(),
            end_time: None,
        }
    }

    /// Count one completed test
    pub fn record(&mut self, outcome: TestOutcome) {
        self.total_tests += 1;
        match outcome {
            TestOutcome::Passed => self.passed += 1,
            TestOutcome::Failed => self.failed += 1,
        }
    }

    /// Stamp the end time
    pub fn finish(&mut self) {
        self.end_time = Some(Utc::now());
    }
}

/// Category a test case is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestCategory {
    Webserver,
    Mtls,
}

impl std::fmt::Display for TestCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestCategory::Webserver => write!(f, "Webserver"),
            TestCategory::Mtls => write!(f, "MTLS"),
        }
    }
}

/// Full result structure of a validation run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub webserver: Vec<TestCase>,
    pub mtls: Vec<TestCase>,
    pub summary: RunSummary,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            webserver: Vec::new(),
            mtls: Vec::new(),
            summary: RunSummary::start(),
        }
    }

    /// Append a completed test case and update the counters
    pub fn push(&mut self, category: TestCategory, case: TestCase) {
        self.summary.record(case.status);
        match category {
            TestCategory::Webserver => self.webserver.push(case),
            TestCategory::Mtls => self.mtls.push(case),
        }
    }

    /// Number of passed cases in a category
    pub fn passed_in(&self, category: TestCategory) -> usize {
        self.cases(category).iter().filter(|c| c.is_passed()).count()
    }

    /// All cases in a category
    pub fn cases(&self, category: TestCategory) -> &[TestCase] {
        match category {
            TestCategory::Webserver => &self.webserver,
            TestCategory::Mtls => &self.mtls,
        }
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_keeps_counters_consistent() {
        let mut report = RunReport::new();
        let now = Utc::now();
        report.push(
            TestCategory::Webserver,
            TestCase::failed("a.pem", "localhost:443", now, FailureKind::Tls, "SSL Error: x"),
        );
        report.push(
            TestCategory::Mtls,
            TestCase::passed(
                "a.pem",
                "https://localhost:443/mtls",
                now,
                TestPayload::Response(serde_json::json!({"ok": true})),
            ),
        );

        let s = &report.summary;
        assert_eq!(s.total_tests, report.webserver.len() + report.mtls.len());
        assert_eq!(s.passed + s.failed, s.total_tests);
        assert_eq!(report.passed_in(TestCategory::Mtls), 1);
        assert_eq!(report.passed_in(TestCategory::Webserver), 0);
    }

    #[test]
    fn test_case_serialization_shape() {
        let case = TestCase::passed(
            "/stores/ca.pem",
            "https://localhost:8443/mtls",
            Utc::now(),
            TestPayload::Response(serde_json::json!({"status": "success"})),
        )
        .with_credentials(ClientCredentials {
            client_cert: "certs/client.crt".into(),
            client_key: "certs/client.key".into(),
        });

        let value = serde_json::to_value(&case).unwrap();
        assert_eq!(value["status"], "passed");
        assert_eq!(value["response"]["status"], "success");
        assert_eq!(value["client_cert"], "certs/client.crt");
        assert!(value["error"].is_null());
        assert!(value.get("error_kind").is_none());
    }

    #[test]
    fn test_failed_case_serialization() {
        let case = TestCase::failed(
            "/stores/ca.pem",
            "localhost:443",
            Utc::now(),
            FailureKind::Connection,
            "Connection to localhost:443 failed: refused",
        );
        let value = serde_json::to_value(&case).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["error_kind"], "connection");
        assert!(value.get("certificate_info").is_none());
    }
}
