//! JSON output formatter

use crate::models::RunReport;
use crate::utils::ReportError;
use std::path::Path;

/// Serialize a report as pretty-printed JSON
pub fn to_json(report: &RunReport) -> Result<String, ReportError> {
    serde_json::to_string_pretty(report).map_err(|e| ReportError::Serialize {
        message: e.to_string(),
    })
}

/// Write a report to `path`, creating parent directories as needed
pub fn write_json_file(report: &RunReport, path: &Path) -> Result<(), ReportError> {
    let json = to_json(report)?;

    let write_error = |e: std::io::Error| ReportError::WriteError {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    std::fs::write(path, json).map_err(write_error)?;

    tracing::info!("Test results saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FailureKind, TestCase, TestCategory};
    use chrono::Utc;

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("results.json");

        let mut report = RunReport::new();
        report.push(
            TestCategory::Webserver,
            TestCase::failed(
                "ca.pem",
                "localhost:443",
                Utc::now(),
                FailureKind::Connection,
                "Connection to localhost:443 failed: refused",
            ),
        );
        report.summary.finish();

        write_json_file(&report, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["summary"]["total_tests"], 1);
        assert_eq!(value["summary"]["failed"], 1);
        assert_eq!(value["webserver"][0]["error_kind"], "connection");
        assert!(value["mtls"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be overwritten with a file
        let err = write_json_file(&RunReport::new(), dir.path()).unwrap_err();
        assert!(matches!(err, ReportError::WriteError { .. }));
    }
}
