//! Terminal output
//!
//! Renders orchestrator events as status lines above the progress bar and
//! prints the end-of-run summary.

use crate::models::{RunReport, TestCategory, TestCase};
use crate::runner::ValidationEvent;
use crate::utils::progress::{fail_line, info_line, pass_line, warning_line, ProgressTracker};
use console::style;

const RULE_WIDTH: usize = 50;

/// Render one event on the tracker
pub fn report_event(tracker: &ProgressTracker, event: &ValidationEvent) {
    match event {
        ValidationEvent::DiscoveryStarted { root } => {
            tracker.set_message(&format!("Scanning {} for trust stores...", root.display()));
        }
        ValidationEvent::DiscoveryComplete { stores } => {
            tracker.println(&info_line(&format!(
                "Discovered {} trust stores",
                stores.len()
            )));
            for store in stores {
                tracker.println(&format!(
                    "      {} ({}, {} certificates)",
                    style(store.path.display()).dim(),
                    store.format,
                    store.certificate_count
                ));
            }
        }
        ValidationEvent::NoTrustStores => {
            tracker.println(&fail_line("No trust stores found!"));
        }
        ValidationEvent::TestsStarted { planned } => {
            tracker.start_tests(*planned as u64);
        }
        ValidationEvent::TestStarted {
            category,
            trust_store,
        } => {
            tracker.set_message(&format!("{} test: {}", category, trust_store.display()));
        }
        ValidationEvent::TestComplete { category, case } => {
            tracker.complete_test(&case_line(*category, case));
        }
        ValidationEvent::MtlsSkipped { trust_store } => {
            tracker.complete_test(&warning_line(&format!(
                "Skipping MTLS test for {} - client cert or key not found",
                trust_store.display()
            )));
        }
        ValidationEvent::ReportWritten { path } => {
            tracker.println(&info_line(&format!(
                "Test results saved to {}",
                path.display()
            )));
        }
    }
}

/// Status line for a finished test case
pub fn case_line(category: TestCategory, case: &TestCase) -> String {
    if case.is_passed() {
        pass_line(&format!(
            "{} connection test PASSED using trust store {}",
            category,
            case.trust_store.display()
        ))
    } else {
        fail_line(&format!(
            "{} connection test FAILED using trust store {}: {}",
            category,
            case.trust_store.display(),
            case.error.as_deref().unwrap_or("unknown error")
        ))
    }
}

/// Summary block as printed lines
pub fn summary_lines(report: &RunReport) -> Vec<String> {
    let summary = &report.summary;
    let rule = "=".repeat(RULE_WIDTH);
    let headline = format!(
        "SUMMARY: {}/{} tests passed",
        summary.passed, summary.total_tests
    );
    let headline = if summary.total_tests > 0 && summary.failed == 0 {
        style(headline).green().bold().to_string()
    } else {
        style(headline).red().bold().to_string()
    };

    let mut lines = vec![rule.clone(), headline];
    for category in [TestCategory::Webserver, TestCategory::Mtls] {
        lines.push(format!(
            "{} tests: {}/{} passed",
            category,
            report.passed_in(category),
            report.cases(category).len()
        ));
    }
    lines.push(rule);
    lines
}

/// Print the end-of-run summary
pub fn print_summary(report: &RunReport) {
    println!();
    for line in summary_lines(report) {
        println!("{}", line);
    }
}
