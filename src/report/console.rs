use crate::report::report_model::TestSuiteReport;
use crate::scenario::scenario_model::TestStatus;

// ============================================================================
// Console reporter: formatted terminal output
// ============================================================================

/// Format a test suite report for terminal output.
///
/// Produces output like:
/// ```text
/// === Test Suite: storefront ===
///
/// ✓ PASS   homepage_loads (1 steps, 2 assertions)
/// ✗ FAIL   add_to_cart (2 steps, 1 assertions)
///     [FAIL] Step 1: TextContains: expected text containing 'HTC Touch HD', observed ''
/// ~ XFAIL  promo_link_after_fix (1 steps, 1 assertions)
///     [XFAIL] promotion SHOP NOW link returns to the home page
///
/// === Results: 1 passed, 1 failed, 1 xfailed, 0 xpassed (3 total) ===
/// ```
pub fn format_console_report(report: &TestSuiteReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Test Suite: {} ===\n\n", report.suite_name));

    for result in &report.test_results {
        let assertion_count = result.assertion_results.len();
        out.push_str(&format!(
            "{:<8} {} ({} steps, {} assertions)\n",
            marker(result.status),
            result.scenario_name,
            result.steps_run,
            assertion_count
        ));

        match result.status {
            TestStatus::Failed => {
                for ar in result.assertion_results.iter().filter(|ar| !ar.passed) {
                    let detail = ar.message.as_deref().unwrap_or("check failed");
                    out.push_str(&format!(
                        "    [FAIL] Step {}: {}: {}\n",
                        ar.step_index,
                        ar.spec.kind(),
                        detail
                    ));
                }
                // Check failures are already listed above
                let failed_check = result.assertion_results.iter().any(|ar| !ar.passed);
                if let Some(error) = result.error.as_ref().filter(|_| !failed_check) {
                    out.push_str(&format!("    [ERROR] {}\n", error));
                }
            }
            TestStatus::ExpectedFailure => {
                if let Some(reason) = &result.xfail_reason {
                    out.push_str(&format!("    [XFAIL] {}\n", reason));
                }
            }
            TestStatus::UnexpectedPass => {
                out.push_str("    [XPASS] known defect did not reproduce; it may be fixed\n");
            }
            TestStatus::Passed => {}
        }
    }

    out.push_str(&format!(
        "\n=== Results: {} passed, {} failed, {} xfailed, {} xpassed ({} total)",
        report.passed, report.failed, report.xfailed, report.xpassed, report.total
    ));

    if let Some(ms) = report.duration_ms {
        let secs = ms as f64 / 1000.0;
        out.push_str(&format!(" in {:.1}s", secs));
    }

    out.push_str(" ===\n");

    out
}

fn marker(status: TestStatus) -> String {
    let symbol = match status {
        TestStatus::Passed => '\u{2713}',
        TestStatus::Failed => '\u{2717}',
        TestStatus::ExpectedFailure => '~',
        TestStatus::UnexpectedPass => '!',
    };
    format!("{} {}", symbol, status.label())
}
