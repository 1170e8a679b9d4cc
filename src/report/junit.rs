use crate::report::report_model::TestSuiteReport;
use crate::scenario::scenario_model::{TestResult, TestStatus};

// ============================================================================
// JUnit XML reporter: standard CI integration format
// ============================================================================

const CLASSNAME: &str = "ecommerce-playground";

/// Generate a JUnit XML report for CI systems (Jenkins, GitHub Actions, GitLab CI).
///
/// Known-defect scenarios that fail are written as skipped test cases so
/// they do not break the build:
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <testsuite name="..." tests="3" failures="1" skipped="1" time="1.234">
///   <testcase name="homepage_loads" classname="ecommerce-playground" time="0.812" />
///   <testcase name="add_to_cart" classname="ecommerce-playground" time="0.311">
///     <failure message="1 check(s) failed" type="OutcomeMismatch">Step 1: ...</failure>
///   </testcase>
///   <testcase name="promo_link_after_fix" classname="ecommerce-playground" time="0.111">
///     <skipped message="promotion SHOP NOW link returns to the home page" />
///   </testcase>
/// </testsuite>
/// ```
pub fn generate_junit_xml(report: &TestSuiteReport) -> String {
    let time_attr = report
        .duration_ms
        .map(|ms| format!(" time=\"{:.3}\"", ms as f64 / 1000.0))
        .unwrap_or_default();

    let cases: String = report.test_results.iter().map(render_case).collect();

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<testsuite name=\"{name}\" tests=\"{tests}\" failures=\"{failures}\" skipped=\"{skipped}\"{time}>\n{cases}</testsuite>\n",
        name = escape_xml(&report.suite_name),
        tests = report.total,
        failures = report.failed,
        skipped = report.xfailed,
        time = time_attr,
        cases = cases,
    )
}

fn render_case(result: &TestResult) -> String {
    let open = format!(
        "  <testcase name=\"{}\" classname=\"{}\" time=\"{:.3}\"",
        escape_xml(&result.scenario_name),
        CLASSNAME,
        result.duration_ms as f64 / 1000.0
    );

    match result.status {
        TestStatus::Passed => format!("{} />\n", open),
        TestStatus::UnexpectedPass => format!(
            "{}>\n    <system-out>XPASS: known defect did not reproduce</system-out>\n  </testcase>\n",
            open
        ),
        TestStatus::ExpectedFailure => {
            let reason = result.xfail_reason.as_deref().unwrap_or("known defect");
            format!(
                "{}>\n    <skipped message=\"{}\" />\n  </testcase>\n",
                open,
                escape_xml(reason)
            )
        }
        TestStatus::Failed => {
            let mut body: Vec<String> = result
                .assertion_results
                .iter()
                .filter(|ar| !ar.passed)
                .map(|ar| {
                    let msg = ar.message.as_deref().unwrap_or("check failed");
                    format!("Step {}: {}", ar.step_index, msg)
                })
                .collect();
            let failure_count = body.len();
            if let Some(error) = &result.error {
                body.push(format!("Error: {}", error));
            }

            let (message, kind) = if failure_count > 0 {
                (format!("{} check(s) failed", failure_count), "OutcomeMismatch")
            } else {
                ("execution error".to_string(), "ExecutionError")
            };

            format!(
                "{open}>\n    <failure message=\"{message}\" type=\"{kind}\">{body}</failure>\n  </testcase>\n",
                open = open,
                message = escape_xml(&message),
                kind = kind,
                body = escape_xml(&body.join("\n")),
            )
        }
    }
}

/// Escape XML special characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
