use crate::report::report_model::TestSuiteReport;
use crate::scenario::scenario_model::{TestResult, TestStatus};

// ============================================================================
// HTML reporter: self-contained HTML report
// ============================================================================

/// Generate a self-contained HTML report.
///
/// Green header when nothing failed unexpectedly, red otherwise. Each
/// scenario gets a card colored by status; known-defect cards show their
/// reason, failed cards list failed checks and the ending error, and every
/// card links the screenshots taken during the run.
pub fn generate_html_report(report: &TestSuiteReport) -> String {
    let (header_color, status_text) = if report.all_passed() {
        ("#4CAF50", "ALL SCENARIOS PASSED")
    } else {
        ("#f44336", "SOME SCENARIOS FAILED")
    };

    let duration_text = report
        .duration_ms
        .map(|ms| format!(" in {:.1}s", ms as f64 / 1000.0))
        .unwrap_or_default();

    let test_cases: String = report.test_results.iter().map(render_case).collect();

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{suite_name}: Scenario Report</title>
<style>
body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; margin: 0; padding: 0; background: #f5f5f5; }}
.header {{ background: {header_color}; color: white; padding: 20px 30px; }}
.header h1 {{ margin: 0 0 8px 0; font-size: 24px; }}
.header p {{ margin: 0; font-size: 16px; opacity: 0.9; }}
.content {{ max-width: 900px; margin: 20px auto; padding: 0 20px; }}
.test-case {{ background: white; border-radius: 6px; padding: 16px 20px; margin-bottom: 12px; border-left: 4px solid #ccc; }}
.test-case.pass {{ border-left-color: #4CAF50; }}
.test-case.fail {{ border-left-color: #f44336; }}
.test-case.xfail {{ border-left-color: #FF9800; }}
.test-case.xpass {{ border-left-color: #2196F3; }}
.test-case h3 {{ margin: 0 0 8px 0; font-size: 16px; }}
.test-case p {{ margin: 4px 0; color: #666; font-size: 14px; }}
.test-case .error {{ color: #f44336; font-weight: bold; }}
.test-case .reason {{ color: #E65100; }}
.failures {{ margin: 8px 0 0 0; padding-left: 20px; }}
.failures li {{ color: #c62828; font-size: 13px; margin-bottom: 4px; }}
.shots a {{ font-size: 13px; margin-right: 10px; }}
</style>
</head>
<body>
<div class="header">
<h1>{status_text}</h1>
<p>{suite_name}: {passed} passed, {failed} failed, {xfailed} xfailed, {xpassed} xpassed ({total} total){duration}</p>
</div>
<div class="content">
{test_cases}
</div>
</body>
</html>"##,
        suite_name = escape_html(&report.suite_name),
        header_color = header_color,
        status_text = status_text,
        passed = report.passed,
        failed = report.failed,
        xfailed = report.xfailed,
        xpassed = report.xpassed,
        total = report.total,
        duration = duration_text,
        test_cases = test_cases,
    )
}

fn render_case(result: &TestResult) -> String {
    let (class, marker) = match result.status {
        TestStatus::Passed => ("pass", "\u{2713}"),
        TestStatus::Failed => ("fail", "\u{2717}"),
        TestStatus::ExpectedFailure => ("xfail", "~"),
        TestStatus::UnexpectedPass => ("xpass", "!"),
    };

    let mut out = format!(
        r#"<div class="test-case {class}">
<h3>{marker} {label} {name}</h3>
<p>Steps: {steps} | Assertions: {assertions} | {ms} ms</p>
"#,
        class = class,
        marker = marker,
        label = result.status.label(),
        name = escape_html(&result.scenario_name),
        steps = result.steps_run,
        assertions = result.assertion_results.len(),
        ms = result.duration_ms,
    );

    if let Some(reason) = &result.xfail_reason {
        out.push_str(&format!(
            "<p class=\"reason\">Known defect: {}</p>\n",
            escape_html(reason)
        ));
    }

    if let Some(error) = &result.error {
        out.push_str(&format!(
            "<p class=\"error\">Error: {}</p>\n",
            escape_html(error)
        ));
    }

    let failed: Vec<_> = result
        .assertion_results
        .iter()
        .filter(|ar| !ar.passed)
        .collect();
    if !failed.is_empty() {
        out.push_str("<ul class=\"failures\">\n");
        for ar in failed {
            let msg = ar.message.as_deref().unwrap_or("check failed");
            out.push_str(&format!(
                "<li>Step {}: {}</li>\n",
                ar.step_index,
                escape_html(msg)
            ));
        }
        out.push_str("</ul>\n");
    }

    if !result.screenshots.is_empty() {
        out.push_str("<p class=\"shots\">");
        for shot in &result.screenshots {
            let path = escape_html(&shot.display().to_string());
            out.push_str(&format!("<a href=\"{0}\">{0}</a>", path));
        }
        out.push_str("</p>\n");
    }

    out.push_str("</div>\n");
    out
}

/// Escape HTML special characters.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
