use std::time::Instant;

use tracing::info;

use crate::cli::config::{ReportFormat, Settings};
use crate::error::Result;
use crate::report::console::format_console_report;
use crate::report::html::generate_html_report;
use crate::report::junit::generate_junit_xml;
use crate::report::report_model::TestSuiteReport;
use crate::scenario::catalog::CATALOG;
use crate::scenario::runner::{ScenarioRunner, WebDriverFactory, select};
use crate::scenario::scenario_model::Scenario;

pub const SUITE_NAME: &str = "ecommerce-playground";

// ============================================================================
// run subcommand
// ============================================================================

/// Run the selected scenarios and return whether none failed unexpectedly.
pub fn cmd_run(settings: &Settings) -> Result<bool> {
    let selected = select(CATALOG, &settings.scenarios)?;
    info!(
        count = selected.len(),
        base_url = %settings.session.base_url,
        browser = %settings.browser.browser,
        "running scenarios"
    );

    let mut runner = ScenarioRunner::new(
        WebDriverFactory::new(settings.browser.clone()),
        settings.session.clone(),
        settings.data.clone(),
    );

    let start = Instant::now();
    let results = runner.run_all(selected);
    let duration = start.elapsed().as_millis();

    let report = TestSuiteReport::from_results(SUITE_NAME, results).with_duration(duration);
    let all_passed = report.all_passed();

    let output_content = render_report(&report, settings.format);
    match &settings.output {
        Some(path) => {
            std::fs::write(path, &output_content)?;
            info!(path = %path.display(), "report written");
        }
        None => print!("{}", output_content),
    }

    Ok(all_passed)
}

pub fn render_report(report: &TestSuiteReport, format: ReportFormat) -> String {
    match format {
        ReportFormat::Console => format_console_report(report),
        ReportFormat::Html => generate_html_report(report),
        ReportFormat::Junit => generate_junit_xml(report),
    }
}

// ============================================================================
// list subcommand
// ============================================================================

/// One line per scenario: name, expectation, description.
pub fn cmd_list(catalog: &[Scenario]) -> String {
    let width = catalog.iter().map(|s| s.name.len()).max().unwrap_or(0);
    catalog
        .iter()
        .map(|s| {
            format!(
                "{:<width$}  {:<5}  {}\n",
                s.name,
                s.expectation.label(),
                s.description,
                width = width
            )
        })
        .collect()
}
