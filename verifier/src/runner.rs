//! Sequential run loop: preflight probe, then one fully resolved test
//! case at a time. Failures are localized to the case (or check) that
//! produced them; the run itself only aborts when the server is
//! unreachable before any case has started.

use crate::config::VerifierConfig;
use crate::fetch::{Fetcher, VerifierError, VerifierResult};
use crate::report::{CaseReport, CheckOutcome, RunReport, Verdict};
use tracing::{debug, info, warn};

/// Verify every test case in `config` against its base URL, printing a
/// human-readable report to stdout as cases resolve.
///
/// Returns `Err(Unreachable)` when the preflight probe fails; in that
/// case zero test cases are executed.
pub async fn run(config: &VerifierConfig, fetcher: &dyn Fetcher) -> VerifierResult<RunReport> {
    config
        .validate()
        .map_err(|message| VerifierError::InvalidConfig { message })?;

    println!("Verifying site at {}", config.base_url);

    let root = root_url(&config.base_url);
    if let Err(err) = fetcher.fetch(&root).await {
        warn!(url = %root, error = %err, "preflight probe failed");
        print_setup_guidance(&config.base_url);
        return Err(VerifierError::Unreachable {
            url: root,
            message: err.to_string(),
        });
    }
    println!("✓ Server reachable\n");

    let mut report = RunReport::default();

    for case in &config.test_cases {
        let url = case.url(&config.base_url);
        info!(name = %case.name, %url, "running test case");
        println!("▶ {} ({})", case.name, case.path);

        let case_report = match fetcher.fetch(&url).await {
            Err(err) => {
                warn!(name = %case.name, error = %err, "request failed");
                CaseReport::failed(&case.name, &url, err.to_string())
            }
            Ok(result) if result.status != 200 => {
                warn!(name = %case.name, status = result.status, "unexpected status");
                CaseReport::failed(&case.name, &url, format!("HTTP {}", result.status))
            }
            Ok(result) => {
                let outcomes = case
                    .checks
                    .iter()
                    .map(|check| {
                        let found = check.evaluate(&result.body);
                        debug!(name = %case.name, check = %check.describe(), found);
                        CheckOutcome {
                            check: check.clone(),
                            found,
                        }
                    })
                    .collect();
                CaseReport::from_outcomes(&case.name, &url, outcomes)
            }
        };

        print_case(&case_report);
        report.push(case_report);
    }

    print_summary(&report);
    Ok(report)
}

fn root_url(base_url: &str) -> String {
    format!("{}/", base_url.trim_end_matches('/'))
}

fn print_setup_guidance(base_url: &str) {
    println!("✗ Server not running at {}", base_url);
    println!("  Serve the site before running the harness, e.g.:");
    println!("    python3 -m http.server 8000");
    println!("  then re-run sitecheck against {}", base_url);
}

fn print_case(case: &CaseReport) {
    for outcome in &case.outcomes {
        let mark = if outcome.found { "✓" } else { "✗" };
        println!("  {} {}", mark, outcome.check.describe());
    }
    match &case.verdict {
        Verdict::Passed => println!("  → passed\n"),
        Verdict::PartialPass => println!(
            "  → partial pass ({}/{} checks)\n",
            case.found_count(),
            case.outcomes.len()
        ),
        Verdict::Failed { reason } => println!("  ✗ failed: {}\n", reason),
    }
}

fn print_summary(report: &RunReport) {
    println!(
        "Results: {}/{} test cases passed ({}%)",
        report.passed_count(),
        report.total(),
        report.success_rate()
    );
}
