use crate::check::Check;
use serde::{Deserialize, Serialize};

/// Per-test-case outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Status 200 and every check found.
    Passed,
    /// Status 200 but at least one check missing.
    PartialPass,
    /// Non-200 status, network error, or timeout.
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub check: Check,
    pub found: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseReport {
    pub name: String,
    pub url: String,
    pub verdict: Verdict,
    pub outcomes: Vec<CheckOutcome>,
}

impl CaseReport {
    /// Build a report for a 200 response from its evaluated checks.
    pub fn from_outcomes(
        name: impl Into<String>,
        url: impl Into<String>,
        outcomes: Vec<CheckOutcome>,
    ) -> Self {
        let verdict = if outcomes.iter().all(|outcome| outcome.found) {
            Verdict::Passed
        } else {
            Verdict::PartialPass
        };
        Self {
            name: name.into(),
            url: url.into(),
            verdict,
            outcomes,
        }
    }

    /// Build a report for a case that never reached check evaluation.
    pub fn failed(
        name: impl Into<String>,
        url: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            verdict: Verdict::Failed {
                reason: reason.into(),
            },
            outcomes: Vec::new(),
        }
    }

    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Passed
    }

    pub fn found_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.found).count()
    }
}

/// Aggregate result of one verification run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub cases: Vec<CaseReport>,
}

impl RunReport {
    pub fn push(&mut self, case: CaseReport) {
        self.cases.push(case);
    }

    pub fn total(&self) -> usize {
        self.cases.len()
    }

    pub fn passed_count(&self) -> usize {
        self.cases.iter().filter(|case| case.passed()).count()
    }

    pub fn all_passed(&self) -> bool {
        self.passed_count() == self.total()
    }

    /// Percentage of fully passed cases, rounded to the nearest integer.
    pub fn success_rate(&self) -> u32 {
        if self.cases.is_empty() {
            return 0;
        }
        let rate = 100.0 * self.passed_count() as f64 / self.total() as f64;
        rate.round() as u32
    }

    /// Process exit code: 0 when every case passed, 1 otherwise.
    /// Unreachable-server and configuration errors map to 2 in the CLI.
    pub fn exit_code(&self) -> i32 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }
}
