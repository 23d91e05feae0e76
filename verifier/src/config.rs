use crate::check::Check;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A named target path plus its ordered list of checks.
///
/// Declared up front and never mutated once the run starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub path: String,
    pub checks: Vec<Check>,
}

impl TestCase {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            checks: Vec::new(),
        }
    }

    pub fn with_check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    /// Absolute URL for this case under the given base.
    pub fn url(&self, base_url: &str) -> String {
        let base = base_url.trim_end_matches('/');
        let path = self.path.trim_start_matches('/');
        if path.is_empty() {
            format!("{}/", base)
        } else {
            format!("{}/{}", base, path)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifierConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub test_cases: Vec<TestCase>,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout: Duration::from_secs(10),
            test_cases: default_suite(),
        }
    }
}

impl VerifierConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_test_cases(mut self, test_cases: Vec<TestCase>) -> Self {
        self.test_cases = test_cases;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("Base URL cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("Base URL must start with http:// or https://".to_string());
        }

        if self.timeout.is_zero() {
            return Err("Timeout must be greater than 0".to_string());
        }

        if self.test_cases.is_empty() {
            return Err("Test case list cannot be empty".to_string());
        }

        // A case with no checks would pass vacuously.
        if let Some(case) = self.test_cases.iter().find(|case| case.checks.is_empty()) {
            return Err(format!("Test case \"{}\" has no checks", case.name));
        }

        Ok(())
    }
}

/// The Future Agent site's expected pages and data endpoints.
///
/// Paths and JSON keys follow the files the site is built from:
/// `extracted_questions.json` carries `total_questions` and `questions`,
/// `f8_responses_complete.json` carries `total_questions` and `results`.
pub fn default_suite() -> Vec<TestCase> {
    vec![
        TestCase::new("Home Page", "/")
            .with_check(Check::title("Future Agent"))
            .with_check(Check::content("Cannabis Industry Knowledge"))
            .with_check(Check::element("stats-grid"))
            .with_check(Check::element("comparison-card")),
        TestCase::new("Comparison Page", "/comparison.html")
            .with_check(Check::title("Comparison"))
            .with_check(Check::content("Original Thread"))
            .with_check(Check::element("comparison-container")),
        TestCase::new("Extracted Questions Data", "/data/extracted_questions.json")
            .with_check(Check::json("total_questions"))
            .with_check(Check::json("questions")),
        TestCase::new("AI Responses Data", "/data/f8_responses_complete.json")
            .with_check(Check::json("total_questions"))
            .with_check(Check::json("results")),
    ]
}
