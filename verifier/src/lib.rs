pub mod check;
pub mod config;
pub mod fetch;
pub mod report;
pub mod runner;

pub use check::Check;
pub use config::{default_suite, TestCase, VerifierConfig};
pub use fetch::{FetchResult, Fetcher, HttpFetcher, VerifierError, VerifierResult};
pub use report::{CaseReport, CheckOutcome, RunReport, Verdict};
pub use runner::run;

pub mod prelude {
    pub use crate::check::*;
    pub use crate::config::*;
    pub use crate::fetch::*;
    pub use crate::report::*;
    pub use crate::runner::*;
}
