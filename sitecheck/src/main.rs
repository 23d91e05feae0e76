use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use tracing::error;
use verifier::{run, HttpFetcher, VerifierConfig, VerifierError};

#[derive(Parser)]
#[command(name = "sitecheck")]
#[command(about = "Verify a deployed Future Agent site against its expected content")]
struct Cli {
    /// Base URL the site is served from
    #[arg(long, default_value = "http://localhost:8000")]
    base_url: String,
    /// Per-request timeout in seconds
    #[arg(long, default_value = "10")]
    timeout_secs: u64,
}

// Exit codes: 0 all cases passed, 1 any case partial or failed,
// 2 server unreachable or configuration invalid.
#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = VerifierConfig::default()
        .with_base_url(cli.base_url)
        .with_timeout(Duration::from_secs(cli.timeout_secs));

    let fetcher = match HttpFetcher::new(config.timeout) {
        Ok(fetcher) => fetcher,
        Err(err) => {
            error!("Failed to build HTTP client: {}", err);
            return ExitCode::from(2);
        }
    };

    match run(&config, &fetcher).await {
        Ok(report) => ExitCode::from(report.exit_code() as u8),
        Err(err @ VerifierError::Unreachable { .. }) => {
            error!("Verification skipped: {}", err);
            ExitCode::from(2)
        }
        Err(err) => {
            error!("Verification aborted: {}", err);
            ExitCode::from(2)
        }
    }
}
