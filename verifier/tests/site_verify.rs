//! End-to-end verification against an in-process fixture server that
//! serves the Future Agent site's pages and data endpoints.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use verifier::{default_suite, run, HttpFetcher, Verdict, VerifierConfig, VerifierError};

#[derive(Clone, Copy)]
enum Fixture {
    /// Every page and endpoint serves its expected markers.
    Complete,
    /// Home page is served without its stats-grid / comparison-card markup.
    SparseHome,
    /// The responses data endpoint answers 500.
    BrokenData,
    /// The responses data endpoint accepts the connection but never
    /// writes a response.
    StallData,
}

struct FixtureServer {
    addr: SocketAddr,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl FixtureServer {
    fn spawn(fixture: Fixture) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind fixture server");
        listener
            .set_nonblocking(true)
            .expect("set_nonblocking true");
        let addr = listener.local_addr().expect("local_addr");
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let handle = std::thread::spawn(move || {
            while !stop_flag.load(Ordering::Relaxed) {
                match listener.accept() {
                    Ok((stream, _)) => serve_connection(stream, fixture),
                    Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                        std::thread::sleep(Duration::from_millis(5));
                    }
                    Err(_) => break,
                }
            }
        });
        Self {
            addr,
            stop,
            handle: Some(handle),
        }
    }

    fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for FixtureServer {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        let _ = TcpStream::connect(self.addr);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

const HOME_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Future Agent - Cannabis Industry Knowledge</title></head>
<body>
<h1>Cannabis Industry Knowledge</h1>
<div class="stats-grid"><span>16337 questions</span></div>
<div class="comparison-card"><p>AI answer vs. forum thread</p></div>
</body>
</html>"#;

const SPARSE_HOME_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Future Agent - Cannabis Industry Knowledge</title></head>
<body><h1>Cannabis Industry Knowledge</h1></body>
</html>"#;

const COMPARISON_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Future Agent - Comparison</title></head>
<body>
<div class="comparison-container"><h2>Original Thread</h2></div>
</body>
</html>"#;

const QUESTIONS_JSON: &str =
    r#"{"extraction_timestamp": "2025-01-01T00:00:00", "total_questions": 16337, "questions": []}"#;

const RESPONSES_JSON: &str =
    r#"{"processing_timestamp": "2025-01-01T00:00:00", "total_questions": 16337, "results": []}"#;

fn serve_connection(mut stream: TcpStream, fixture: Fixture) {
    let mut buf = [0_u8; 4096];
    let read = match stream.read(&mut buf) {
        Ok(n) => n,
        Err(_) => return,
    };
    if read == 0 {
        return;
    }
    let req = String::from_utf8_lossy(&buf[..read]);
    let path = req
        .lines()
        .next()
        .unwrap_or_default()
        .split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .to_string();

    let (status, body) = match path.as_str() {
        "/" => match fixture {
            Fixture::SparseHome => (200, SPARSE_HOME_PAGE),
            _ => (200, HOME_PAGE),
        },
        "/comparison.html" => (200, COMPARISON_PAGE),
        "/data/extracted_questions.json" => (200, QUESTIONS_JSON),
        "/data/f8_responses_complete.json" => match fixture {
            Fixture::BrokenData => (500, "internal error"),
            Fixture::StallData => {
                // Hold the connection open past the client's timeout
                // without writing a byte.
                std::thread::sleep(Duration::from_secs(3));
                return;
            }
            _ => (200, RESPONSES_JSON),
        },
        _ => (404, "not found"),
    };

    let reason = match status {
        200 => "OK",
        500 => "Internal Server Error",
        _ => "Not Found",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
}

fn config_for(server: &FixtureServer) -> VerifierConfig {
    VerifierConfig::default()
        .with_base_url(server.base_url())
        .with_timeout(Duration::from_secs(5))
}

#[tokio::test]
async fn test_complete_site_passes_default_suite() {
    let server = FixtureServer::spawn(Fixture::Complete);
    let config = config_for(&server);
    let fetcher = HttpFetcher::new(config.timeout).unwrap();

    let report = run(&config, &fetcher).await.unwrap();
    assert_eq!(report.total(), default_suite().len());
    assert!(report.all_passed());
    assert_eq!(report.success_rate(), 100);
    assert_eq!(report.exit_code(), 0);
}

#[tokio::test]
async fn test_missing_markup_yields_partial_pass() {
    let server = FixtureServer::spawn(Fixture::SparseHome);
    let config = config_for(&server);
    let fetcher = HttpFetcher::new(config.timeout).unwrap();

    let report = run(&config, &fetcher).await.unwrap();
    assert_eq!(report.cases[0].verdict, Verdict::PartialPass);
    // Title and content markers are still present on the sparse page.
    assert_eq!(report.cases[0].found_count(), 2);
    // The other three cases are unaffected.
    assert_eq!(report.passed_count(), 3);
    assert_eq!(report.success_rate(), 75);
    assert_eq!(report.exit_code(), 1);
}

#[tokio::test]
async fn test_server_error_fails_only_that_case() {
    let server = FixtureServer::spawn(Fixture::BrokenData);
    let config = config_for(&server);
    let fetcher = HttpFetcher::new(config.timeout).unwrap();

    let report = run(&config, &fetcher).await.unwrap();
    let broken = report
        .cases
        .iter()
        .find(|case| case.name == "AI Responses Data")
        .unwrap();
    assert_eq!(
        broken.verdict,
        Verdict::Failed {
            reason: "HTTP 500".to_string()
        }
    );
    assert!(broken.outcomes.is_empty());
    assert_eq!(report.passed_count(), 3);
}

#[tokio::test]
async fn test_stalled_response_times_out_as_failed() {
    let server = FixtureServer::spawn(Fixture::StallData);
    let config = config_for(&server).with_timeout(Duration::from_secs(1));
    let fetcher = HttpFetcher::new(config.timeout).unwrap();

    let report = run(&config, &fetcher).await.unwrap();
    let stalled = report
        .cases
        .iter()
        .find(|case| case.name == "AI Responses Data")
        .unwrap();
    // An elapsed timeout is verdict-equivalent to a connection error.
    assert!(matches!(stalled.verdict, Verdict::Failed { .. }));
    assert!(stalled.outcomes.is_empty());
    // The timeout is localized: every other case still passes.
    assert_eq!(report.passed_count(), 3);
    assert_eq!(report.exit_code(), 1);
}

#[tokio::test]
async fn test_silent_server_times_out_like_connection_refusal() {
    // Accepts TCP connections but never answers: the preflight request
    // times out and the run is skipped, same as a refused connection.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let config = VerifierConfig::default()
        .with_base_url(format!("http://{}", addr))
        .with_timeout(Duration::from_secs(1));
    let fetcher = HttpFetcher::new(config.timeout).unwrap();

    let result = run(&config, &fetcher).await;
    assert!(matches!(result, Err(VerifierError::Unreachable { .. })));
    drop(listener);
}

#[tokio::test]
async fn test_unreachable_server_skips_run() {
    // Nothing listens on port 1.
    let config = VerifierConfig::default()
        .with_base_url("http://127.0.0.1:1")
        .with_timeout(Duration::from_secs(1));
    let fetcher = HttpFetcher::new(config.timeout).unwrap();

    let result = run(&config, &fetcher).await;
    assert!(matches!(result, Err(VerifierError::Unreachable { .. })));
}
