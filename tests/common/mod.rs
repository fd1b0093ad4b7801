#![allow(dead_code)]

use std::collections::VecDeque;
use std::fs;
use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use std::pin::Pin;
use std::sync::Once;
use std::time::{Duration, SystemTime};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing_subscriber::{fmt, EnvFilter};
use watchserve::exec::{BuildOutcome, BuildRunner};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// Uses `with_test_writer()`, so logs only show up for failing tests unless
/// run with `-- --nocapture`. Enable levels with e.g. `RUST_LOG=debug`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Build runner that counts calls and replays scripted outcomes.
///
/// Once the script is exhausted every call succeeds.
#[derive(Debug, Default)]
pub struct FakeRunner {
    pub calls: usize,
    script: VecDeque<BuildOutcome>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcomes(outcomes: impl IntoIterator<Item = BuildOutcome>) -> Self {
        Self {
            calls: 0,
            script: outcomes.into_iter().collect(),
        }
    }
}

impl BuildRunner for FakeRunner {
    fn run_build(&mut self) -> Pin<Box<dyn Future<Output = BuildOutcome> + Send + '_>> {
        self.calls += 1;
        let outcome = self.script.pop_front().unwrap_or_else(success);
        Box::pin(async move { outcome })
    }
}

pub fn success() -> BuildOutcome {
    BuildOutcome::Succeeded {
        stdout: String::new(),
        stderr: String::new(),
        elapsed: Duration::from_millis(1),
    }
}

/// A fixed, distinct modification time. Avoids depending on filesystem
/// timestamp granularity.
pub fn stamp(n: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000 + n)
}

/// Write `contents` to `path` and pin its mtime to `stamp(n)`.
pub fn write_at(path: &Path, contents: &str, n: u64) {
    fs::write(path, contents).unwrap();
    set_mtime(path, n);
}

pub fn set_mtime(path: &Path, n: u64) {
    let file = fs::File::options().write(true).open(path).unwrap();
    file.set_modified(stamp(n)).unwrap();
}

/// Minimal HTTP/1.1 GET. Returns the status code, the lowercased head and
/// the body.
pub async fn http_get(addr: SocketAddr, path: &str) -> (u16, String, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    let text = String::from_utf8_lossy(&raw).into_owned();

    let (head, body) = text.split_once("\r\n\r\n").unwrap_or((text.as_str(), ""));
    let status = head
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);

    (status, head.to_lowercase(), body.to_string())
}
