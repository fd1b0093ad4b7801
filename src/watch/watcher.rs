// src/watch/watcher.rs

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use crate::exec::{BuildOutcome, BuildRunner};
use crate::watch::hash::ContentDigests;
use crate::watch::record::{FileStamp, ModificationRecord, WatchSet};

/// Knobs for the polling loop.
#[derive(Debug, Clone)]
pub struct WatcherOptions {
    /// Sleep between two scans.
    pub poll_interval: Duration,
    /// Skip rebuilds when only timestamps moved.
    pub use_hash: bool,
}

impl Default for WatcherOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            use_hash: false,
        }
    }
}

/// What a tick that issued a build observed and produced.
#[derive(Debug, Clone)]
pub struct TickReport {
    /// The first path in watch order whose stamp moved.
    pub path: PathBuf,
    pub previous: FileStamp,
    pub current: FileStamp,
    pub outcome: BuildOutcome,
}

/// Timestamp-polling watcher.
///
/// Lifecycle: [`Watcher::new`] stats every path (Init), [`Watcher::prime`]
/// issues the first build, and [`Watcher::tick`] is one polling step.
/// [`Watcher::run`] strings these together and never returns.
///
/// Builds are awaited inline, so at most one is in flight and a slow build
/// delays the next poll.
pub struct Watcher<R: BuildRunner> {
    watch_set: WatchSet,
    record: ModificationRecord,
    runner: R,
    options: WatcherOptions,
    digests: Option<ContentDigests>,
}

impl<R: BuildRunner> Watcher<R> {
    pub fn new(watch_set: WatchSet, runner: R, options: WatcherOptions) -> Self {
        let record = ModificationRecord::read_all(&watch_set);
        let digests = options
            .use_hash
            .then(|| ContentDigests::compute(&watch_set));

        let listing = watch_set
            .paths()
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        info!("watching files: {listing}");

        for path in watch_set.paths() {
            if record.get(path) == Some(FileStamp::Absent) {
                debug!(path = ?path, "watched path does not exist yet");
            }
        }

        Self {
            watch_set,
            record,
            runner,
            options,
            digests,
        }
    }

    pub fn record(&self) -> &ModificationRecord {
        &self.record
    }

    pub fn watch_set(&self) -> &WatchSet {
        &self.watch_set
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Issue the initial build. Its outcome is reported, never propagated.
    pub async fn prime(&mut self) -> BuildOutcome {
        info!("generating initial artifact");
        self.build().await
    }

    /// Check the watched paths in order, without sleeping.
    ///
    /// The first path whose stamp differs from the record is updated and one
    /// build is issued; later paths are not checked this tick, so their
    /// changes are picked up by the next one. With the hash guard on, a path
    /// whose content is unchanged only has its stamp updated and scanning
    /// continues. Returns `None` when no build was issued.
    pub async fn tick(&mut self) -> Option<TickReport> {
        let mut detected = None;

        for path in self.watch_set.paths() {
            let current = FileStamp::read(path);
            let previous = self.record.get(path).unwrap_or(FileStamp::Absent);
            if current == previous {
                continue;
            }

            self.record.update(path, current);

            if let Some(digests) = self.digests.as_mut() {
                if !digests.refresh(path) {
                    debug!(path = ?path, "timestamp changed but content is identical; skipping rebuild");
                    continue;
                }
            }

            detected = Some((path.clone(), previous, current));
            break;
        }

        let (path, previous, current) = detected?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        match (previous, current) {
            (FileStamp::Absent, FileStamp::Present(_)) => info!("detected new file: {name}"),
            (FileStamp::Present(_), FileStamp::Absent) => info!("detected removal of: {name}"),
            _ => info!("detected change in: {name}"),
        }

        let outcome = self.build().await;
        Some(TickReport {
            path,
            previous,
            current,
            outcome,
        })
    }

    /// Prime, then poll forever.
    pub async fn run(mut self) {
        self.prime().await;

        loop {
            tokio::time::sleep(self.options.poll_interval).await;
            self.tick().await;
        }
    }

    async fn build(&mut self) -> BuildOutcome {
        let outcome = self.runner.run_build().await;
        outcome.report();
        outcome
    }
}
