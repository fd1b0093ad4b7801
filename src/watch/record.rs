// src/watch/record.rs

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::errors::WatchError;

/// Last observed state of a watched path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStamp {
    /// The path did not exist (or its metadata could not be read).
    Absent,
    /// The path existed with this modification time.
    Present(SystemTime),
}

impl FileStamp {
    /// Stat `path`. Never fails: anything other than a readable mtime is
    /// recorded as [`FileStamp::Absent`].
    pub fn read(path: &Path) -> Self {
        match fs::metadata(path).and_then(|m| m.modified()) {
            Ok(mtime) => FileStamp::Present(mtime),
            Err(_) => FileStamp::Absent,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, FileStamp::Present(_))
    }
}

/// Ordered, non-empty list of paths to poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSet {
    paths: Vec<PathBuf>,
}

impl WatchSet {
    pub fn new<I, P>(paths: I) -> Result<Self, WatchError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let paths: Vec<PathBuf> = paths.into_iter().map(Into::into).collect();
        if paths.is_empty() {
            return Err(WatchError::EmptyWatchSet);
        }
        Ok(Self { paths })
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Per-path table of last observed [`FileStamp`]s. Lives only in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModificationRecord {
    stamps: HashMap<PathBuf, FileStamp>,
}

impl ModificationRecord {
    /// Stat every path in `set` and record what was found.
    pub fn read_all(set: &WatchSet) -> Self {
        let stamps = set
            .paths()
            .iter()
            .map(|p| (p.clone(), FileStamp::read(p)))
            .collect();
        Self { stamps }
    }

    pub fn get(&self, path: &Path) -> Option<FileStamp> {
        self.stamps.get(path).copied()
    }

    /// Store `stamp` for `path`, returning the previous value.
    pub fn update(&mut self, path: &Path, stamp: FileStamp) -> Option<FileStamp> {
        self.stamps.insert(path.to_path_buf(), stamp)
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }
}
