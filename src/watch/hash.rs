// src/watch/hash.rs

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use blake3::Hasher;
use tracing::debug;

use crate::watch::record::WatchSet;

/// Hash the contents of a single file.
///
/// Returns `None` when the file does not exist or cannot be read, so that an
/// unreadable file compares as different from any readable one.
pub fn hash_file(path: &Path) -> Option<String> {
    let mut file = File::open(path).ok()?;
    let mut hasher = Hasher::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Some(hasher.finalize().to_hex().to_string())
}

/// In-memory content digests for every watched path.
///
/// Used to tell a real edit apart from a bare timestamp bump.
#[derive(Debug, Clone, Default)]
pub struct ContentDigests {
    digests: HashMap<PathBuf, Option<String>>,
}

impl ContentDigests {
    pub fn compute(set: &WatchSet) -> Self {
        let digests = set
            .paths()
            .iter()
            .map(|p| (p.clone(), hash_file(p)))
            .collect();
        Self { digests }
    }

    /// Re-hash `path` and store the result. Returns true if the digest moved.
    pub fn refresh(&mut self, path: &Path) -> bool {
        let current = hash_file(path);
        let previous = self.digests.insert(path.to_path_buf(), current.clone());
        let changed = previous.flatten() != current;
        debug!(path = ?path, changed, "refreshed content digest");
        changed
    }
}
