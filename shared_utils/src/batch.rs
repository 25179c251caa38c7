//! Batch Processing Module
//!
//! Directory expansion for batch intake plus the aggregate result of a
//! sequential batch run.

use crate::common_utils::has_extension;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

pub const VIDEO_INPUT_EXTENSIONS: &[&str] = &["mp4"];

/// Walks `dir` and returns every file whose extension is in `extensions`.
///
/// Entries are visited in file-name order at each level, so the result is
/// stable for a fixed filesystem state. Unreadable entries are logged and
/// skipped.
pub fn collect_files(dir: &Path, extensions: &[&str], recursive: bool) -> Vec<PathBuf> {
    let walker = if recursive {
        WalkDir::new(dir).follow_links(true)
    } else {
        WalkDir::new(dir).max_depth(1)
    };

    walker
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Skipping unreadable entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| has_extension(e.path(), extensions))
        .map(|e| e.into_path())
        .collect()
}

/// Aggregate of a sequential batch.
///
/// `total` counts attempted jobs; `planned` counts the inputs handed to the
/// batch. They differ only when the batch was aborted.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult<E = String> {
    pub planned: usize,
    pub total: usize,
    pub succeeded: usize,
    pub failures: Vec<(PathBuf, E)>,
    pub fatal: bool,
}

impl<E> BatchResult<E> {
    pub fn new(planned: usize) -> Self {
        Self {
            planned,
            total: 0,
            succeeded: 0,
            failures: Vec::new(),
            fatal: false,
        }
    }

    pub fn success(&mut self) {
        self.total += 1;
        self.succeeded += 1;
    }

    pub fn fail(&mut self, path: PathBuf, error: E) {
        self.total += 1;
        self.failures.push((path, error));
    }

    /// Records a failure that stops the batch.
    pub fn abort(&mut self, path: PathBuf, error: E) {
        self.fail(path, error);
        self.fatal = true;
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Inputs that were never attempted.
    pub fn not_attempted(&self) -> usize {
        self.planned.saturating_sub(self.total)
    }

    pub fn is_clean(&self) -> bool {
        !self.fatal && self.failures.is_empty() && self.total == self.planned
    }

    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.succeeded as f64 / self.total as f64) * 100.0
        }
    }
}

impl<E> Default for BatchResult<E> {
    fn default() -> Self {
        Self::new(0)
    }
}
