//! Pending input files for the next batch.
//!
//! Files and folders can be dropped in any mix; folders are expanded on the
//! spot, so the collection only ever holds `.mp4` files, each at most once.

use shared_utils::batch::{collect_files, VIDEO_INPUT_EXTENSIONS};
use shared_utils::common_utils::has_extension;
use shared_utils::errors::{ConvertError, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct FileCollection {
    entries: Vec<PathBuf>,
    seen: HashSet<PathBuf>,
}

impl FileCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file or expands a folder. Returns how many entries were new.
    ///
    /// Anything that is neither an `.mp4` file nor a folder is ignored.
    pub fn add(&mut self, path: impl AsRef<Path>) -> usize {
        let path = absolutize(path.as_ref());

        if path.is_file() {
            if has_extension(&path, VIDEO_INPUT_EXTENSIONS) {
                return usize::from(self.insert(path));
            }
            debug!(path = %path.display(), "Ignoring non-mp4 file");
            return 0;
        }

        if path.is_dir() {
            let added = collect_files(&path, VIDEO_INPUT_EXTENSIONS, true)
                .into_iter()
                .map(|file| self.insert(file))
                .filter(|inserted| *inserted)
                .count();
            debug!(dir = %path.display(), added, "Expanded folder");
            return added;
        }

        debug!(path = %path.display(), "Ignoring path that is neither file nor folder");
        0
    }

    pub fn remove_at(&mut self, index: usize) -> Result<()> {
        if index >= self.entries.len() {
            return Err(ConvertError::OutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        let removed = self.entries.remove(index);
        self.seen.remove(&removed);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.seen.clear();
    }

    /// Snapshot of the current order.
    pub fn to_vec(&self) -> Vec<PathBuf> {
        self.entries.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(PathBuf::as_path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.seen.contains(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, path: PathBuf) -> bool {
        if self.seen.insert(path.clone()) {
            self.entries.push(path);
            true
        } else {
            false
        }
    }
}

/// Anchors relative input at the working directory without resolving symlinks.
fn absolutize(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
