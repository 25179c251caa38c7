//! Output folder naming and creation.

use chrono::NaiveDate;
use shared_utils::errors::{ConvertError, Result};
use std::io;
use std::path::Path;
use tracing::{debug, info};

pub const DEFAULT_FOLDER_PREFIX: &str = "Converted_";

/// Folder name for a batch: the trimmed user input, or `Converted_YYYY-MM-DD`.
pub fn resolve(user_input: Option<&str>, today: NaiveDate) -> String {
    match user_input.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("{}{}", DEFAULT_FOLDER_PREFIX, today.format("%Y-%m-%d")),
    }
}

/// Creates `dir` and any missing parents. Existing folders are left alone.
pub fn ensure(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        debug!(dir = %dir.display(), "Output folder already exists");
        return Ok(());
    }

    if dir.exists() {
        return Err(ConvertError::IoFailure {
            path: dir.to_path_buf(),
            source: io::Error::new(
                io::ErrorKind::AlreadyExists,
                "a file with this name already exists",
            ),
        });
    }

    std::fs::create_dir_all(dir).map_err(|source| ConvertError::IoFailure {
        path: dir.to_path_buf(),
        source,
    })?;
    info!(dir = %dir.display(), "Created output folder");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn march_7() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    #[test]
    fn test_resolve_defaults_to_date() {
        assert_eq!(resolve(None, march_7()), "Converted_2024-03-07");
        assert_eq!(resolve(Some(""), march_7()), "Converted_2024-03-07");
        assert_eq!(resolve(Some("   \t"), march_7()), "Converted_2024-03-07");
    }

    #[test]
    fn test_resolve_trims_user_input() {
        assert_eq!(resolve(Some("  MyClips "), march_7()), "MyClips");
        assert_eq!(resolve(Some("shoots/day 1"), march_7()), "shoots/day 1");
    }

    #[test]
    fn test_ensure_creates_nested_and_is_idempotent() {
        let root = TempDir::new().unwrap();
        let target = root.path().join("a/b/c");

        ensure(&target).unwrap();
        assert!(target.is_dir());
        ensure(&target).unwrap();
    }

    #[test]
    fn test_ensure_rejects_file_in_the_way() {
        let root = TempDir::new().unwrap();
        let blocker = root.path().join("out");
        std::fs::write(&blocker, b"x").unwrap();

        let err = ensure(&blocker).unwrap_err();
        assert!(matches!(err, ConvertError::IoFailure { .. }));
        assert!(blocker.is_file());
    }

    #[test]
    fn test_ensure_rejects_file_as_parent() {
        let root = TempDir::new().unwrap();
        let blocker = root.path().join("out");
        std::fs::write(&blocker, b"x").unwrap();

        let err = ensure(&blocker.join("nested")).unwrap_err();
        assert!(matches!(err, ConvertError::IoFailure { .. }));
    }
}
