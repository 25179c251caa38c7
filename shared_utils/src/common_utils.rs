//! Common Utilities Module
//!
//! Small helpers shared by the conversion tools:
//! - extension checks for input filtering
//! - command-line rendering for logs and error reports
//! - string shortening for one-line summaries

use std::ffi::OsStr;
use std::path::Path;

// ═══════════════════════════════════════════════════════════════
// File extensions
// ═══════════════════════════════════════════════════════════════

/// Returns the file extension in lowercase, or an empty string when absent.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use shared_utils::common_utils::get_extension_lowercase;
///
/// assert_eq!(get_extension_lowercase(Path::new("clip.MP4")), "mp4");
/// assert_eq!(get_extension_lowercase(Path::new("noext")), "");
/// ```
pub fn get_extension_lowercase(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Case-insensitive extension match against a list (entries without the dot).
///
/// # Examples
/// ```
/// use std::path::Path;
/// use shared_utils::common_utils::has_extension;
///
/// assert!(has_extension(Path::new("holiday.Mp4"), &["mp4"]));
/// assert!(!has_extension(Path::new("holiday.mov"), &["mp4"]));
/// ```
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    let ext = get_extension_lowercase(path);
    !ext.is_empty() && extensions.contains(&ext.as_str())
}

// ═══════════════════════════════════════════════════════════════
// Command rendering
// ═══════════════════════════════════════════════════════════════

/// Renders a program and its arguments as a single line for logging.
///
/// Arguments containing whitespace are quoted so the line can be pasted back
/// into a shell when reproducing a failure.
///
/// # Examples
/// ```
/// use shared_utils::common_utils::format_command_string;
///
/// let line = format_command_string("ffmpeg", ["-i", "my clip.mp4", "-y"]);
/// assert_eq!(line, "ffmpeg -i \"my clip.mp4\" -y");
/// ```
pub fn format_command_string<P, I, S>(program: P, args: I) -> String
where
    P: AsRef<OsStr>,
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut line = program.as_ref().to_string_lossy().into_owned();
    for arg in args {
        let arg = arg.as_ref().to_string_lossy();
        line.push(' ');
        if arg.chars().any(char::is_whitespace) {
            line.push('"');
            line.push_str(&arg);
            line.push('"');
        } else {
            line.push_str(&arg);
        }
    }
    line
}

/// Shortens `s` to at most `max_len` characters, appending `...` when cut.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_extension_lowercase() {
        assert_eq!(get_extension_lowercase(Path::new("a/b/clip.MP4")), "mp4");
        assert_eq!(get_extension_lowercase(Path::new("clip.mov")), "mov");
        assert_eq!(get_extension_lowercase(Path::new("README")), "");
        assert_eq!(get_extension_lowercase(Path::new(".mp4")), "");
    }

    #[test]
    fn test_has_extension() {
        let exts = &["mp4"];
        assert!(has_extension(Path::new("x.mp4"), exts));
        assert!(has_extension(Path::new("x.MP4"), exts));
        assert!(has_extension(Path::new("x.mP4"), exts));
        assert!(!has_extension(Path::new("x.mp4.part"), exts));
        assert!(!has_extension(Path::new("mp4"), exts));
    }

    #[test]
    fn test_format_command_string() {
        assert_eq!(format_command_string("ffmpeg", Vec::<&str>::new()), "ffmpeg");
        assert_eq!(
            format_command_string("ffmpeg", ["-i", "a.mp4", "b.mov"]),
            "ffmpeg -i a.mp4 b.mov"
        );
        assert_eq!(
            format_command_string("/opt/ff mpeg", ["x y"]),
            "/opt/ff mpeg \"x y\""
        );
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("exactly10!", 10), "exactly10!");
        assert_eq!(truncate_string("this is too long", 10), "this is...");
    }
}
