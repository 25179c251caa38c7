//! Where the ffmpeg executable lives.
//!
//! Locators only produce a path; whether it can actually be launched is
//! discovered when the first job runs.

use std::path::{Path, PathBuf};
use tracing::debug;

#[cfg(windows)]
pub const FFMPEG_BINARY: &str = "ffmpeg.exe";
#[cfg(not(windows))]
pub const FFMPEG_BINARY: &str = "ffmpeg";

pub trait FfmpegLocator {
    fn locate(&self) -> PathBuf;
}

/// A path given explicitly (CLI flag or environment).
#[derive(Debug, Clone)]
pub struct FixedFfmpeg(pub PathBuf);

impl FfmpegLocator for FixedFfmpeg {
    fn locate(&self) -> PathBuf {
        self.0.clone()
    }
}

/// The bundled layout `<base>/ffmpeg/bin/ffmpeg[.exe]`.
#[derive(Debug, Clone)]
pub struct BundledFfmpeg {
    base: PathBuf,
}

impl BundledFfmpeg {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Bundle shipped next to the running executable.
    pub fn beside_executable() -> Option<Self> {
        let exe = std::env::current_exe().ok()?;
        exe.parent().map(Self::new)
    }

    /// Bundle under the working directory.
    pub fn in_working_dir() -> Option<Self> {
        std::env::current_dir().ok().map(Self::new)
    }

    pub fn is_present(&self) -> bool {
        self.locate().is_file()
    }
}

impl FfmpegLocator for BundledFfmpeg {
    fn locate(&self) -> PathBuf {
        self.base.join("ffmpeg").join("bin").join(FFMPEG_BINARY)
    }
}

/// `PATH` lookup; falls back to the bare name so the launch error surfaces.
#[derive(Debug, Clone, Default)]
pub struct SystemFfmpeg;

impl FfmpegLocator for SystemFfmpeg {
    fn locate(&self) -> PathBuf {
        which::which(FFMPEG_BINARY).unwrap_or_else(|_| PathBuf::from(FFMPEG_BINARY))
    }
}

/// Bundled copy beside the executable, then under the working directory,
/// then `PATH`.
#[derive(Debug, Clone, Default)]
pub struct SearchFfmpeg;

impl FfmpegLocator for SearchFfmpeg {
    fn locate(&self) -> PathBuf {
        let bundled = [
            BundledFfmpeg::beside_executable(),
            BundledFfmpeg::in_working_dir(),
        ];
        for candidate in bundled.into_iter().flatten() {
            if candidate.is_present() {
                let path = candidate.locate();
                debug!(path = %path.display(), "Using bundled ffmpeg");
                return path;
            }
        }
        SystemFfmpeg.locate()
    }
}

/// Explicit override when given, the search chain otherwise.
pub fn default_locator(override_path: Option<&Path>) -> Box<dyn FfmpegLocator> {
    match override_path {
        Some(path) => Box::new(FixedFfmpeg(path.to_path_buf())),
        None => Box::new(SearchFfmpeg),
    }
}
