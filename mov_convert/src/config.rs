//! Effective settings for one `mov-convert` invocation.
//!
//! Environment variables supply defaults; command-line flags override them.

use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

pub const FFMPEG_ENV: &str = "MOV_CONVERT_FFMPEG";
pub const TIMEOUT_ENV: &str = "MOV_CONVERT_TIMEOUT_SECS";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertConfig {
    pub output_name: Option<String>,
    pub ffmpeg_path: Option<PathBuf>,
    /// `None` waits for the converter indefinitely.
    pub job_timeout: Option<Duration>,
    pub json: bool,
    pub verbose: bool,
}

impl ConvertConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let ffmpeg_path = lookup(FFMPEG_ENV)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let job_timeout = lookup(TIMEOUT_ENV).and_then(|raw| match parse_timeout(&raw) {
            Some(timeout) => timeout,
            None => {
                warn!(variable = TIMEOUT_ENV, value = %raw, "Ignoring invalid timeout");
                None
            }
        });

        Self {
            ffmpeg_path,
            job_timeout,
            ..Self::default()
        }
    }

    pub fn with_output_name(mut self, name: Option<String>) -> Self {
        if name.is_some() {
            self.output_name = name;
        }
        self
    }

    pub fn with_ffmpeg_path(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.ffmpeg_path = path;
        }
        self
    }

    /// `Some(0)` turns an environment timeout off.
    pub fn with_timeout_secs(mut self, secs: Option<u64>) -> Self {
        if let Some(secs) = secs {
            self.job_timeout = seconds(secs);
        }
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Outer `None` means unparsable; inner `None` means no timeout.
fn parse_timeout(raw: &str) -> Option<Option<Duration>> {
    raw.trim().parse::<u64>().ok().map(seconds)
}

fn seconds(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
