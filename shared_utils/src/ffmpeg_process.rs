//! FFmpeg process management
//!
//! ffmpeg writes its whole log to stderr. If stderr is piped but never read,
//! the pipe buffer (usually 64KB) fills up and ffmpeg blocks forever. The
//! wrapper here drains stderr on a dedicated thread while the caller waits.
//!
//! ```ignore
//! use shared_utils::ffmpeg_process::{FfmpegProcess, WaitOutcome};
//! use std::process::Command;
//!
//! let mut cmd = Command::new("ffmpeg");
//! cmd.args(["-i", "in.mp4", "-c:v", "copy", "out.mov", "-y"]);
//! let process = FfmpegProcess::spawn(&mut cmd)?;
//! match process.wait_with_timeout(None)? {
//!     WaitOutcome::Exited { status, stderr } => { /* ... */ }
//!     WaitOutcome::TimedOut { .. } => { /* ... */ }
//! }
//! ```

use std::io::{self, BufRead, BufReader};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, info};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Error)]
pub enum ProcessError {
    /// The executable could not be started at all (missing, not executable).
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("lost track of {program} while waiting: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// How a waited-on process ended.
#[derive(Debug)]
pub enum WaitOutcome {
    Exited { status: ExitStatus, stderr: String },
    /// The deadline passed; the child was killed and reaped.
    TimedOut { after: Duration, stderr: String },
}

pub struct FfmpegProcess {
    program: String,
    child: Child,
    stderr_thread: Option<JoinHandle<String>>,
}

impl FfmpegProcess {
    /// Starts the command with stderr captured, stdin and stdout detached.
    pub fn spawn(cmd: &mut Command) -> Result<Self, ProcessError> {
        let program = cmd.get_program().to_string_lossy().into_owned();
        info!(command = ?cmd, "Executing FFmpeg command");

        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|source| ProcessError::Launch {
            program: program.clone(),
            source,
        })?;

        let stderr_thread = child.stderr.take().map(|stderr| {
            thread::spawn(move || {
                let mut buf = String::new();
                for line in BufReader::new(stderr).lines().map_while(Result::ok) {
                    buf.push_str(&line);
                    buf.push('\n');
                }
                buf
            })
        });

        Ok(Self {
            program,
            child,
            stderr_thread,
        })
    }

    /// Blocks until the child exits, or until `timeout` elapses when given.
    pub fn wait_with_timeout(
        mut self,
        timeout: Option<Duration>,
    ) -> Result<WaitOutcome, ProcessError> {
        let outcome = match timeout {
            None => {
                let status = self.child.wait().map_err(|source| self.wait_error(source))?;
                WaitOutcome::Exited {
                    status,
                    stderr: self.collect_stderr(),
                }
            }
            Some(limit) => self.poll_until(limit)?,
        };

        match &outcome {
            WaitOutcome::Exited { status, stderr } if status.success() => {
                info!(exit_code = status.code(), "FFmpeg process completed successfully");
                debug!(stderr_output = %stderr, "FFmpeg stderr output");
            }
            WaitOutcome::Exited { status, stderr } => {
                error!(
                    exit_code = status.code(),
                    stderr_output = %stderr,
                    "FFmpeg process failed"
                );
            }
            WaitOutcome::TimedOut { after, .. } => {
                error!(
                    timeout_secs = after.as_secs_f64(),
                    "FFmpeg process killed after timeout"
                );
            }
        }

        Ok(outcome)
    }

    fn poll_until(&mut self, limit: Duration) -> Result<WaitOutcome, ProcessError> {
        let started = Instant::now();
        loop {
            if let Some(status) = self.child.try_wait().map_err(|source| self.wait_error(source))? {
                return Ok(WaitOutcome::Exited {
                    status,
                    stderr: self.collect_stderr(),
                });
            }
            if started.elapsed() >= limit {
                // kill fails only when the child already exited; reaping below covers both cases
                let _ = self.child.kill();
                self.child.wait().map_err(|source| self.wait_error(source))?;
                return Ok(WaitOutcome::TimedOut {
                    after: limit,
                    stderr: self.collect_stderr(),
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn collect_stderr(&mut self) -> String {
        self.stderr_thread
            .take()
            .map(|t| t.join().unwrap_or_default())
            .unwrap_or_default()
    }

    fn wait_error(&self, source: io::Error) -> ProcessError {
        ProcessError::Wait {
            program: self.program.clone(),
            source,
        }
    }
}

// ═══════════════════════════════════════════════════════════════
// Error extraction
// ═══════════════════════════════════════════════════════════════

/// Picks the most meaningful line out of ffmpeg's stderr.
///
/// 1. the last line mentioning "Error"/"error"
/// 2. otherwise the last non-empty line that is not a progress line
/// 3. otherwise "Unknown FFmpeg error"
pub fn format_ffmpeg_error(stderr: &str) -> String {
    if let Some(error_line) = stderr
        .lines()
        .rev()
        .find(|line| line.contains("Error") || line.contains("error"))
    {
        return error_line.trim().to_string();
    }

    stderr
        .lines()
        .rev()
        .find(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty()
                && !trimmed.starts_with("frame=")
                && !trimmed.starts_with("fps=")
                && !trimmed.starts_with("size=")
        })
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "Unknown FFmpeg error".to_string())
}

/// Maps well-known ffmpeg failure messages to an actionable hint.
pub fn get_error_suggestion(stderr: &str) -> Option<String> {
    let patterns = [
        ("No such file or directory", "Check that the input file still exists"),
        ("moov atom not found", "The MP4 is incomplete or still being written"),
        ("Invalid data found", "The input file looks corrupted"),
        ("Permission denied", "Check read access to the input and write access to the output folder"),
        ("codec not currently supported in container", "The video codec cannot be stored in MOV without re-encoding"),
        ("Could not find tag for codec", "The video codec cannot be stored in MOV without re-encoding"),
        ("No space left on device", "Free up disk space in the output folder"),
    ];

    patterns
        .iter()
        .find(|(pattern, _)| stderr.contains(pattern))
        .map(|(_, suggestion)| suggestion.to_string())
}
