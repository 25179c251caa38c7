//! Launching the converter.
//!
//! `ProcessRunner` is the seam between a job and the operating system. The
//! production runner wraps `shared_utils::ffmpeg_process`; tests substitute
//! scripted fakes.

use shared_utils::common_utils::format_command_string;
use shared_utils::ffmpeg_process::{FfmpegProcess, ProcessError, WaitOutcome};
use shared_utils::logging::log_external_tool;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use std::time::{Duration, Instant};

/// How a launched converter ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// `code` is `None` when the process was terminated by a signal.
    Exited { code: Option<i32>, stderr: String },
    TimedOut { after: Duration, stderr: String },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Exited { code: Some(0), .. })
    }
}

pub trait ProcessRunner {
    /// Runs `program` to completion. `Err(ProcessError::Launch)` means the
    /// program could not be started at all.
    fn run(&self, program: &Path, args: &[OsString]) -> Result<RunOutcome, ProcessError>;
}

/// Spawns the real converter, optionally bounded by a per-job timeout.
#[derive(Debug, Clone, Default)]
pub struct FfmpegRunner {
    timeout: Option<Duration>,
}

impl FfmpegRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl ProcessRunner for FfmpegRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> Result<RunOutcome, ProcessError> {
        let command_line = format_command_string(program, args);
        let started = Instant::now();

        let mut cmd = Command::new(program);
        cmd.args(args);
        let outcome = FfmpegProcess::spawn(&mut cmd)?.wait_with_timeout(self.timeout)?;

        let outcome = match outcome {
            WaitOutcome::Exited { status, stderr } => RunOutcome::Exited {
                code: status.code(),
                stderr,
            },
            WaitOutcome::TimedOut { after, stderr } => RunOutcome::TimedOut { after, stderr },
        };

        let (code, stderr) = match &outcome {
            RunOutcome::Exited { code, stderr } => (*code, stderr.as_str()),
            RunOutcome::TimedOut { stderr, .. } => (None, stderr.as_str()),
        };
        log_external_tool(&command_line, stderr, code, started.elapsed());

        Ok(outcome)
    }
}
