//! One source file re-wrapped into one `.mov`.
//!
//! The converter arguments are a fixed contract:
//!
//! ```text
//! ffmpeg -i <input> -c:v copy -c:a pcm_s24le <output> -y
//! ```
//!
//! Video is stream-copied, audio becomes 24-bit little-endian PCM, and an
//! existing output file is overwritten.

use crate::process_runner::{ProcessRunner, RunOutcome};
use serde::Serialize;
use shared_utils::ffmpeg_process::{format_ffmpeg_error, get_error_suggestion, ProcessError};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const OUTPUT_EXTENSION: &str = "mov";
pub const VIDEO_CODEC: &str = "copy";
pub const AUDIO_CODEC: &str = "pcm_s24le";

/// Why a job did not produce its output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobFailure {
    /// ffmpeg ran and exited non-zero (or was killed by a signal).
    #[error("ffmpeg failed ({}): {detail}", exit_label(.exit_code))]
    Converter {
        exit_code: Option<i32>,
        detail: String,
        hint: Option<String>,
    },

    #[error("ffmpeg timed out after {timeout_secs}s: {detail}")]
    TimedOut { timeout_secs: u64, detail: String },

    /// ffmpeg could not be started; every later job would fail the same way.
    #[error("ffmpeg not found at {}: {reason}", .program.display())]
    ConverterNotFound { program: PathBuf, reason: String },
}

impl JobFailure {
    pub fn is_fatal(&self) -> bool {
        matches!(self, JobFailure::ConverterNotFound { .. })
    }

    pub fn hint(&self) -> Option<&str> {
        match self {
            JobFailure::Converter { hint, .. } => hint.as_deref(),
            JobFailure::TimedOut { .. } => None,
            JobFailure::ConverterNotFound { .. } => {
                Some("Install ffmpeg, put it on PATH, or pass --ffmpeg <path>")
            }
        }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Pending,
    Succeeded,
    Failed(JobFailure),
}

#[derive(Debug, Clone)]
pub struct ConversionJob {
    source: PathBuf,
    output: PathBuf,
    outcome: JobOutcome,
}

impl ConversionJob {
    pub fn new(source: impl Into<PathBuf>, output_dir: &Path) -> Self {
        let source = source.into();
        let output = output_path_for(&source, output_dir);
        Self {
            source,
            output,
            outcome: JobOutcome::Pending,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn outcome(&self) -> &JobOutcome {
        &self.outcome
    }

    pub fn args(&self) -> Vec<OsString> {
        vec![
            "-i".into(),
            self.source.clone().into_os_string(),
            "-c:v".into(),
            VIDEO_CODEC.into(),
            "-c:a".into(),
            AUDIO_CODEC.into(),
            self.output.clone().into_os_string(),
            "-y".into(),
        ]
    }

    /// Runs the converter once. A finished job keeps its outcome; calling
    /// again returns it without relaunching anything.
    pub fn execute(
        &mut self,
        program: &Path,
        runner: &dyn ProcessRunner,
    ) -> std::result::Result<(), JobFailure> {
        match &self.outcome {
            JobOutcome::Pending => {}
            JobOutcome::Succeeded => {
                debug!(source = %self.source.display(), "Job already finished");
                return Ok(());
            }
            JobOutcome::Failed(failure) => {
                debug!(source = %self.source.display(), "Job already finished");
                return Err(failure.clone());
            }
        }

        let result = self.launch(program, runner);
        self.outcome = match &result {
            Ok(()) => JobOutcome::Succeeded,
            Err(failure) => JobOutcome::Failed(failure.clone()),
        };
        result
    }

    fn launch(
        &self,
        program: &Path,
        runner: &dyn ProcessRunner,
    ) -> std::result::Result<(), JobFailure> {
        match runner.run(program, &self.args()) {
            Ok(outcome) if outcome.is_success() => Ok(()),
            Ok(RunOutcome::Exited { code, stderr }) => Err(JobFailure::Converter {
                exit_code: code,
                detail: format_ffmpeg_error(&stderr),
                hint: get_error_suggestion(&stderr),
            }),
            Ok(RunOutcome::TimedOut { after, stderr }) => Err(JobFailure::TimedOut {
                timeout_secs: after.as_secs(),
                detail: format_ffmpeg_error(&stderr),
            }),
            Err(ProcessError::Launch { source, .. }) => Err(JobFailure::ConverterNotFound {
                program: program.to_path_buf(),
                reason: source.to_string(),
            }),
            Err(e @ ProcessError::Wait { .. }) => Err(JobFailure::Converter {
                exit_code: None,
                detail: e.to_string(),
                hint: None,
            }),
        }
    }
}

/// `<output_dir>/<stem>.mov`, whatever the case of the source extension.
pub fn output_path_for(source: &Path, output_dir: &Path) -> PathBuf {
    let mut name = source
        .file_stem()
        .unwrap_or_else(|| OsStr::new("untitled"))
        .to_os_string();
    name.push(".");
    name.push(OUTPUT_EXTENSION);
    output_dir.join(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::{Cell, RefCell};
    use std::io;
    use std::time::Duration;

    /// Replays one scripted result and remembers the invocation.
    struct ScriptedRunner {
        result: RefCell<Option<Result<RunOutcome, ProcessError>>>,
        calls: Cell<usize>,
        last_args: RefCell<Vec<OsString>>,
    }

    impl ScriptedRunner {
        fn new(result: Result<RunOutcome, ProcessError>) -> Self {
            Self {
                result: RefCell::new(Some(result)),
                calls: Cell::new(0),
                last_args: RefCell::new(Vec::new()),
            }
        }
    }

    impl ProcessRunner for ScriptedRunner {
        fn run(&self, _program: &Path, args: &[OsString]) -> Result<RunOutcome, ProcessError> {
            self.calls.set(self.calls.get() + 1);
            *self.last_args.borrow_mut() = args.to_vec();
            self.result
                .borrow_mut()
                .take()
                .unwrap_or_else(|| panic!("runner called more than once"))
        }
    }

    fn exited(code: i32, stderr: &str) -> Result<RunOutcome, ProcessError> {
        Ok(RunOutcome::Exited {
            code: Some(code),
            stderr: stderr.to_string(),
        })
    }

    #[test]
    fn test_output_path_uses_stem_and_mov() {
        let out = Path::new("Converted_2024-03-07");
        assert_eq!(
            output_path_for(Path::new("/in/clip.MP4"), out),
            out.join("clip.mov")
        );
        assert_eq!(
            output_path_for(Path::new("/in/my.holiday.mp4"), out),
            out.join("my.holiday.mov")
        );
    }

    #[test]
    fn test_args_follow_fixed_contract() {
        let job = ConversionJob::new("/in/clip.mp4", Path::new("/out"));
        let args: Vec<String> = job
            .args()
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "-i",
                "/in/clip.mp4",
                "-c:v",
                "copy",
                "-c:a",
                "pcm_s24le",
                "/out/clip.mov",
                "-y"
            ]
        );
    }

    #[test]
    fn test_execute_success() {
        let runner = ScriptedRunner::new(exited(0, ""));
        let mut job = ConversionJob::new("/in/a.mp4", Path::new("/out"));
        assert_eq!(job.outcome(), &JobOutcome::Pending);

        assert!(job.execute(Path::new("ffmpeg"), &runner).is_ok());
        assert_eq!(job.outcome(), &JobOutcome::Succeeded);
        assert_eq!(*runner.last_args.borrow(), job.args());
    }

    #[test]
    fn test_execute_nonzero_exit_is_recoverable() {
        let runner = ScriptedRunner::new(exited(1, "a.mp4: moov atom not found\n"));
        let mut job = ConversionJob::new("/in/a.mp4", Path::new("/out"));

        let failure = job.execute(Path::new("ffmpeg"), &runner).unwrap_err();
        assert!(!failure.is_fatal());
        assert_eq!(
            failure,
            JobFailure::Converter {
                exit_code: Some(1),
                detail: "a.mp4: moov atom not found".to_string(),
                hint: get_error_suggestion("moov atom not found"),
            }
        );
        assert!(failure.to_string().contains("exit code 1"));
        assert_eq!(job.outcome(), &JobOutcome::Failed(failure));
    }

    #[test]
    fn test_execute_launch_failure_is_fatal() {
        let runner = ScriptedRunner::new(Err(ProcessError::Launch {
            program: "ffmpeg".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        }));
        let mut job = ConversionJob::new("/in/a.mp4", Path::new("/out"));

        let failure = job.execute(Path::new("/missing/ffmpeg"), &runner).unwrap_err();
        assert!(failure.is_fatal());
        assert!(failure.hint().is_some());
        assert!(failure.to_string().contains("/missing/ffmpeg"));
    }

    #[test]
    fn test_execute_timeout_is_recoverable() {
        let runner = ScriptedRunner::new(Ok(RunOutcome::TimedOut {
            after: Duration::from_secs(30),
            stderr: String::new(),
        }));
        let mut job = ConversionJob::new("/in/a.mp4", Path::new("/out"));

        let failure = job.execute(Path::new("ffmpeg"), &runner).unwrap_err();
        assert!(!failure.is_fatal());
        assert!(matches!(failure, JobFailure::TimedOut { timeout_secs: 30, .. }));
    }

    #[test]
    fn test_signal_termination_is_recoverable() {
        let runner = ScriptedRunner::new(Ok(RunOutcome::Exited {
            code: None,
            stderr: String::new(),
        }));
        let mut job = ConversionJob::new("/in/a.mp4", Path::new("/out"));
        let failure = job.execute(Path::new("ffmpeg"), &runner).unwrap_err();
        assert!(failure.to_string().contains("terminated by signal"));
        assert!(failure.to_string().contains("Unknown FFmpeg error"));
    }

    #[test]
    fn test_execute_runs_only_once() {
        let runner = ScriptedRunner::new(exited(0, ""));
        let mut job = ConversionJob::new("/in/a.mp4", Path::new("/out"));

        job.execute(Path::new("ffmpeg"), &runner).unwrap();
        assert!(job.execute(Path::new("ffmpeg"), &runner).is_ok());
        assert_eq!(runner.calls.get(), 1);
    }

    #[test]
    fn test_failed_job_replays_its_failure() {
        let runner = ScriptedRunner::new(exited(2, "Invalid data found when processing input"));
        let mut job = ConversionJob::new("/in/a.mp4", Path::new("/out"));

        let first = job.execute(Path::new("ffmpeg"), &runner).unwrap_err();
        let second = job.execute(Path::new("ffmpeg"), &runner).unwrap_err();
        assert_eq!(first, second);
        assert_eq!(runner.calls.get(), 1);
    }

    #[test]
    fn test_failure_serializes_with_kind_tag() {
        let failure = JobFailure::ConverterNotFound {
            program: PathBuf::from("ffmpeg"),
            reason: "not found".to_string(),
        };
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["kind"], "converter_not_found");
        assert_eq!(json["program"], "ffmpeg");
    }

    proptest! {
        #[test]
        fn prop_output_name_is_stem_plus_mov(
            stem in "[A-Za-z0-9_ -]{1,20}",
            ext in "(mp4|MP4|Mp4|mP4)",
        ) {
            prop_assume!(!stem.trim().is_empty() && !stem.starts_with(' ') && !stem.ends_with(' '));
            let source = PathBuf::from("/in").join(format!("{}.{}", stem, ext));
            let output = output_path_for(&source, Path::new("/out"));
            prop_assert_eq!(output.file_name().unwrap().to_string_lossy(), format!("{}.mov", stem));
            prop_assert_eq!(output.parent().unwrap(), Path::new("/out"));
        }
    }
}
