//! A conversion session: the pending file list plus the chosen output name.
//!
//! Triggering a conversion resolves the output folder, snapshots the list,
//! runs the batch and, once the batch has gone all the way through, empties
//! the list for the next round.

use crate::batch_runner::BatchRunner;
use crate::conversion_job::JobFailure;
use crate::file_collection::FileCollection;
use crate::output_resolver;
use crate::progress_reporter::ProgressReporter;
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use shared_utils::batch::BatchResult;
use shared_utils::errors::Result;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Default)]
pub struct ConversionSession {
    files: FileCollection,
    output_name: Option<String>,
    base_dir: Option<PathBuf>,
}

impl ConversionSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Relative output names are placed under `base`; absolute names ignore it.
    pub fn with_base_dir(mut self, base: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base.into());
        self
    }

    pub fn add(&mut self, path: impl AsRef<Path>) -> usize {
        self.files.add(path)
    }

    pub fn remove_at(&mut self, index: usize) -> Result<()> {
        self.files.remove_at(index)
    }

    pub fn files(&self) -> &FileCollection {
        &self.files
    }

    pub fn set_output_name(&mut self, name: Option<String>) {
        self.output_name = name;
    }

    pub fn output_dir(&self, today: NaiveDate) -> PathBuf {
        let name = output_resolver::resolve(self.output_name.as_deref(), today);
        match &self.base_dir {
            Some(base) => base.join(name),
            None => PathBuf::from(name),
        }
    }

    pub fn convert(
        &mut self,
        runner: &mut BatchRunner<'_>,
        reporter: &mut dyn ProgressReporter,
        today: NaiveDate,
    ) -> Result<BatchSummary> {
        let output_dir = self.output_dir(today);
        let snapshot = self.files.to_vec();
        let started = Instant::now();

        let result = runner.run(&snapshot, &output_dir, reporter)?;

        // Inputs survive an aborted batch.
        if !result.fatal {
            debug!(files = snapshot.len(), "Clearing converted inputs");
            self.files.clear();
        }

        Ok(BatchSummary {
            output_dir,
            result,
            elapsed: started.elapsed(),
        })
    }
}

/// What a finished batch hands back to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub output_dir: PathBuf,
    #[serde(flatten)]
    pub result: BatchResult<JobFailure>,
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

impl BatchSummary {
    pub fn headline(&self) -> String {
        let folder = self
            .output_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.output_dir.display().to_string());
        format!(
            "Converted {} of {} file(s) into '{}'",
            self.result.succeeded, self.result.planned, folder
        )
    }

    pub fn is_clean(&self) -> bool {
        self.result.is_clean()
    }
}

fn serialize_secs<S: Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffmpeg_locator::FixedFfmpeg;
    use crate::process_runner::{ProcessRunner, RunOutcome};
    use crate::progress_reporter::NullReporter;
    use shared_utils::errors::ConvertError;
    use shared_utils::ffmpeg_process::ProcessError;
    use std::ffi::OsString;
    use std::fs;
    use tempfile::TempDir;

    struct Converter {
        launchable: bool,
    }

    impl ProcessRunner for Converter {
        fn run(
            &self,
            program: &Path,
            _args: &[OsString],
        ) -> std::result::Result<RunOutcome, ProcessError> {
            if self.launchable {
                Ok(RunOutcome::Exited {
                    code: Some(0),
                    stderr: String::new(),
                })
            } else {
                Err(ProcessError::Launch {
                    program: program.display().to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
                })
            }
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    fn session_with_clips(temp: &TempDir, names: &[&str]) -> ConversionSession {
        let inputs = temp.path().join("inputs");
        fs::create_dir_all(&inputs).unwrap();
        for name in names {
            fs::write(inputs.join(name), b"").unwrap();
        }
        let mut session = ConversionSession::new().with_base_dir(temp.path());
        session.add(&inputs);
        session
    }

    #[test]
    fn test_default_output_dir_is_dated() {
        let temp = TempDir::new().unwrap();
        let session = ConversionSession::new().with_base_dir(temp.path());
        assert_eq!(
            session.output_dir(day()),
            temp.path().join("Converted_2024-03-07")
        );
    }

    #[test]
    fn test_completed_batch_clears_files() {
        let temp = TempDir::new().unwrap();
        let mut session = session_with_clips(&temp, &["a.mp4", "b.mp4"]);
        session.set_output_name(Some("  MyClips ".to_string()));
        assert_eq!(session.files().len(), 2);

        let locator = FixedFfmpeg(PathBuf::from("ffmpeg"));
        let converter = Converter { launchable: true };
        let mut runner = BatchRunner::new(&locator, &converter);
        let summary = session.convert(&mut runner, &mut NullReporter, day()).unwrap();

        assert!(summary.is_clean());
        assert_eq!(summary.output_dir, temp.path().join("MyClips"));
        assert!(summary.output_dir.is_dir());
        assert_eq!(summary.headline(), "Converted 2 of 2 file(s) into 'MyClips'");
        assert!(session.files().is_empty());
    }

    #[test]
    fn test_fatal_batch_keeps_files() {
        let temp = TempDir::new().unwrap();
        let mut session = session_with_clips(&temp, &["a.mp4", "b.mp4"]);

        let locator = FixedFfmpeg(PathBuf::from("/missing/ffmpeg"));
        let converter = Converter { launchable: false };
        let mut runner = BatchRunner::new(&locator, &converter);
        let summary = session.convert(&mut runner, &mut NullReporter, day()).unwrap();

        assert!(summary.result.fatal);
        assert!(!summary.is_clean());
        assert_eq!(session.files().len(), 2);
    }

    #[test]
    fn test_empty_session_is_rejected() {
        let temp = TempDir::new().unwrap();
        let mut session = ConversionSession::new().with_base_dir(temp.path());

        let locator = FixedFfmpeg(PathBuf::from("ffmpeg"));
        let converter = Converter { launchable: true };
        let mut runner = BatchRunner::new(&locator, &converter);
        let err = session
            .convert(&mut runner, &mut NullReporter, day())
            .unwrap_err();

        assert!(matches!(err, ConvertError::EmptyBatch));
        assert!(!temp.path().join("Converted_2024-03-07").exists());
    }

    #[test]
    fn test_summary_json_shape() {
        let mut result = BatchResult::new(2);
        result.success();
        result.fail(
            PathBuf::from("/in/b.mp4"),
            JobFailure::Converter {
                exit_code: Some(1),
                detail: "Invalid data".to_string(),
                hint: None,
            },
        );
        let summary = BatchSummary {
            output_dir: PathBuf::from("out"),
            result,
            elapsed: Duration::from_millis(1500),
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["output_dir"], "out");
        assert_eq!(json["succeeded"], 1);
        assert_eq!(json["planned"], 2);
        assert_eq!(json["fatal"], false);
        assert_eq!(json["elapsed_secs"], 1.5);
        assert_eq!(json["failures"][0][0], "/in/b.mp4");
        assert_eq!(json["failures"][0][1]["kind"], "converter");
    }
}
