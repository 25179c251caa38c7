//! Sequential driver for a batch of conversion jobs.

use crate::conversion_job::{ConversionJob, JobFailure};
use crate::ffmpeg_locator::FfmpegLocator;
use crate::output_resolver;
use crate::process_runner::ProcessRunner;
use crate::progress_reporter::ProgressReporter;
use shared_utils::batch::BatchResult;
use shared_utils::errors::{ConvertError, Result};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Idle,
    Running,
    Completed,
}

/// Runs jobs one after another against a single output directory.
///
/// A recoverable job failure is recorded and the batch continues. A
/// converter that cannot be launched stops the batch: the failure is
/// recorded, `fatal` is set and no further jobs start.
pub struct BatchRunner<'a> {
    locator: &'a dyn FfmpegLocator,
    runner: &'a dyn ProcessRunner,
    yield_hook: Option<Box<dyn FnMut() + 'a>>,
    state: RunnerState,
}

impl<'a> BatchRunner<'a> {
    pub fn new(locator: &'a dyn FfmpegLocator, runner: &'a dyn ProcessRunner) -> Self {
        Self {
            locator,
            runner,
            yield_hook: None,
            state: RunnerState::Idle,
        }
    }

    /// Called between jobs, never while the converter is running.
    pub fn with_yield_hook(mut self, hook: impl FnMut() + 'a) -> Self {
        self.yield_hook = Some(Box::new(hook));
        self
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn run(
        &mut self,
        paths: &[PathBuf],
        output_dir: &Path,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<BatchResult<JobFailure>> {
        if paths.is_empty() {
            self.state = RunnerState::Idle;
            return Err(ConvertError::EmptyBatch);
        }

        self.state = RunnerState::Running;
        if let Err(e) = output_resolver::ensure(output_dir) {
            error!(output_dir = %output_dir.display(), error = %e, "Cannot prepare output folder");
            self.state = RunnerState::Idle;
            return Err(e);
        }

        let program = self.locator.locate();
        let total = paths.len();
        info!(
            files = total,
            ffmpeg = %program.display(),
            output_dir = %output_dir.display(),
            "Starting batch"
        );

        let mut result = BatchResult::new(total);
        for (i, source) in paths.iter().enumerate() {
            let mut job = ConversionJob::new(source.clone(), output_dir);

            match job.execute(&program, self.runner) {
                Ok(()) => {
                    info!(input = %source.display(), output = %job.output().display(), "Converted");
                    result.success();
                }
                Err(failure) if failure.is_fatal() => {
                    error!(input = %source.display(), error = %failure, "Converter unavailable, stopping batch");
                    result.abort(source.clone(), failure);
                    break;
                }
                Err(failure) => {
                    warn!(input = %source.display(), error = %failure, "Conversion failed");
                    result.fail(source.clone(), failure);
                }
            }

            reporter.update((i + 1) as f64 / total as f64);

            if i + 1 < total {
                if let Some(hook) = self.yield_hook.as_mut() {
                    hook();
                }
            }
        }

        info!(
            succeeded = result.succeeded,
            failed = result.failed(),
            not_attempted = result.not_attempted(),
            "Batch finished"
        );
        self.state = RunnerState::Completed;
        Ok(result)
    }
}
