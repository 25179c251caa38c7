//! mov-convert - Batch MP4 to MOV re-wrapper
//!
//! Collects `.mp4` files (directly or from folders), then re-wraps each one
//! into `<output>/<stem>.mov` with ffmpeg: video stream-copied, audio as
//! 24-bit PCM. Jobs run one at a time; a failed file is recorded and the
//! batch moves on, a missing ffmpeg stops the batch.
//!
//! ```rust,ignore
//! use mov_convert::{BatchRunner, ConversionSession, FfmpegRunner, NullReporter, SearchFfmpeg};
//!
//! let mut session = ConversionSession::new();
//! session.add("clips/");
//! let locator = SearchFfmpeg;
//! let converter = FfmpegRunner::new();
//! let mut runner = BatchRunner::new(&locator, &converter);
//! let today = chrono::Local::now().date_naive();
//! let summary = session.convert(&mut runner, &mut NullReporter, today)?;
//! println!("{}", summary.headline());
//! ```

pub mod batch_runner;
pub mod config;
pub mod conversion_job;
pub mod ffmpeg_locator;
pub mod file_collection;
pub mod output_resolver;
pub mod process_runner;
pub mod progress_reporter;
pub mod session;

pub use batch_runner::{BatchRunner, RunnerState};
pub use config::ConvertConfig;
pub use conversion_job::{ConversionJob, JobFailure, JobOutcome};
pub use ffmpeg_locator::{
    default_locator, BundledFfmpeg, FfmpegLocator, FixedFfmpeg, SearchFfmpeg, SystemFfmpeg,
};
pub use file_collection::FileCollection;
pub use process_runner::{FfmpegRunner, ProcessRunner, RunOutcome};
pub use progress_reporter::{ConsoleReporter, NullReporter, ProgressReporter};
pub use session::{BatchSummary, ConversionSession};

pub use shared_utils::batch::BatchResult;
pub use shared_utils::errors::{ConvertError, Result};
