//! Shared Utilities for the mov-convert tools
//!
//! Common building blocks kept out of the tool crate:
//! - Batch input discovery and the aggregate `BatchResult`
//! - The ffmpeg child-process wrapper (stderr drain, timeout, error hints)
//! - Logging setup (stderr + daily rolling file) and external tool records
//! - Progress bar styling and the end-of-batch report
//! - The structural error type shared by every batch operation

pub mod batch;
pub mod common_utils;
pub mod errors;
pub mod ffmpeg_process;
pub mod logging;
pub mod progress;
pub mod report;

pub use batch::{collect_files, BatchResult, VIDEO_INPUT_EXTENSIONS};
pub use common_utils::{format_command_string, get_extension_lowercase, has_extension};
pub use errors::{ConvertError, Result};
pub use ffmpeg_process::{format_ffmpeg_error, get_error_suggestion, FfmpegProcess, ProcessError, WaitOutcome};
pub use logging::{init_logging, log_external_tool, LogConfig};
pub use progress::{create_percent_bar, format_duration, fraction_to_percent};
pub use report::{print_simple_summary, print_summary_report, render_summary_report};
