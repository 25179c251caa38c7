use std::path::PathBuf;
use thiserror::Error;

/// Structural failures of a conversion batch.
///
/// Per-file converter failures are not errors at this level; they are
/// collected into the batch result so the batch can keep going.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("No input files: add at least one .mp4 file or folder")]
    EmptyBatch,

    #[error("Cannot create output folder {}: {source}", .path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Index {index} is out of range for {len} file(s)")]
    OutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, ConvertError>;
