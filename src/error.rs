//! Error types for txt2epub operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading a manuscript or writing an EPUB.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("{} is not valid Unicode text", .path.display())]
    Encoding { path: PathBuf },

    #[error("work directory {} already contains files", .0.display())]
    WorkDirNotEmpty(PathBuf),

    #[error("could not move finished archive into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}

pub type Result<T> = std::result::Result<T, Error>;
