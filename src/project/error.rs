//! Project error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by project operations.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// An ingestion path that is neither an existing file nor directory.
    #[error("path `{0}` is neither a file nor a directory")]
    InvalidPath(PathBuf),

    #[error("IO error on `{0}`")]
    Io(PathBuf, #[source] std::io::Error),
}
