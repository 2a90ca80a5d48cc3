use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scan was cancelled")]
    Cancelled,
}

impl SweepError {
    /// Map an IO error on `path` onto the most specific variant
    pub fn from_io(err: std::io::Error, path: &std::path::Path) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => SweepError::PathNotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => {
                SweepError::PermissionDenied(path.to_path_buf())
            }
            _ => SweepError::Io(err),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, SweepError::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, SweepError>;
