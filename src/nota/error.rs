use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotaError {
    #[error("Failed to read note from {}: {source}", file_name(.path))]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to save note to {}: {source}", file_name(.path))]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to delete {}: {source}", file_name(.path))]
    DeleteFailed {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Cannot access directory: {}", .0.display())]
    DirectoryNotAccessible(PathBuf),

    #[error("Too many files with the same name. Please rename some notes.")]
    TooManyDuplicates,

    #[error("The note content is invalid")]
    InvalidContent,

    #[error("Failed to encode note content into the rich text format")]
    EncodingFailed,

    #[error("{0}")]
    OperationFailed(String),
}

impl NotaError {
    /// Wrap a directory-level I/O failure with a user-actionable message.
    ///
    /// Permission errors are reworded specifically: when the notes root was
    /// handed over through a permission-granting flow, a bare EACCES tells
    /// the user nothing about how to recover.
    pub fn folder_op(what: &str, err: &io::Error) -> Self {
        if err.kind() == io::ErrorKind::PermissionDenied {
            NotaError::OperationFailed(
                "Permission denied. Re-select your notes folder to grant access again."
                    .to_string(),
            )
        } else {
            NotaError::OperationFailed(format!("{what}: {err}"))
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub type Result<T> = std::result::Result<T, NotaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denied_is_reworded() {
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "eacces");
        let wrapped = NotaError::folder_op("Failed to create folder 'x'", &err);
        assert!(wrapped.to_string().contains("Re-select your notes folder"));
    }

    #[test]
    fn other_io_errors_keep_context() {
        let err = io::Error::new(io::ErrorKind::AlreadyExists, "exists");
        let wrapped = NotaError::folder_op("Failed to create folder 'x'", &err);
        assert!(wrapped.to_string().starts_with("Failed to create folder 'x'"));
    }

    #[test]
    fn read_failed_names_the_file() {
        let err = NotaError::ReadFailed {
            path: PathBuf::from("/notes/Groceries.rtf"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        let msg = err.to_string();
        assert!(msg.contains("Groceries.rtf"));
        assert!(!msg.contains("/notes/"));
    }
}
