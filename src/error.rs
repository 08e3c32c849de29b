use std::path::PathBuf;

/// Errors that can occur when using the daily logger.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("Failed to create directory '{0}': {1}")]
    CreateDirectoryFailed(PathBuf, String),
    #[error("Failed to create file '{0}': {1}")]
    CreateFileFailed(PathBuf, String),
    #[error("Failed to rename file from '{from}' to '{to}': {error}")]
    RenameFileError { from: PathBuf, to: PathBuf, error: String },
    #[error("Failed to remove file '{path}': {error}")]
    RemoveFileError { path: PathBuf, error: String },
    #[error("Failed to write archive '{path}': {error}")]
    ArchiveFailed { path: PathBuf, error: String },
    #[error("Failed to set file permissions for '{path}': {error}")]
    SetFilePermissionsError { path: PathBuf, error: String },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("File IO error: {0}")]
    FileIOError(#[from] std::io::Error),
    #[error("Internal error: {0}")]
    InternalError(String),
}
