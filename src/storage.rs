use {
    crate::{LoggerConfig, LoggerError},
    std::{
        fs::{self, File},
        path::Path,
    },
};

#[cfg(unix)]
use {std::fs::Permissions, std::os::unix::fs::PermissionsExt};

/// Make sure the log directory exists.
///
/// Safe to call before every operation. A failure is reported on stderr and
/// not returned: whatever touches the directory next fails with its own
/// error.
pub(crate) fn ensure_log_directory(config: &LoggerConfig) -> bool {
    match fs::create_dir_all(config.directory()) {
        Ok(()) => true,
        Err(err) => {
            eprintln!(
                "{}",
                LoggerError::CreateDirectoryFailed(config.directory().to_path_buf(), err.to_string())
            );
            false
        }
    }
}

/// Open `log_path` for appending, creating it if needed.
///
/// Newly created files get the configured permissions.
pub(crate) fn open_for_append(config: &LoggerConfig, log_path: &Path) -> Result<File, LoggerError> {
    let created = !log_path.exists();
    let log_file = fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(log_path)
        .map_err(|err| LoggerError::CreateFileFailed(log_path.to_path_buf(), err.to_string()))?;
    if created {
        set_permissions(config, log_path)?;
    }
    Ok(log_file)
}

/// Set the permissions for a file based on the configured file mode.
///
/// Does nothing unless a mode was configured. On non-Unix systems a warning
/// is printed instead, since the Unix permission model doesn't apply.
pub(crate) fn set_permissions(config: &LoggerConfig, path: &Path) -> Result<(), LoggerError> {
    if let Some(mode) = config.file_mode() {
        #[cfg(unix)]
        {
            let perms = Permissions::from_mode(mode);
            fs::set_permissions(path, perms).map_err(|err| LoggerError::SetFilePermissionsError {
                path: path.to_path_buf(),
                error: err.to_string(),
            })?
        }
        #[cfg(not(unix))]
        {
            let _ = (mode, path);
            eprintln!("Warning: Setting file permissions is not supported on non-Unix platforms");
        }
    }
    Ok(())
}
