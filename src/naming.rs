//! File naming for the log directory.
//!
//! Three kinds of files live side by side:
//!
//! * the current log file, `latest.log`
//! * sealed daily files, `log-2025-04-01.log`
//! * archive bundles, `20250401-20250403.gz`
//!
//! Dates are zero padded, so sorting names lexicographically also sorts them
//! chronologically. The archival engine relies on this to find the oldest
//! files.
use {
    crate::{config::Compression, LoggerError},
    chrono::NaiveDate,
    regex::Regex,
};

/// Default stem of the current log file.
pub const DEFAULT_CURRENT_FILE_STEM: &str = "latest";
/// Default prefix of sealed daily log files.
pub const DEFAULT_DAILY_PREFIX: &str = "log-";
/// Default extension of current and daily log files.
pub const DEFAULT_LOG_EXTENSION: &str = ".log";

const DAILY_DATE_FORMAT: &str = "%Y-%m-%d";
const ARCHIVE_DATE_FORMAT: &str = "%Y%m%d";

/// Derives every file name used in the log directory.
#[derive(Debug, Clone)]
pub struct NamingPolicy {
    current_stem: String,
    daily_prefix: String,
    log_extension: String,
    archive_extension: &'static str,
    daily_pattern: Regex,
}

impl NamingPolicy {
    /// Create a naming policy, rejecting components that could escape the
    /// log directory or produce unparsable names.
    pub fn new(
        current_stem: &str,
        daily_prefix: &str,
        log_extension: &str,
        compression: &Compression,
    ) -> Result<Self, LoggerError> {
        if !log_extension.starts_with('.') || log_extension.len() < 2 {
            return Err(LoggerError::InvalidConfig(format!(
                "log extension '{log_extension}' must start with '.' and not be empty"
            )));
        }
        for (what, value) in [
            ("current file stem", current_stem),
            ("daily prefix", daily_prefix),
            ("log extension", log_extension),
        ] {
            if value.is_empty() {
                return Err(LoggerError::InvalidConfig(format!("{what} must not be empty")));
            }
            if value.contains(['/', '\\']) {
                return Err(LoggerError::InvalidConfig(format!(
                    "{what} '{value}' must not contain path separators"
                )));
            }
        }

        let daily_pattern = Regex::new(&format!(
            r"^{}(\d{{4}}-\d{{2}}-\d{{2}}){}$",
            regex::escape(daily_prefix),
            regex::escape(log_extension)
        ))
        .map_err(|err| LoggerError::InternalError(err.to_string()))?;

        Ok(NamingPolicy {
            current_stem: current_stem.to_string(),
            daily_prefix: daily_prefix.to_string(),
            log_extension: log_extension.to_string(),
            archive_extension: compression.get_extension(),
            daily_pattern,
        })
    }

    /// Name of the file currently being appended to.
    pub fn current_file_name(&self) -> String {
        format!("{}{}", self.current_stem, self.log_extension)
    }

    /// Name of the sealed log file for `date`.
    pub fn daily_file_name(&self, date: NaiveDate) -> String {
        format!(
            "{}{}{}",
            self.daily_prefix,
            date.format(DAILY_DATE_FORMAT),
            self.log_extension
        )
    }

    /// Name of the archive bundle covering `start..=end`.
    pub fn archive_file_name(&self, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}-{}.{}",
            start.format(ARCHIVE_DATE_FORMAT),
            end.format(ARCHIVE_DATE_FORMAT),
            self.archive_extension
        )
    }

    /// Name of the `index`th bundle covering `start..=end`.
    ///
    /// Index 0 is the plain [`archive_file_name`](Self::archive_file_name);
    /// later bundles for the same range get `.1`, `.2`, ... before the
    /// extension, so an earlier bundle is never replaced.
    pub fn indexed_archive_file_name(&self, start: NaiveDate, end: NaiveDate, index: u32) -> String {
        if index == 0 {
            return self.archive_file_name(start, end);
        }
        format!(
            "{}-{}.{}.{}",
            start.format(ARCHIVE_DATE_FORMAT),
            end.format(ARCHIVE_DATE_FORMAT),
            index,
            self.archive_extension
        )
    }

    /// Recover the date of a sealed daily log file from its name.
    ///
    /// Returns `None` for the current file, archives, foreign files and
    /// names carrying an impossible calendar date.
    pub fn parse_daily_file_name(&self, name: &str) -> Option<NaiveDate> {
        let caps = self.daily_pattern.captures(name)?;
        NaiveDate::parse_from_str(caps.get(1)?.as_str(), DAILY_DATE_FORMAT).ok()
    }

    /// Extension of current and daily files, including the dot.
    pub fn log_extension(&self) -> &str {
        &self.log_extension
    }

    /// Extension of archive bundles, without the dot.
    pub fn archive_extension(&self) -> &'static str {
        self.archive_extension
    }
}
