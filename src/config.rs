use {
    crate::{
        emitter::ConsoleSink,
        logger::DailyLogger,
        naming::{NamingPolicy, DEFAULT_CURRENT_FILE_STEM, DEFAULT_DAILY_PREFIX, DEFAULT_LOG_EXTENSION},
        LoggerError,
    },
    chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc},
    std::{
        io,
        path::{Path, PathBuf},
    },
};

/// Default number of sealed daily files kept uncompressed.
pub const DEFAULT_MAX_LOG_FILES: usize = 7;

/// Specifies the compression algorithm used for archive bundles.
///
/// Archive bundles hold the concatenated contents of several sealed daily
/// files and are named after the algorithm's extension, e.g.
/// `20250401-20250402.gz`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Compression {
    /// Gzip compression, which provides a good balance of compression ratio
    /// and speed. Bundles have the `.gz` extension.
    #[default]
    Gzip,
    /// XZ compression. Smaller bundles at the cost of slower archival.
    /// Bundles have the `.xz` extension. Requires the `xz` feature.
    #[cfg(feature = "xz")]
    XZ,
}

impl Compression {
    /// Get the extension for the archive bundle.
    pub(crate) fn get_extension(&self) -> &'static str {
        match self {
            Compression::Gzip => "gz",
            #[cfg(feature = "xz")]
            Compression::XZ => "xz",
        }
    }
}

/// Specifies the time zone used for timestamps and for deciding which
/// calendar day an entry belongs to.
///
/// # Examples
/// ```
/// use daylog::TimeZone;
/// use chrono::FixedOffset;
///
/// let utc = TimeZone::UTC;
/// let local = TimeZone::Local;
/// let tokyo = TimeZone::Fix(FixedOffset::east_opt(9 * 3600).unwrap());
/// ```
#[derive(Debug, Clone)]
pub enum TimeZone {
    /// Use UTC time zone.
    UTC,
    /// Use the system's local offset as it is when the logger is built.
    ///
    /// The offset is not refreshed afterwards. A process that keeps running
    /// across a daylight saving change keeps the old offset, so its day
    /// boundaries and timestamps are off by the DST shift until the logger
    /// is rebuilt. Use [`TimeZone::Fix`] or [`TimeZone::UTC`] when that
    /// matters.
    Local,
    /// Use a fixed time zone offset.
    Fix(FixedOffset),
}

impl TimeZone {
    fn offset(&self) -> FixedOffset {
        match self {
            TimeZone::UTC => Utc::now().fixed_offset().offset().to_owned(),
            TimeZone::Local => Local::now().offset().to_owned(),
            TimeZone::Fix(fixed_offset) => *fixed_offset,
        }
    }
}

/// Decides when the current log file is sealed into a daily file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RotationTrigger {
    /// Seal the current file only once an entry for a later day arrives.
    /// The file is sealed under the day its entries were written on.
    #[default]
    DateChanged,
    /// Seal whatever is in the current file under today's date on every
    /// call. Same-day content sealed earlier is replaced, so each daily file
    /// ends up holding only the last entry written before the seal.
    EveryCall,
}

/// Validated settings shared by every component of the logger.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    directory: PathBuf,
    naming: NamingPolicy,
    max_log_files: usize,
    compression: Compression,
    time_zone: FixedOffset,
    rotation_trigger: RotationTrigger,
    /// Unix permission bits applied to newly created files, e.g. `0o640`.
    file_mode: Option<u32>,
}

impl LoggerConfig {
    /// Directory holding the current file, daily files and bundles.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Naming policy for every file in the log directory.
    pub fn naming(&self) -> &NamingPolicy {
        &self.naming
    }

    /// Retention threshold: the most sealed daily files kept uncompressed.
    pub fn max_log_files(&self) -> usize {
        self.max_log_files
    }

    /// Algorithm used for archive bundles.
    pub fn compression(&self) -> &Compression {
        &self.compression
    }

    /// Offset used for timestamps and day boundaries.
    ///
    /// Resolved once when the logger is built, see [`TimeZone::Local`].
    pub fn time_zone(&self) -> FixedOffset {
        self.time_zone
    }

    /// When the current file is sealed into a daily file.
    pub fn rotation_trigger(&self) -> RotationTrigger {
        self.rotation_trigger
    }

    /// Unix permission bits applied to new log files and bundles, if any.
    pub fn file_mode(&self) -> Option<u32> {
        self.file_mode
    }

    /// Current time in the configured time zone.
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.time_zone)
    }

    /// Calendar day `timestamp` falls on in the configured time zone.
    pub fn day_of<Tz: chrono::TimeZone>(&self, timestamp: &DateTime<Tz>) -> NaiveDate {
        timestamp.with_timezone(&self.time_zone).date_naive()
    }

    /// Path of the file entries are appended to.
    pub fn current_file_path(&self) -> PathBuf {
        self.directory.join(self.naming.current_file_name())
    }

    /// Path of the sealed file for `date`.
    pub fn daily_file_path(&self, date: NaiveDate) -> PathBuf {
        self.directory.join(self.naming.daily_file_name(date))
    }

    /// Path of the first bundle covering `start..=end`.
    pub fn archive_file_path(&self, start: NaiveDate, end: NaiveDate) -> PathBuf {
        self.directory.join(self.naming.archive_file_name(start, end))
    }
}

/// Provides a fluent interface for configuring [`DailyLogger`] instances.
///
/// # Default Configuration
///
/// * Current file `latest.log`, daily files `log-YYYY-MM-DD.log`
/// * Keep 7 daily files before archiving the oldest
/// * Gzip archive bundles
/// * Local system time zone
/// * Rotate when the day changes
/// * Colored console output on stdout
///
/// # Examples
///
/// ```rust
/// use daylog::{DailyLoggerBuilder, Severity, TimeZone};
///
/// let dir = tempfile::tempdir().unwrap();
/// let logger = DailyLoggerBuilder::new(dir.path())
///     .max_log_files(14)
///     .time_zone(TimeZone::UTC)
///     .console(false)
///     .build()
///     .unwrap();
/// logger.log(Severity::Info, "service started").unwrap();
/// ```
pub struct DailyLoggerBuilder {
    directory: PathBuf,
    current_file_stem: String,
    daily_prefix: String,
    log_extension: String,
    max_log_files: usize,
    compression: Compression,
    time_zone: TimeZone,
    rotation_trigger: RotationTrigger,
    file_mode: Option<u32>,
    console: ConsoleSink,
}

impl DailyLoggerBuilder {
    /// Create a new builder writing into `directory`.
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        DailyLoggerBuilder {
            directory: directory.as_ref().to_path_buf(),
            current_file_stem: DEFAULT_CURRENT_FILE_STEM.to_string(),
            daily_prefix: DEFAULT_DAILY_PREFIX.to_string(),
            log_extension: DEFAULT_LOG_EXTENSION.to_string(),
            max_log_files: DEFAULT_MAX_LOG_FILES,
            compression: Compression::default(),
            time_zone: TimeZone::Local,
            rotation_trigger: RotationTrigger::default(),
            file_mode: None,
            console: ConsoleSink::Stdout,
        }
    }

    /// Set the maximum number of daily files kept uncompressed.
    pub fn max_log_files(self, max_log_files: usize) -> Self {
        Self { max_log_files, ..self }
    }

    /// Set the extension of current and daily log files, including the dot.
    pub fn log_extension(self, log_extension: &str) -> Self {
        Self {
            log_extension: log_extension.to_string(),
            ..self
        }
    }

    /// Set the stem of the current log file (`latest` by default).
    pub fn current_file_stem(self, stem: &str) -> Self {
        Self {
            current_file_stem: stem.to_string(),
            ..self
        }
    }

    /// Set the prefix of daily log files (`log-` by default).
    pub fn daily_prefix(self, prefix: &str) -> Self {
        Self {
            daily_prefix: prefix.to_string(),
            ..self
        }
    }

    /// Set the compression used for archive bundles.
    pub fn compression(self, compression: Compression) -> Self {
        Self { compression, ..self }
    }

    /// Set the time zone for timestamps and day boundaries.
    pub fn time_zone(self, time_zone: TimeZone) -> Self {
        Self { time_zone, ..self }
    }

    /// Set when the current file is sealed.
    pub fn rotation_trigger(self, rotation_trigger: RotationTrigger) -> Self {
        Self {
            rotation_trigger,
            ..self
        }
    }

    /// Set the file permissions for new log files and archives (Unix-like
    /// systems only), in octal notation like when using chmod.
    pub fn file_mode(self, mode: u32) -> Self {
        Self {
            file_mode: Some(mode),
            ..self
        }
    }

    /// Enable or disable colored console output on stdout.
    pub fn console(self, enabled: bool) -> Self {
        Self {
            console: if enabled { ConsoleSink::Stdout } else { ConsoleSink::Disabled },
            ..self
        }
    }

    /// Send colored console output to `writer` instead of stdout.
    pub fn console_writer<W: io::Write + Send + 'static>(self, writer: W) -> Self {
        Self {
            console: ConsoleSink::Writer(Box::new(writer)),
            ..self
        }
    }

    /// Validate the settings without building a logger.
    pub(crate) fn build_config(&self) -> Result<LoggerConfig, LoggerError> {
        Ok(LoggerConfig {
            directory: self.directory.clone(),
            naming: NamingPolicy::new(
                &self.current_file_stem,
                &self.daily_prefix,
                &self.log_extension,
                &self.compression,
            )?,
            max_log_files: self.max_log_files,
            compression: self.compression.clone(),
            time_zone: self.time_zone.offset(),
            rotation_trigger: self.rotation_trigger,
            file_mode: self.file_mode,
        })
    }

    /// Build the logger.
    pub fn build(self) -> Result<DailyLogger, LoggerError> {
        let config = self.build_config()?;
        Ok(DailyLogger::new(config, self.console))
    }
}
