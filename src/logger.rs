use {
    crate::{
        archive::{self, ArchiveReport, HistoricalLog},
        emitter::{self, ConsoleSink, LogEntry, Severity},
        rotation, storage, LoggerConfig, LoggerError,
    },
    chrono::{DateTime, NaiveDate},
    std::{
        path::PathBuf,
        sync::{Mutex, MutexGuard, PoisonError},
    },
};

/// Mutable state shared by log calls.
struct LoggerState {
    console: ConsoleSink,
    /// Day the entries in the current file were written on, once known.
    period: Option<NaiveDate>,
}

/// Writes entries to the console and to a daily rolling log file, archiving
/// daily files beyond the retention threshold.
///
/// Calls are serialized inside the process. Running several processes
/// against the same directory is not supported.
pub struct DailyLogger {
    config: LoggerConfig,
    state: Mutex<LoggerState>,
}

impl DailyLogger {
    pub(crate) fn new(config: LoggerConfig, console: ConsoleSink) -> Self {
        DailyLogger {
            config,
            state: Mutex::new(LoggerState { console, period: None }),
        }
    }

    /// Settings this logger was built with.
    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    fn lock_state(&self) -> MutexGuard<'_, LoggerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Log `message` with the current time.
    pub fn log(&self, severity: Severity, message: &str) -> Result<(), LoggerError> {
        self.log_at(severity, message, self.config.now())
    }

    /// Log `message` as if it happened at `timestamp`.
    ///
    /// Runs the whole pipeline before returning: directory check, rotation,
    /// console and file output, then archival.
    pub fn log_at<Tz: chrono::TimeZone>(
        &self,
        severity: Severity,
        message: &str,
        timestamp: DateTime<Tz>,
    ) -> Result<(), LoggerError> {
        let timestamp = timestamp.with_timezone(&self.config.time_zone());
        let today = timestamp.date_naive();

        storage::ensure_log_directory(&self.config);

        let mut state = self.lock_state();
        rotation::rotate_if_needed(&self.config, &mut state.period, today)?;

        let entry = LogEntry::new(severity, message, timestamp);
        if let Err(err) = state.console.emit(&entry) {
            eprintln!("Failed to write log entry to console: {}", err);
        }
        emitter::append_to_file(&self.config, &entry)?;
        state.period = Some(today);

        archive::archive_overflow(&self.config)?;
        Ok(())
    }

    /// Log `message` at `ERROR` severity with the current time.
    pub fn error(&self, message: &str) -> Result<(), LoggerError> {
        self.log(Severity::Error, message)
    }

    /// Log `message` at `WARN` severity with the current time.
    pub fn warn(&self, message: &str) -> Result<(), LoggerError> {
        self.log(Severity::Warn, message)
    }

    /// Log `message` at `INFO` severity with the current time.
    pub fn info(&self, message: &str) -> Result<(), LoggerError> {
        self.log(Severity::Info, message)
    }

    /// Log `message` at `DEBUG` severity with the current time.
    pub fn debug(&self, message: &str) -> Result<(), LoggerError> {
        self.log(Severity::Debug, message)
    }

    /// Seal the current file now, whatever the rotation trigger.
    ///
    /// The file is sealed under the day its entries were written on, or today
    /// when that can't be determined.
    pub fn rotate_now(&self) -> Result<Option<PathBuf>, LoggerError> {
        storage::ensure_log_directory(&self.config);
        let mut state = self.lock_state();
        let today = self.config.day_of(&self.config.now());
        let seal_date = rotation::current_period(&self.config, state.period).unwrap_or(today);
        let sealed = rotation::seal_current(&self.config, seal_date)?;
        if sealed.is_some() {
            state.period = None;
        }
        Ok(sealed)
    }

    /// Archive daily files beyond the retention threshold now.
    pub fn archive_now(&self) -> Result<Option<ArchiveReport>, LoggerError> {
        let _state = self.lock_state();
        archive::archive_overflow(&self.config)
    }

    /// Sealed daily files currently kept uncompressed, oldest first.
    pub fn historical_logs(&self) -> Result<Vec<HistoricalLog>, LoggerError> {
        archive::list_historical_logs(&self.config)
    }

    /// Install this logger as the backend of the `log` facade.
    pub fn init(self) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(log::LevelFilter::Trace);
        Ok(())
    }
}

impl log::Log for DailyLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        let message = record.args().to_string();
        if let Err(err) = self.log_at(record.level().into(), &message, self.config.now()) {
            eprintln!("Failed to write log entry: {}", err);
        }
    }

    fn flush(&self) {
        if let Err(err) = self.lock_state().console.flush() {
            eprintln!("Failed to flush console: {}", err);
        }
    }
}
