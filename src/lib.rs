//! # daylog
//!
//! daylog writes timestamped, severity-tagged messages to the console (color
//! coded) and to a daily rolling log file, and keeps the log directory tidy by
//! compressing old daily files into date-range archive bundles.
//!
//! A log directory managed by daylog looks like this:
//!
//! ```text
//! logs/
//! ├── latest.log              entries written since the last rotation
//! ├── log-2025-04-03.log      sealed daily files, at most `max_log_files`
//! ├── log-2025-04-04.log
//! └── 20250401-20250402.gz    archive bundle of the oldest overflow days
//! ```
//!
//! Every log call runs the same pipeline: make sure the directory exists,
//! seal `latest.log` into its daily file if a new day has started, print and
//! append the entry, then archive the oldest daily files once there are more
//! than `max_log_files` of them. The daily files are deleted only after their
//! bundle has been completely written.
//!
//! ## Example
//!
//! ```rust
//! use daylog::{Compression, DailyLoggerBuilder, Severity, TimeZone};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dir = tempfile::tempdir()?;
//!     let logger = DailyLoggerBuilder::new(dir.path())
//!         .max_log_files(7) // Keep one week of daily files uncompressed
//!         .time_zone(TimeZone::UTC) // Day boundaries at UTC midnight
//!         .compression(Compression::Gzip)
//!         .build()?;
//!
//!     logger.log(Severity::Info, "This is an info message")?;
//!     logger.warn("This is a warning message")?;
//!     logger.error("This is an error message")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! The logger can also serve as the backend of the [`log`] facade through
//! [`DailyLogger::init`].
mod archive;
mod config;
mod emitter;
mod error;
mod logger;
mod naming;
mod rotation;
mod storage;

pub use {
    archive::{ArchiveReport, HistoricalLog},
    config::{Compression, DailyLoggerBuilder, LoggerConfig, RotationTrigger, TimeZone, DEFAULT_MAX_LOG_FILES},
    emitter::{LogEntry, Severity},
    error::LoggerError,
    logger::DailyLogger,
    naming::{NamingPolicy, DEFAULT_CURRENT_FILE_STEM, DEFAULT_DAILY_PREFIX, DEFAULT_LOG_EXTENSION},
};
