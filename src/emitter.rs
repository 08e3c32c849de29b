use {
    crate::{storage, LoggerConfig, LoggerError},
    chrono::{DateTime, FixedOffset, SecondsFormat},
    colored::{Color, Colorize},
    std::{
        fmt,
        io::{self, Write as _},
    },
};

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warn,
    Info,
    Debug,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warn => "WARN",
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
        }
    }

    /// Foreground color of console lines at this severity.
    pub fn color(&self) -> Color {
        match self {
            Severity::Error => Color::Red,
            Severity::Warn => Color::Yellow,
            Severity::Info => Color::Blue,
            Severity::Debug => Color::Green,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Severity::Error,
            log::Level::Warn => Severity::Warn,
            log::Level::Info => Severity::Info,
            log::Level::Debug | log::Level::Trace => Severity::Debug,
        }
    }
}

/// One entry about to be written. Only its rendered text is ever stored.
#[derive(Debug, Clone)]
pub struct LogEntry<'a> {
    pub severity: Severity,
    pub message: &'a str,
    pub timestamp: DateTime<FixedOffset>,
}

impl<'a> LogEntry<'a> {
    pub fn new(severity: Severity, message: &'a str, timestamp: DateTime<FixedOffset>) -> Self {
        LogEntry {
            severity,
            message,
            timestamp,
        }
    }

    /// `[2025-04-01T09:30:00.000Z] [INFO] message`, without line terminator.
    pub fn render(&self) -> String {
        format!(
            "[{}] [{}] {}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.severity,
            self.message
        )
    }

    /// Line appended to the log file.
    pub fn file_line(&self) -> String {
        format!("{}\n", self.render())
    }

    /// Line printed on the console, colored by severity.
    ///
    /// Coloring follows `colored`'s global switch, so `NO_COLOR`,
    /// `CLICOLOR_FORCE` and [`colored::control::set_override`] apply.
    pub fn console_line(&self) -> String {
        format!("{}\n", self.render().color(self.severity.color()))
    }
}

/// Where colored console lines go.
pub(crate) enum ConsoleSink {
    Stdout,
    Writer(Box<dyn io::Write + Send>),
    Disabled,
}

impl ConsoleSink {
    pub(crate) fn emit(&mut self, entry: &LogEntry<'_>) -> io::Result<()> {
        match self {
            ConsoleSink::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(entry.console_line().as_bytes())?;
                stdout.flush()
            }
            ConsoleSink::Writer(writer) => {
                writer.write_all(entry.console_line().as_bytes())?;
                writer.flush()
            }
            ConsoleSink::Disabled => Ok(()),
        }
    }

    pub(crate) fn flush(&mut self) -> io::Result<()> {
        match self {
            ConsoleSink::Stdout => io::stdout().flush(),
            ConsoleSink::Writer(writer) => writer.flush(),
            ConsoleSink::Disabled => Ok(()),
        }
    }
}

/// Append `entry` to the current log file. Returns once the write completed.
pub(crate) fn append_to_file(config: &LoggerConfig, entry: &LogEntry<'_>) -> Result<(), LoggerError> {
    let log_path = config.current_file_path();
    let mut log_file = storage::open_for_append(config, &log_path)?;
    log_file.write_all(entry.file_line().as_bytes())?;
    log_file.flush()?;
    Ok(())
}
