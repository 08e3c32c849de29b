use {
    chrono::{DateTime, Days, FixedOffset, NaiveDate, TimeZone as _},
    daylog::{DailyLogger, DailyLoggerBuilder, Severity, TimeZone},
    flate2::read::GzDecoder,
    std::{
        collections::BTreeSet,
        fs::{self, File},
        io::{self, Read, Write},
        path::Path,
        sync::{Arc, Mutex},
    },
    tempfile::TempDir,
};

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn first_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

/// Noon UTC on day `n`, counting from 2025-01-01 as day 1.
fn noon_of_day(n: u64) -> DateTime<FixedOffset> {
    let date = first_day() + Days::new(n - 1);
    FixedOffset::east_opt(0)
        .unwrap()
        .from_local_datetime(&date.and_hms_opt(12, 0, 0).unwrap())
        .unwrap()
}

fn date_of_day(n: u64) -> NaiveDate {
    first_day() + Days::new(n - 1)
}

fn file_names(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .unwrap()
        .flatten()
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect()
}

fn gunzip(path: &Path) -> String {
    let mut content = String::new();
    GzDecoder::new(File::open(path).unwrap())
        .read_to_string(&mut content)
        .unwrap();
    content
}

fn weekly_logger(dir: &Path) -> DailyLogger {
    DailyLoggerBuilder::new(dir)
        .max_log_files(7)
        .time_zone(TimeZone::UTC)
        .console(false)
        .build()
        .unwrap()
}

#[test]
fn test_ten_days_of_logging() {
    let temp_dir = TempDir::new().unwrap();
    let logger = weekly_logger(temp_dir.path());

    for n in 1..=10 {
        logger
            .log_at(Severity::Info, &format!("message of day {n}"), noon_of_day(n))
            .unwrap();
    }

    // The eighth daily file appears on day 9 and the ninth on day 10; each is
    // archived as soon as it overflows the threshold.
    let expected: BTreeSet<String> = [
        "20250101-20250101.gz",
        "20250102-20250102.gz",
        "latest.log",
        "log-2025-01-03.log",
        "log-2025-01-04.log",
        "log-2025-01-05.log",
        "log-2025-01-06.log",
        "log-2025-01-07.log",
        "log-2025-01-08.log",
        "log-2025-01-09.log",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    assert_eq!(file_names(temp_dir.path()), expected);

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("latest.log")).unwrap(),
        "[2025-01-10T12:00:00.000Z] [INFO] message of day 10\n"
    );
    assert_eq!(
        gunzip(&temp_dir.path().join("20250101-20250101.gz")),
        "[2025-01-01T12:00:00.000Z] [INFO] message of day 1\n"
    );
    assert_eq!(
        gunzip(&temp_dir.path().join("20250102-20250102.gz")),
        "[2025-01-02T12:00:00.000Z] [INFO] message of day 2\n"
    );

    let kept: Vec<NaiveDate> = logger
        .historical_logs()
        .unwrap()
        .into_iter()
        .map(|log| log.date)
        .collect();
    assert_eq!(kept, (3..=9).map(date_of_day).collect::<Vec<_>>());
}

#[test]
fn test_overflow_batch_is_archived_into_one_bundle() {
    let temp_dir = TempDir::new().unwrap();
    let logger = weekly_logger(temp_dir.path());
    // Nine days sealed by an earlier run that never archived.
    for n in 1..=9 {
        fs::write(
            logger.config().daily_file_path(date_of_day(n)),
            format!("sealed day {n}\n"),
        )
        .unwrap();
    }

    logger.log_at(Severity::Info, "back online", noon_of_day(10)).unwrap();

    assert!(temp_dir.path().join("20250101-20250102.gz").is_file());
    assert_eq!(
        gunzip(&temp_dir.path().join("20250101-20250102.gz")),
        "sealed day 1\nsealed day 2\n"
    );
    assert_eq!(logger.historical_logs().unwrap().len(), 7);
    let archives = file_names(temp_dir.path())
        .into_iter()
        .filter(|name| name.ends_with(".gz"))
        .count();
    assert_eq!(archives, 1);
}

#[test]
fn test_archive_now_reports_the_batch() {
    let temp_dir = TempDir::new().unwrap();
    let logger = weekly_logger(temp_dir.path());
    for n in 1..=8 {
        fs::write(logger.config().daily_file_path(date_of_day(n)), "x\n").unwrap();
    }

    let report = logger.archive_now().unwrap().unwrap();

    assert_eq!(report.start, date_of_day(1));
    assert_eq!(report.end, date_of_day(1));
    assert_eq!(report.absorbed, vec![logger.config().daily_file_path(date_of_day(1))]);
    assert_eq!(logger.archive_now().unwrap(), None);
}

#[test]
fn test_taken_bundle_name_is_left_alone() {
    let temp_dir = TempDir::new().unwrap();
    let logger = weekly_logger(temp_dir.path());
    for n in 1..=9 {
        fs::write(
            logger.config().daily_file_path(date_of_day(n)),
            format!("sealed day {n}\n"),
        )
        .unwrap();
    }
    fs::create_dir(temp_dir.path().join("20250101-20250102.gz")).unwrap();

    let report = logger.archive_now().unwrap().unwrap();

    assert_eq!(report.archive, temp_dir.path().join("20250101-20250102.1.gz"));
    assert!(temp_dir.path().join("20250101-20250102.gz").is_dir());
    assert_eq!(gunzip(&report.archive), "sealed day 1\nsealed day 2\n");
    assert_eq!(logger.historical_logs().unwrap().len(), 7);
}

#[test]
fn test_late_entry_for_archived_day_gets_its_own_bundle() {
    let temp_dir = TempDir::new().unwrap();
    let logger = DailyLoggerBuilder::new(temp_dir.path())
        .max_log_files(1)
        .time_zone(TimeZone::UTC)
        .console(false)
        .build()
        .unwrap();

    for n in 1..=3 {
        logger
            .log_at(Severity::Info, &format!("message of day {n}"), noon_of_day(n))
            .unwrap();
    }
    logger.log_at(Severity::Warn, "replayed from day 1", noon_of_day(1)).unwrap();
    logger.log_at(Severity::Info, "message of day 4", noon_of_day(4)).unwrap();

    assert_eq!(
        gunzip(&temp_dir.path().join("20250101-20250101.gz")),
        "[2025-01-01T12:00:00.000Z] [INFO] message of day 1\n"
    );
    assert_eq!(
        gunzip(&temp_dir.path().join("20250101-20250101.1.gz")),
        "[2025-01-01T12:00:00.000Z] [WARN] replayed from day 1\n"
    );
    assert!(temp_dir.path().join("20250102-20250102.gz").is_file());
}

#[test]
fn test_error_line_on_console_and_file() {
    colored::control::set_override(true);
    let temp_dir = TempDir::new().unwrap();
    let console = SharedBuffer::default();
    let logger = DailyLoggerBuilder::new(temp_dir.path())
        .time_zone(TimeZone::UTC)
        .console_writer(console.clone())
        .build()
        .unwrap();

    logger
        .log_at(Severity::Error, "database unreachable", noon_of_day(1))
        .unwrap();

    let console_line = console.contents();
    let file_line = fs::read_to_string(temp_dir.path().join("latest.log")).unwrap();
    assert!(console_line.contains("[ERROR]"));
    assert!(file_line.contains("[ERROR]"));
    assert!(!file_line.contains('\x1b'));
    assert_eq!(
        console_line,
        format!("\x1b[31m{}\x1b[0m\n", file_line.trim_end_matches('\n'))
    );
}
