use {
    chrono::{Days, Utc},
    daylog::{Compression, DailyLogger, DailyLoggerBuilder, LoggerError, Severity, TimeZone},
    std::time::Instant,
};

const LOG_FOLDER: &str = "./logs/compression";

/// Very dependant on log pattern, on random data compression might not be worth it.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let logger = DailyLoggerBuilder::new(format!("{LOG_FOLDER}/gzip"))
        .time_zone(TimeZone::UTC)
        .max_log_files(1)
        .compression(Compression::Gzip)
        .console(false)
        .build()?;
    writing_log(&logger)?;

    #[cfg(feature = "xz")]
    {
        let logger = DailyLoggerBuilder::new(format!("{LOG_FOLDER}/xz"))
            .time_zone(TimeZone::UTC)
            .max_log_files(1)
            .compression(Compression::XZ)
            .console(false)
            .build()?;
        writing_log(&logger)?;
    }

    #[cfg(not(feature = "xz"))]
    {
        println!("XZ compression examples skipped. Enable 'xz' feature to run XZ compression tests.");
    }
    println!("Done Compressing: {:?}", start.elapsed());
    println!("File | Bytes");
    for dir in std::fs::read_dir(LOG_FOLDER)?.flatten() {
        for file in std::fs::read_dir(dir.path())?.flatten() {
            let size = std::fs::metadata(file.path()).map_or(0, |m| m.len());
            println!("{:?} : {:?} Bytes", file.path(), size);
        }
    }

    Ok(())
}

/// Three days of entries: the first day overflows the retention of one and
/// is archived once the third day starts.
fn writing_log(logger: &DailyLogger) -> Result<(), LoggerError> {
    let first_day = Utc::now() - Days::new(3);
    for day in 0..3 {
        let at = first_day + Days::new(day);
        for i in 1..=10_000 {
            logger.log_at(
                Severity::Info,
                &format!("Log entry #{i}: This is a sample log message that will contribute to file size"),
                at,
            )?;
        }
    }
    Ok(())
}
