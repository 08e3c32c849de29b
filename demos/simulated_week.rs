use {
    chrono::{Days, Utc},
    daylog::{DailyLoggerBuilder, Severity, TimeZone},
    std::fs,
};

const LOG_FOLDER: &str = "./logs/simulated";

/// Replays twelve days of activity with a retention of five daily files and
/// prints what ends up in the log directory.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logger = DailyLoggerBuilder::new(LOG_FOLDER)
        .time_zone(TimeZone::UTC)
        .max_log_files(5)
        .console(false)
        .build()?;

    let start = Utc::now() - Days::new(12);
    for n in 0..12 {
        let at = start + Days::new(n);
        logger.log_at(Severity::Info, &format!("Nightly job #{n} finished"), at)?;
        logger.log_at(Severity::Debug, &format!("Nightly job #{n} processed 42 items"), at)?;
    }

    let mut names: Vec<String> = fs::read_dir(LOG_FOLDER)?
        .flatten()
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    for name in names {
        println!("{name}");
    }

    Ok(())
}
