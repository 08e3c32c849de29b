use daylog::{DailyLoggerBuilder, Severity, TimeZone};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logger = DailyLoggerBuilder::new("./logs")
        .time_zone(TimeZone::UTC) // Use UTC for consistent day boundaries across regions
        .max_log_files(7) // Keep one week of daily files uncompressed
        .file_mode(0o640) // Owner rw, group r, others none
        .build()?;

    logger.log(Severity::Info, "System startup")?;
    logger.debug("Configuration loaded successfully")?;
    logger.warn("Cache directory missing, starting cold")?;
    logger.error("Upstream 502 while fetching feed")?;

    Ok(())
}
