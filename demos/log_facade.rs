use daylog::{DailyLoggerBuilder, TimeZone};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    DailyLoggerBuilder::new("./logs/facade")
        .time_zone(TimeZone::Local)
        .build()?
        .init()?;

    log::info!("This is an info message");
    log::warn!("This is a warning message");
    log::error!("This is an error message");
    log::trace!("Trace entries are written as DEBUG");

    Ok(())
}
