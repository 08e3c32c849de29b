use {
    crate::{LoggerConfig, LoggerError, RotationTrigger},
    chrono::{DateTime, NaiveDate, Utc},
    std::{
        fs,
        path::{Path, PathBuf},
    },
};

/// Seal the current log file into the daily file for `date`.
///
/// An existing daily file for the same date is replaced. Returns the path of
/// the sealed file, or `None` when there is no current file to seal.
pub(crate) fn seal_current(config: &LoggerConfig, date: NaiveDate) -> Result<Option<PathBuf>, LoggerError> {
    let curr_log_path = config.current_file_path();
    if !curr_log_path.exists() {
        return Ok(None);
    }

    let daily_log_path = config.daily_file_path(date);
    if daily_log_path.exists() {
        fs::remove_file(&daily_log_path).map_err(|err| LoggerError::RemoveFileError {
            path: daily_log_path.clone(),
            error: err.to_string(),
        })?;
    }
    fs::rename(&curr_log_path, &daily_log_path).map_err(|err| LoggerError::RenameFileError {
        from: curr_log_path.clone(),
        to: daily_log_path.clone(),
        error: err.to_string(),
    })?;

    Ok(Some(daily_log_path))
}

/// Seal the current file if the configured trigger says its period is over.
///
/// `period` is the day the current file's entries were written on, as far as
/// this process knows. When it is unknown (fresh process, file left by an
/// earlier run) the file's modification time is used instead. It is reset
/// whenever the current file is sealed or missing.
pub(crate) fn rotate_if_needed(
    config: &LoggerConfig,
    period: &mut Option<NaiveDate>,
    today: NaiveDate,
) -> Result<Option<PathBuf>, LoggerError> {
    let curr_log_path = config.current_file_path();
    if !curr_log_path.exists() {
        *period = None;
        return Ok(None);
    }

    let seal_date = match config.rotation_trigger() {
        RotationTrigger::EveryCall => today,
        RotationTrigger::DateChanged => match current_period(config, *period) {
            Some(day) if day != today => day,
            _ => return Ok(None),
        },
    };

    let sealed = seal_current(config, seal_date)?;
    *period = None;
    Ok(sealed)
}

/// Day the current file's entries belong to.
///
/// `tracked` wins when known, otherwise the file's modification time decides.
pub(crate) fn current_period(config: &LoggerConfig, tracked: Option<NaiveDate>) -> Option<NaiveDate> {
    tracked.or_else(|| modified_day(config, &config.current_file_path()))
}

/// Day the file at `path` was last written, in the configured time zone.
fn modified_day(config: &LoggerConfig, path: &Path) -> Option<NaiveDate> {
    let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
    Some(config.day_of(&DateTime::<Utc>::from(modified)))
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{DailyLoggerBuilder, TimeZone},
        std::collections::BTreeSet,
        tempfile::TempDir,
    };

    fn config(dir: &TempDir, trigger: RotationTrigger) -> LoggerConfig {
        DailyLoggerBuilder::new(dir.path())
            .time_zone(TimeZone::UTC)
            .rotation_trigger(trigger)
            .build_config()
            .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn listing(dir: &TempDir) -> BTreeSet<String> {
        fs::read_dir(dir.path())
            .unwrap()
            .flatten()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_seal_without_current_file_changes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(&temp_dir, RotationTrigger::DateChanged);
        fs::write(config.daily_file_path(date(2025, 4, 1)), "old").unwrap();
        let before = listing(&temp_dir);

        assert_eq!(seal_current(&config, date(2025, 4, 1)).unwrap(), None);
        let mut period = None;
        assert_eq!(rotate_if_needed(&config, &mut period, date(2025, 4, 2)).unwrap(), None);

        assert_eq!(listing(&temp_dir), before);
    }

    #[test]
    fn test_seal_replaces_existing_daily_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(&temp_dir, RotationTrigger::DateChanged);
        let day = date(2025, 4, 1);
        fs::write(config.daily_file_path(day), "stale content\n").unwrap();
        fs::write(config.current_file_path(), "fresh content\n").unwrap();

        let sealed = seal_current(&config, day).unwrap();

        assert_eq!(sealed, Some(config.daily_file_path(day)));
        assert!(!config.current_file_path().exists());
        assert_eq!(fs::read_to_string(config.daily_file_path(day)).unwrap(), "fresh content\n");
        let expected: BTreeSet<String> = ["log-2025-04-01.log".to_string()].into_iter().collect();
        assert_eq!(listing(&temp_dir), expected);
    }

    #[test]
    fn test_date_changed_keeps_same_day_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(&temp_dir, RotationTrigger::DateChanged);
        fs::write(config.current_file_path(), "entry\n").unwrap();
        let mut period = Some(date(2025, 4, 1));

        assert_eq!(rotate_if_needed(&config, &mut period, date(2025, 4, 1)).unwrap(), None);
        assert!(config.current_file_path().exists());
        assert_eq!(period, Some(date(2025, 4, 1)));
    }

    #[test]
    fn test_date_changed_seals_under_the_period_date() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(&temp_dir, RotationTrigger::DateChanged);
        fs::write(config.current_file_path(), "yesterday\n").unwrap();
        let mut period = Some(date(2025, 4, 1));

        let sealed = rotate_if_needed(&config, &mut period, date(2025, 4, 3)).unwrap();

        assert_eq!(sealed, Some(config.daily_file_path(date(2025, 4, 1))));
        assert_eq!(period, None);
        assert!(!config.current_file_path().exists());
    }

    #[test]
    fn test_date_changed_falls_back_to_modification_time() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(&temp_dir, RotationTrigger::DateChanged);
        fs::write(config.current_file_path(), "left by an earlier run\n").unwrap();
        let written_on = config.day_of(&Utc::now());
        let mut period = None;

        assert_eq!(rotate_if_needed(&config, &mut period, written_on).unwrap(), None);

        let next_day = written_on.succ_opt().unwrap();
        let sealed = rotate_if_needed(&config, &mut period, next_day).unwrap();
        assert_eq!(sealed, Some(config.daily_file_path(written_on)));
    }

    #[test]
    fn test_every_call_seals_under_today() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(&temp_dir, RotationTrigger::EveryCall);
        let today = date(2025, 4, 5);
        fs::write(config.current_file_path(), "first\n").unwrap();
        let mut period = Some(today);

        assert_eq!(
            rotate_if_needed(&config, &mut period, today).unwrap(),
            Some(config.daily_file_path(today))
        );

        fs::write(config.current_file_path(), "second\n").unwrap();
        rotate_if_needed(&config, &mut period, today).unwrap();
        assert_eq!(fs::read_to_string(config.daily_file_path(today)).unwrap(), "second\n");
    }
}
