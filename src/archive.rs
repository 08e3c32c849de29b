//! Archival of overflow daily log files.
//!
//! Once more than `max_log_files` sealed daily files exist, the oldest
//! overflow batch is concatenated into one compressed bundle named after the
//! first and last day it covers. The originals are removed only after the
//! bundle has been finished, flushed and synced. Any failure before that
//! point leaves every daily file in place.
//!
//! Bundles are created exclusively. A range that already has a bundle gets
//! `20250401-20250401.1.gz`, `.2.gz` and so on, so a day re-archived after a
//! late entry never replaces what was stored before.
use {
    crate::{config::Compression, storage, LoggerConfig, LoggerError},
    chrono::NaiveDate,
    flate2::write::GzEncoder,
    std::{
        fs::{self, File},
        io::{self, Read, Write},
        path::PathBuf,
    },
};

/// A sealed daily log file found in the log directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricalLog {
    /// The day the file was sealed for.
    pub date: NaiveDate,
    pub path: PathBuf,
}

/// Outcome of a successful archival run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveReport {
    /// Path of the written bundle.
    pub archive: PathBuf,
    /// First day covered by the bundle.
    pub start: NaiveDate,
    /// Last day covered by the bundle.
    pub end: NaiveDate,
    /// Daily files absorbed and removed.
    pub absorbed: Vec<PathBuf>,
}

/// List sealed daily files, oldest first.
///
/// Only regular files whose names parse as daily file names are returned,
/// so the current file, archives and anything foreign are skipped.
pub(crate) fn list_historical_logs(config: &LoggerConfig) -> Result<Vec<HistoricalLog>, LoggerError> {
    let files = fs::read_dir(config.directory())?;

    let mut all_log_files = Vec::new();
    for file in files.flatten() {
        let metadata = file.metadata()?;
        if !metadata.is_file() {
            continue;
        }
        if let Some(date) = file
            .file_name()
            .to_str()
            .and_then(|name| config.naming().parse_daily_file_name(name))
        {
            all_log_files.push(HistoricalLog { date, path: file.path() });
        }
    }

    all_log_files.sort_by_key(|log| log.date);

    Ok(all_log_files)
}

/// Most bundles sharing one date range before archival gives up.
const MAX_BUNDLE_INDEX: u32 = 1000;

/// Destination of a bundle's compressed bytes.
pub(crate) trait BundleSink: Write {
    /// Make everything written so far durable.
    fn commit(self) -> io::Result<()>;
}

impl BundleSink for io::BufWriter<File> {
    fn commit(self) -> io::Result<()> {
        self.into_inner().map_err(|err| err.into_error())?.sync_all()
    }
}

/// Archive the oldest daily files beyond the retention threshold.
///
/// Returns `None` when the threshold isn't exceeded.
pub(crate) fn archive_overflow(config: &LoggerConfig) -> Result<Option<ArchiveReport>, LoggerError> {
    archive_overflow_with(config, io::BufWriter::new)
}

fn archive_overflow_with<S, F>(config: &LoggerConfig, open_sink: F) -> Result<Option<ArchiveReport>, LoggerError>
where
    S: BundleSink,
    F: FnOnce(File) -> S,
{
    let all_log_files = list_historical_logs(config)?;
    if all_log_files.len() <= config.max_log_files() {
        return Ok(None);
    }

    let batch = &all_log_files[..all_log_files.len() - config.max_log_files()];
    archive_batch(config, batch, open_sink).map(Some)
}

/// Compress `batch`, oldest first, into a new bundle and delete its files.
///
/// Bundles are never overwritten: when the date range already has one, the
/// next free indexed name is used. On failure only the bundle created by
/// this call is removed, and every daily file stays.
fn archive_batch<S, F>(config: &LoggerConfig, batch: &[HistoricalLog], open_sink: F) -> Result<ArchiveReport, LoggerError>
where
    S: BundleSink,
    F: FnOnce(File) -> S,
{
    let (start, end) = match (batch.first(), batch.last()) {
        (Some(first), Some(last)) => (first.date, last.date),
        _ => return Err(LoggerError::InternalError("empty archive batch".to_string())),
    };
    let archive_failed = |path: PathBuf, err: io::Error| LoggerError::ArchiveFailed {
        path,
        error: err.to_string(),
    };

    // Open every source up front so a missing file fails before any bundle exists.
    let reader = open_batch(batch).map_err(|err| archive_failed(config.archive_file_path(start, end), err))?;
    let (archive_path, outfile) = create_bundle(config, start, end)?;

    let written = compress(config.compression(), reader, open_sink(outfile)).and_then(BundleSink::commit);
    if let Err(err) = written {
        // Partial bundle created above, nothing has been deleted yet.
        let _ = fs::remove_file(&archive_path);
        return Err(archive_failed(archive_path, err));
    }
    storage::set_permissions(config, &archive_path)?;

    let mut absorbed = Vec::with_capacity(batch.len());
    for log in batch {
        match fs::remove_file(&log.path) {
            Ok(()) => absorbed.push(log.path.clone()),
            Err(err) => eprintln!("Failed to remove archived log file '{}': {}", log.path.display(), err),
        }
    }

    Ok(ArchiveReport {
        archive: archive_path,
        start,
        end,
        absorbed,
    })
}

/// Chain the files of `batch` into one reader, in order.
fn open_batch(batch: &[HistoricalLog]) -> io::Result<Box<dyn Read>> {
    let mut reader: Box<dyn Read> = Box::new(io::empty());
    for log in batch {
        reader = Box::new(reader.chain(File::open(&log.path)?));
    }
    Ok(reader)
}

/// Create a fresh bundle file for `start..=end`, never reusing an existing one.
fn create_bundle(config: &LoggerConfig, start: NaiveDate, end: NaiveDate) -> Result<(PathBuf, File), LoggerError> {
    for index in 0..MAX_BUNDLE_INDEX {
        let archive_path = config
            .directory()
            .join(config.naming().indexed_archive_file_name(start, end, index));
        match fs::OpenOptions::new().write(true).create_new(true).open(&archive_path) {
            Ok(outfile) => return Ok((archive_path, outfile)),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(err) => {
                return Err(LoggerError::ArchiveFailed {
                    path: archive_path,
                    error: err.to_string(),
                })
            }
        }
    }
    Err(LoggerError::ArchiveFailed {
        path: config.archive_file_path(start, end),
        error: format!("{MAX_BUNDLE_INDEX} bundles already cover this date range"),
    })
}

/// Compress everything `reader` yields into `writer`.
///
/// The writer is handed back only after the compressed stream has been
/// finished and flushed.
pub(crate) fn compress<R: Read, W: Write>(compression: &Compression, mut reader: R, writer: W) -> io::Result<W> {
    match compression {
        Compression::Gzip => {
            let mut encoder = GzEncoder::new(writer, flate2::Compression::default());
            io::copy(&mut reader, &mut encoder)?;
            let mut writer = encoder.finish()?;
            writer.flush()?;
            Ok(writer)
        }
        #[cfg(feature = "xz")]
        Compression::XZ => {
            let mut reader = io::BufReader::new(reader);
            let mut writer = writer;
            lzma_rs::xz_compress(&mut reader, &mut writer)?;
            writer.flush()?;
            Ok(writer)
        }
    }
}
