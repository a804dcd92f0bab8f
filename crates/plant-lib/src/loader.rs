//! Tabular record loading
//!
//! Reads comma-delimited sensor data with a header row. Columns are
//! matched by header name, rows are kept in file order, and the first bad
//! row aborts the whole load.

use crate::models::SensorRecord;
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Header row of the tabular format, in column order
pub const HEADER: [&str; 6] = [
    "timestamp",
    "power_output_mw",
    "temperature_c",
    "pressure_bar",
    "vibration_mm_s",
    "efficiency_percent",
];

/// Errors raised while reading or writing record files
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("input file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed input at line {line}: {message}")]
    Malformed { line: u64, message: String },

    #[error("failed to write records: {0}")]
    Csv(#[from] csv::Error),
}

/// Load all records from a file on disk
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<SensorRecord>, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let records = read_from(BufReader::new(file), path)?;
    debug!(path = %path.display(), records = records.len(), "Loaded sensor records");
    Ok(records)
}

/// Parse records from any reader producing the tabular format
pub fn read_records<R: Read>(reader: R) -> Result<Vec<SensorRecord>, LoadError> {
    read_from(reader, Path::new("<reader>"))
}

/// `path` only labels I/O errors
fn read_from<R: Read>(reader: R, path: &Path) -> Result<Vec<SensorRecord>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| classify_csv_error(e, path))?
        .clone();
    let mut records = Vec::new();

    for row in reader.records() {
        let row = row.map_err(|e| classify_csv_error(e, path))?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);

        let record: SensorRecord =
            row.deserialize(Some(&headers))
                .map_err(|e| LoadError::Malformed {
                    line,
                    message: e.to_string(),
                })?;

        ensure_finite(&record, line)?;
        records.push(record);
    }

    Ok(records)
}

/// Write records to `path`, creating the parent directory if needed
pub fn write_records(path: impl AsRef<Path>, records: &[SensorRecord]) -> Result<(), LoadError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| LoadError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    writer.write_record(HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), records = records.len(), "Wrote sensor records");
    Ok(())
}

/// Map a reader-level csv error onto the load taxonomy
fn classify_csv_error(err: csv::Error, path: &Path) -> LoadError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    let message = err.to_string();

    match err.into_kind() {
        csv::ErrorKind::Io(source) => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
        _ => LoadError::Malformed { line, message },
    }
}

fn ensure_finite(record: &SensorRecord, line: u64) -> Result<(), LoadError> {
    let fields = [
        ("power_output_mw", record.power_output_mw),
        ("temperature_c", record.temperature_c),
        ("pressure_bar", record.pressure_bar),
        ("vibration_mm_s", record.vibration_mm_s),
        ("efficiency_percent", record.efficiency_percent),
    ];

    match fields.iter().find(|(_, value)| !value.is_finite()) {
        Some((name, value)) => Err(LoadError::Malformed {
            line,
            message: format!("field '{}' is not a finite number: {}", name, value),
        }),
        None => Ok(()),
    }
}
