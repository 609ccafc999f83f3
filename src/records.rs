use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Columns every input manifest must carry, in any order.
pub const REQUIRED_COLUMNS: [&str; 2] = ["file_name", "transcription"];

/// One input row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Record {
    /// Path of the audio file as written in the manifest.
    pub file_name: String,
    pub transcription: String,
}

impl Record {
    pub fn new(file_name: impl Into<String>, transcription: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            transcription: transcription.into(),
        }
    }
}

/// Read every record from the CSV at `path`.
pub fn read_records(path: &Path) -> Result<Vec<Record>> {
    let file = File::open(path).map_err(|source| Error::InputNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_records(file).map_err(|err| match err {
        Error::Csv(err) if err.is_io_error() => Error::InputNotFound {
            path: path.to_path_buf(),
            source: match err.into_kind() {
                csv::ErrorKind::Io(source) => source,
                other => std::io::Error::other(format!("{other:?}")),
            },
        },
        other => other,
    })?;
    tracing::debug!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Parse records from any CSV source. Extra columns are ignored and rows
/// keep their input order.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<Record>> {
    let mut rdr = ReaderBuilder::new().from_reader(reader);

    let headers = strip_bom(rdr.headers().map_err(malformed)?);
    if !REQUIRED_COLUMNS
        .iter()
        .all(|required| headers.iter().any(|h| h == *required))
    {
        return Err(Error::MissingColumns {
            found: headers.iter().map(str::to_string).collect(),
        });
    }
    if let Some(name) = REQUIRED_COLUMNS
        .iter()
        .find(|required| headers.iter().filter(|h| h == *required).count() > 1)
    {
        return Err(Error::DuplicateColumn {
            name: name.to_string(),
            found: headers.iter().map(str::to_string).collect(),
        });
    }
    rdr.set_headers(headers);

    rdr.deserialize::<Record>()
        .map(|row| row.map_err(malformed))
        .collect()
}

fn strip_bom(headers: &StringRecord) -> StringRecord {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| if i == 0 { h.trim_start_matches('\u{feff}') } else { h })
        .collect()
}

fn malformed(err: csv::Error) -> Error {
    match err.position() {
        Some(pos) => Error::MalformedRow {
            line: pos.line(),
            source: err,
        },
        None => Error::Csv(err),
    }
}
