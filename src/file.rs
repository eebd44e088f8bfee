//! Reading market snapshots from disk and writing generated output.

use std::fs::File;
use std::io;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{from_reader, to_writer_pretty};
use thiserror::Error;

use crate::domain::Round;
use crate::market::{IngestError, Snapshot};

#[derive(Debug, Error)]
pub enum FileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Ingest(#[from] IngestError),
}

/// Reads a JSON-encoded type from a given file `path`.
pub fn read_json<D: DeserializeOwned>(path: impl AsRef<Path>) -> Result<D, FileError> {
    let file = File::open(path)?;
    Ok(from_reader(io::BufReader::new(file))?)
}

/// JSON-encodes the `value` in pretty-printed form and writes it to a given `path`.
pub fn write_json(path: impl AsRef<Path>, value: &impl Serialize) -> Result<(), FileError> {
    let file = File::create(path)?;
    Ok(to_writer_pretty(file, value)?)
}

/// Reads a market [Snapshot] from `path` and ingests it.
pub fn read_round(path: impl AsRef<Path>) -> Result<Round, FileError> {
    let snapshot: Snapshot = read_json(path)?;
    Ok(Round::try_from(snapshot)?)
}
