//! Client records read from the bundled JSON dataset.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::domain::client::RawClientRecord;
use crate::repository::ClientReader;
use crate::repository::errors::{RepositoryError, RepositoryResult};

/// File-backed [`ClientReader`].
#[derive(Clone, Debug)]
pub struct JsonClientRepository {
    path: PathBuf,
}

impl JsonClientRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ClientReader for JsonClientRepository {
    fn list_client_records(&self) -> RepositoryResult<Vec<RawClientRecord>> {
        let contents = fs::read_to_string(&self.path).map_err(|err| {
            log::error!("Failed to read {}: {err}", self.path.display());
            RepositoryError::from(err)
        })?;
        parse_client_batch(&contents)
    }
}

/// Parses a dataset document.
///
/// Accepts `{"clients": [...]}` or a bare array. Entries that are not client
/// objects of the expected shape are skipped with a warning.
pub fn parse_client_batch(json: &str) -> RepositoryResult<Vec<RawClientRecord>> {
    let document: Value = serde_json::from_str(json)?;
    let entries = match document {
        Value::Array(entries) => entries,
        Value::Object(mut object) => match object.remove("clients") {
            Some(Value::Array(entries)) => entries,
            _ => {
                return Err(RepositoryError::Parse(
                    "expected a `clients` array".to_string(),
                ));
            }
        },
        _ => {
            return Err(RepositoryError::Parse(
                "expected an object or an array of clients".to_string(),
            ));
        }
    };

    let records = entries
        .into_iter()
        .enumerate()
        .filter_map(
            |(index, entry)| match serde_json::from_value::<RawClientRecord>(entry) {
                Ok(record) => Some(record),
                Err(err) => {
                    log::warn!("Skipping malformed client entry {index}: {err}");
                    None
                }
            },
        )
        .collect();

    Ok(records)
}
