//! Data-driven inputs for the negative login scenario.

use crate::errors::{E2eError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const DEFAULT_NEGATIVE_LOGINS: &str = "data/negative_logins.csv";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegativeLoginCase {
    pub username: String,
    pub password: String,
    pub error_message: String,
}

pub fn load_negative_logins(path: impl AsRef<Path>) -> Result<Vec<NegativeLoginCase>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        E2eError::DataError(format!("cannot open {}: {}", path.display(), e))
    })?;
    negative_logins_from_reader(file)
}

/// Reads `username,password,error_message` rows. The first row is a header
/// and is skipped; columns are taken by position, empty fields are kept.
pub fn negative_logins_from_reader<R: Read>(reader: R) -> Result<Vec<NegativeLoginCase>> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut cases = Vec::new();
    for record in csv.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        if record.len() != 3 {
            return Err(E2eError::DataError(format!(
                "line {}: expected 3 columns, found {}",
                line,
                record.len()
            )));
        }
        cases.push(NegativeLoginCase {
            username: record[0].to_string(),
            password: record[1].to_string(),
            error_message: record[2].to_string(),
        });
    }
    Ok(cases)
}
