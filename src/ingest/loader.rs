//! Shard CSV Loader
//!
//! Parses a shard file into [`AddressRecord`]s. The expected layout is a
//! header line followed by 11 comma-separated fields per row:
//!
//! `LON,LAT,NUMBER,STREET,UNIT,CITY,DISTRICT,REGION,POSTCODE,ID,HASH`
//!
//! Fields may be wrapped in double quotes; commas inside quotes do not
//! split. `DISTRICT`, `REGION` and `ID` are not retained. A row that cannot
//! be parsed (too few fields, bad coordinates, bad hex hash) is dropped and
//! counted; loading continues with the next row.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::types::AddressRecord;

const EXPECTED_FIELDS: usize = 11;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not open shard file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Streaming CSV parser with per-row error recovery.
///
/// Counters reset at the start of every [`parse`](CsvLoader::parse) call, so
/// a loader instance can be reused across files.
#[derive(Debug, Default)]
pub struct CsvLoader {
    success_count: usize,
    error_count: usize,
}

impl CsvLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows parsed successfully by the most recent `parse` call.
    pub fn success_count(&self) -> usize {
        self.success_count
    }

    /// Rows dropped by the most recent `parse` call.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Reads the whole shard file. The header line and empty lines are
    /// skipped silently; malformed rows are dropped and counted.
    pub fn parse(&mut self, path: &Path) -> Result<Vec<AddressRecord>, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        self.success_count = 0;
        self.error_count = 0;

        let mut records = Vec::new();
        let mut is_header = true;

        for line in BufReader::new(file).lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!("Unreadable line in {}: {}", path.display(), e);
                    self.error_count += 1;
                    continue;
                }
            };
            let line = line.trim_end_matches('\r');

            if is_header {
                is_header = false;
                continue;
            }

            if line.trim().is_empty() {
                continue;
            }

            match self.parse_record(line) {
                Some(record) => {
                    records.push(record);
                    self.success_count += 1;
                }
                None => self.error_count += 1,
            }
        }

        Ok(records)
    }

    /// Parses one data row. Returns `None` (after logging why) when the row
    /// violates the per-line contract.
    fn parse_record(&self, line: &str) -> Option<AddressRecord> {
        let fields = split_csv_line(line);

        if fields.len() < EXPECTED_FIELDS {
            tracing::warn!(
                "Malformed record: expected {} fields, got {}",
                EXPECTED_FIELDS,
                fields.len()
            );
            return None;
        }

        let longitude: f64 = match fields[0].parse() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!("Malformed record: unparsable longitude {:?}", fields[0]);
                return None;
            }
        };
        let latitude: f64 = match fields[1].parse() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!("Malformed record: unparsable latitude {:?}", fields[1]);
                return None;
            }
        };

        if !coordinates_valid(longitude, latitude) {
            tracing::warn!(
                "Malformed record: coordinates out of range (lon={}, lat={})",
                longitude,
                latitude
            );
            return None;
        }

        // DISTRICT (6), REGION (7) and ID (9) are intentionally dropped.
        let number = fields[2].clone();
        let street = fields[3].clone();
        let unit = fields[4].clone();
        let city = fields[5].clone();
        let postcode = fields[8].clone();

        let hash = match u64::from_str_radix(fields[10].trim(), 16) {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!("Malformed record: unparsable hex hash {:?}", fields[10]);
                return None;
            }
        };

        // The loader keeps normalized == original; the data node rewrites
        // the searchable fields during index building.
        Some(AddressRecord {
            longitude,
            latitude,
            hash,
            number,
            original_street: street.clone(),
            original_unit: unit.clone(),
            original_city: city.clone(),
            street,
            unit,
            city,
            postcode,
        })
    }
}

fn coordinates_valid(lon: f64, lat: f64) -> bool {
    (-180.0..=180.0).contains(&lon) && (-90.0..=90.0).contains(&lat)
}

/// Splits a CSV line on commas, honoring double-quote wrapping: a quote
/// toggles the in-quotes state and commas inside quotes do not split.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
            }
            _ => field.push(c),
        }
    }
    fields.push(field);

    fields
}
