//! Loading the sales dataset from a local CSV file or an HTTP(S) URL.

use crate::domain::{Dataset, SalesRecord};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;

/// The automobile sales CSV the dashboard was built around.
pub const DEFAULT_SOURCE: &str = "https://cf-courses-data.s3.us.cloud-object-storage.appdomain.cloud/d51iMGfp_t0QpO30Lym-dw/automobile-sales.csv";

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to read csv header: {0}")]
    Header(#[from] csv::Error),
    #[error("missing required column: {0}")]
    MissingColumn(&'static str),
}

pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Load the dataset from `location`, a file path or URL.
pub fn load(location: &str) -> Result<Dataset, SourceError> {
    if is_remote(location) {
        log::info!("Fetching sales data from {}", location);
        let response = reqwest::blocking::get(location)
            .and_then(|r| r.error_for_status())
            .map_err(|source| SourceError::Fetch {
                url: location.to_string(),
                source,
            })?;
        read_csv(response)
    } else {
        log::info!("Reading sales data from {}", location);
        let file = File::open(location).map_err(|source| SourceError::Open {
            path: PathBuf::from(location),
            source,
        })?;
        read_csv(BufReader::new(file))
    }
}

/// Read sales records from CSV.
///
/// Rows that don't deserialize are skipped with a warning; only an unreadable
/// header or a missing required column fails the load.
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset, SourceError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for column in SalesRecord::csv_columns().iter().filter(|c| c.required) {
        if !headers.iter().any(|h| h == column.name) {
            return Err(SourceError::MissingColumn(column.name));
        }
    }

    let mut records = Vec::new();
    let mut skipped = 0;
    for (idx, result) in rdr.deserialize::<SalesRecord>().enumerate() {
        match result {
            Ok(record) => records.push(record),
            Err(err) => {
                skipped += 1;
                // +2: one for the header, one for 1-based line numbers
                log::warn!("Skipping row {}: {}", idx + 2, err);
            }
        }
    }

    log::info!("Read {} sales records ({} skipped)", records.len(), skipped);
    Ok(Dataset::new(records))
}
