//! Loading the trip table from a local file or over HTTP.

use anyhow::{Context, Result, bail};
use flate2::read::GzDecoder;
use std::io::Read;
use tracing::{debug, info};

use crate::record::TripRecord;

/// Header names every trips CSV must carry.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "scheduled_time",
    "actual_time",
    "line_name",
    "company_nickname",
    "trip_direction",
];

/// Where a trips CSV comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Path(String),
    Url(String),
}

impl DataSource {
    /// `http://` and `https://` locations are fetched, anything else is
    /// read from disk.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            DataSource::Url(location.to_string())
        } else {
            DataSource::Path(location.to_string())
        }
    }

    pub fn location(&self) -> &str {
        match self {
            DataSource::Path(p) => p,
            DataSource::Url(u) => u,
        }
    }

    fn is_gzip(&self) -> bool {
        let location = self.location();
        let path = location.split(['?', '#']).next().unwrap_or(location);
        path.ends_with(".gz")
    }

    /// Raw bytes of the source, decompressed when it ends in `.gz`.
    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        let bytes = match self {
            DataSource::Path(p) => std::fs::read(p).with_context(|| format!("reading '{p}'"))?,
            DataSource::Url(u) => fetch_bytes(u)?,
        };
        debug!(bytes = bytes.len(), gzip = self.is_gzip(), "Source bytes read");

        if self.is_gzip() {
            let mut decoded = Vec::new();
            GzDecoder::new(bytes.as_slice())
                .read_to_end(&mut decoded)
                .with_context(|| format!("decompressing '{}'", self.location()))?;
            Ok(decoded)
        } else {
            Ok(bytes)
        }
    }
}

/// Fetches a URL with a blocking client and returns the body.
pub fn fetch_bytes(url: &str) -> Result<Vec<u8>> {
    let resp = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .with_context(|| format!("fetching '{url}'"))?;
    Ok(resp.bytes()?.to_vec())
}

/// Decodes trip rows from CSV bytes with a header line.
///
/// Columns are matched by name, so extra columns and any column order are
/// accepted. An empty `actual_time` cell marks an unperformed trip.
///
/// # Errors
///
/// Returns an error naming the missing columns when the header lacks any of
/// [`REQUIRED_COLUMNS`], and an error naming the record when a row holds an
/// unparseable timestamp or direction.
pub fn parse_trips(bytes: &[u8]) -> Result<Vec<TripRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = rdr.headers().context("reading CSV header")?;
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        bail!("trips CSV is missing required column(s): {}", missing.join(", "));
    }

    let mut rows = Vec::new();
    for (i, result) in rdr.deserialize().enumerate() {
        let record: TripRecord = result.with_context(|| format!("decoding trip record {}", i + 1))?;
        rows.push(record);
    }

    Ok(rows)
}

/// Reads and decodes every trip of `source`.
#[tracing::instrument(skip(source), fields(source = %source.location()))]
pub fn load_trips(source: &DataSource) -> Result<Vec<TripRecord>> {
    let bytes = source.read_bytes()?;
    let rows = parse_trips(&bytes)?;

    let performed = rows.iter().filter(|r| r.is_performed()).count();
    info!(
        rows = rows.len(),
        performed,
        unperformed = rows.len() - performed,
        "Trips loaded"
    );
    Ok(rows)
}
