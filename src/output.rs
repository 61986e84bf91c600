//! Output formatting and persistence for reports and summary tables.
//!
//! Supports pretty-printing, JSON serialization, and CSV tables.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Debug;
use std::path::Path;
use tracing::{debug, info};

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes a value as pretty-printed JSON to `path`.
pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<()> {
    create_parent_dir(path)?;
    let body = serde_json::to_vec_pretty(value)?;
    std::fs::write(path, body).with_context(|| format!("writing '{path}'"))?;
    info!(path, "JSON written");
    Ok(())
}

/// Writes `rows` as a CSV table with a header line, replacing any existing file.
pub fn write_table<T: Serialize>(path: &str, rows: &[T]) -> Result<()> {
    create_parent_dir(path)?;
    debug!(path, rows = rows.len(), "Writing CSV table");

    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating '{path}'"))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(path, rows = rows.len(), "CSV table written");
    Ok(())
}

fn create_parent_dir(path: &str) -> Result<()> {
    if let Some(dir) = Path::new(path).parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("creating '{}'", dir.display()))?;
    }
    Ok(())
}
