//! Output formatting and persistence for dashboard summaries.
//!
//! Supports pretty-printing, JSON serialization to the log or to disk, and
//! CSV export of station rankings.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::types::RankedStation;
use std::fs;
use std::path::Path;

/// Logs a summary value using Rust's debug pretty-print format.
pub fn print_pretty<T: std::fmt::Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Logs a summary value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes a summary value as pretty-printed JSON, creating parent
/// directories as needed.
pub fn write_json<P: AsRef<Path>>(path: P, value: &impl Serialize) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, serde_json::to_vec_pretty(value)?)?;
    debug!(path = %path.display(), "JSON bundle written");

    Ok(())
}

/// Writes a station ranking as a CSV file with a header row.
pub fn rankings_to_csv(path: &str, rankings: &[RankedStation]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    for row in rankings {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}
