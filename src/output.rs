//! Output formatting and persistence for the derived views.
//!
//! Supports pretty-printing, JSON logging, and CSV export. Undefined means
//! are written as empty CSV cells.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::types::{GovernorateAggregate, TransportAvailability};
use csv::WriterBuilder;
use std::fs::File;
use std::path::Path;

/// Logs any view using Rust's debug pretty-print format.
pub fn print_pretty<T: std::fmt::Debug>(view: &T) {
    debug!("{:#?}", view);
}

/// Logs any view as pretty-printed JSON.
pub fn print_json<T: Serialize>(view: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(view)?);
    Ok(())
}

/// Writes rows to a CSV file at `path`, replacing it if present. Headers come
/// from the row type's field names.
pub fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    debug!(path = %path.display(), rows = rows.len(), "Writing CSV");

    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

pub fn write_governorates(path: &Path, rows: &[GovernorateAggregate]) -> Result<()> {
    write_rows(path, rows)
}

pub fn write_transport(path: &Path, table: &TransportAvailability) -> Result<()> {
    write_rows(path, &table.rows)
}
