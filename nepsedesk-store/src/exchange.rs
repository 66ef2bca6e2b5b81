//! Manual export/import of the full state document.
//!
//! Export writes the document exactly as persisted (pretty JSON, camelCase
//! keys), named `nepse-dashboard-<NST date>.json`. Import is whole-document
//! replace through the same merge path as load: partial documents backfill
//! from defaults, and malformed JSON is rejected without touching state.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;

use nepsedesk_core::domain::TradingSnapshot;
use nepsedesk_core::nst;

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("failed to serialize state document: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write export file: {0}")]
    Io(#[from] std::io::Error),
}

/// Export file name for a given instant, dated by the NST calendar day.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("nepse-dashboard-{}.json", nst::today_nst(now))
}

/// Serialize the document for export (same shape as the persisted file).
pub fn export_json(state: &TradingSnapshot) -> Result<String, ExchangeError> {
    Ok(serde_json::to_string_pretty(state)?)
}

/// Write the export into `dir`, returning the full path written.
pub fn write_export(dir: &Path, state: &TradingSnapshot) -> Result<PathBuf, ExchangeError> {
    let path = dir.join(export_file_name(Utc::now()));
    std::fs::write(&path, export_json(state)?)?;
    Ok(path)
}

/// Parse an imported document. `None` means the input was not valid JSON
/// for a state document; the caller keeps its current state.
pub fn import_json(content: &str) -> Option<TradingSnapshot> {
    serde_json::from_str(content).ok()
}
