//! State document persistence — JSON load/save with default backfill.
//!
//! Loading never fails outward: a missing or corrupt file yields the
//! default document. Backfill is per field on every sub-object (the
//! snapshot's serde defaults), so documents written by older builds gain
//! new fields without losing anything they already carry. The same merge
//! path serves manual import (see `exchange`).

use std::path::Path;

use nepsedesk_core::domain::TradingSnapshot;

/// Load the state document. Missing or malformed files yield defaults.
pub fn load(path: &Path) -> TradingSnapshot {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => TradingSnapshot::default(),
    }
}

/// Save the state document as pretty JSON, creating parent directories.
pub fn save(path: &Path, state: &TradingSnapshot) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}
