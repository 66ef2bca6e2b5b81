//! NepseDesk Store — the single mutable state document and everything
//! around it.
//!
//! This crate builds on `nepsedesk-core` to provide:
//! - `TradingStore`: one owned snapshot behind an explicit command API
//! - JSON persistence with per-field default backfill
//! - Manual export/import of the full document
//! - The fixed-period clock/market-status refresh task
//! - Lenient NPR numeric input parsing for UI text fields

pub mod exchange;
pub mod input;
pub mod persistence;
pub mod refresh;
pub mod store;

pub use exchange::{export_file_name, export_json, import_json, write_export, ExchangeError};
pub use input::parse_npr;
pub use refresh::{ClockReading, RefreshTask};
pub use store::{ChecklistItem, SignalUpdate, TradeUpdate, TradingStore};
