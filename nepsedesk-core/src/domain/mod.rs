//! Domain types for the discipline dashboard.
//!
//! All persisted types serialize with camelCase keys so the state document
//! matches the shape the dashboard has always exported.

pub mod bias;
pub mod checklist;
pub mod signal;
pub mod snapshot;
pub mod trade;

pub use bias::{BiasAnswer, BiasAuditDay};
pub use checklist::ChecklistState;
pub use signal::{default_signals, Signal, SignalCategory, SignalEntry, SignalStatus};
pub use snapshot::{
    default_quick_links, AlertState, LinkGroup, ManualMetrics, QuickLink, Settings,
    TradingSnapshot,
};
pub use trade::{StrategyCategory, Trade, TradeStatus};
