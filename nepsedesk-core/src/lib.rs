//! NepseDesk Core — the trading-discipline engine.
//!
//! Pure computation only:
//! - Domain types (trades, signals, checklist, bias audit, snapshot)
//! - Position sizing under risk and liquidity constraints
//! - Trade P&L and performance metrics
//! - Daily risk gate (checklist + loss-limit lock)
//! - Portfolio category allocation vs. targets
//! - Weekly review recommendation rules
//! - Nepal Standard Time helpers
//!
//! Nothing in this crate reads the clock, touches the filesystem, or
//! mutates shared state. Every function is a pure function of its inputs;
//! callers pass `DateTime<Utc>` wherever "now" matters.

pub mod allocation;
pub mod domain;
pub mod metrics;
pub mod nst;
pub mod review;
pub mod risk_gate;
pub mod sizing;

pub use allocation::{rebalancing_warnings, CategoryAllocation, TARGET_ALLOCATION};
pub use domain::{
    AlertState, BiasAnswer, BiasAuditDay, ChecklistState, ManualMetrics, QuickLink, Settings,
    Signal, SignalCategory, SignalEntry, SignalStatus, StrategyCategory, Trade, TradeStatus,
    TradingSnapshot,
};
pub use metrics::{EquityPoint, PlaybookPerformance};
pub use review::{generate_recommendations, WeeklyMetrics};
pub use risk_gate::RiskGate;
pub use sizing::{calculate_position_sizing, SizingInput, SizingOutput};
