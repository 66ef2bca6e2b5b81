//! Trade — one position lifecycle record, entry → (optional) exit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Playbook category used for allocation targeting and attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyCategory {
    Event,
    Momentum,
    Intraday,
}

/// Lifecycle status. `Open → Closed` is the only modeled transition;
/// a closed trade is never re-opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeStatus {
    Open,
    Closed,
}

/// A single long equity position.
///
/// Entry fields are fixed at creation. `current_price`, `edis_flag`, and
/// `notes` stay editable while open; exit fields are stamped exactly once
/// when the trade closes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    /// Opaque caller-generated id (the UI derives these from timestamps).
    pub id: String,
    pub ticker: String,
    /// Playbook label the trade was taken under.
    pub playbook: String,
    pub playbook_category: StrategyCategory,
    pub entry_price: f64,
    pub stop_price: f64,
    /// Shares held. NEPSE equities trade in whole shares only.
    pub size: u32,
    pub entry_date: DateTime<Utc>,
    /// User-entered mark price, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_date: Option<DateTime<Utc>>,
    pub status: TradeStatus,
    /// T+1 delivery instruction still pending for this position.
    pub edis_flag: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// NPR value of one risk unit, fixed at trade creation.
    pub r_value: f64,
}

impl Trade {
    /// A trade is open iff its exit fields are unset.
    pub fn is_open(&self) -> bool {
        self.exit_price.is_none() && self.exit_date.is_none()
    }

    /// Entry notional: entry price × size.
    pub fn notional(&self) -> f64 {
        self.entry_price * f64::from(self.size)
    }

    /// Realized gross P&L. `None` while the exit price is unset.
    pub fn gross_pnl(&self) -> Option<f64> {
        self.exit_price
            .map(|exit| (exit - self.entry_price) * f64::from(self.size))
    }

    /// Realized net P&L after round-trip fees.
    ///
    /// Fees are charged on both legs, each at half the round-trip rate:
    /// `(entry + exit) × size × fee/2`. `None` while the exit price is unset.
    pub fn net_pnl(&self, fee_percent: f64) -> Option<f64> {
        self.exit_price.map(|exit| {
            let gross = (exit - self.entry_price) * f64::from(self.size);
            let fees = (self.entry_price + exit) * f64::from(self.size) * (fee_percent / 2.0);
            gross - fees
        })
    }

    /// Unrealized P&L against the user-entered mark. 0 when no mark is set.
    pub fn unrealized_pnl(&self) -> f64 {
        match self.current_price {
            Some(mark) => (mark - self.entry_price) * f64::from(self.size),
            None => 0.0,
        }
    }

    /// Calendar days held, rounded, floored at 0. `None` while open.
    pub fn holding_days(&self) -> Option<f64> {
        self.exit_date.map(|exit| {
            let days = (exit - self.entry_date).num_seconds() as f64 / 86_400.0;
            days.round().max(0.0)
        })
    }
}
