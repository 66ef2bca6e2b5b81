//! Daily risk gate — derives the lock decision for trade-idea access.
//!
//! The gate is recomputed from the snapshot on every read and never stored:
//! trade ideas are locked while the morning checklist is incomplete or the
//! day's realized loss has hit the allowance.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Trade, TradingSnapshot};
use crate::metrics::trade_pnl;
use crate::nst::today_nst;

/// The gate's risk unit is fixed at 1% of equity, independent of whatever
/// risk fraction individual trades were sized with.
const GATE_RISK_FRACTION: f64 = 0.01;

/// Derived view of today's risk budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskGate {
    /// Net realized P&L over trades exited today (NST).
    pub daily_pnl: f64,
    /// NPR value of one risk unit: 1% of account equity.
    pub r_value: f64,
    /// Risk units still available today (allowance plus today's P&L in R).
    pub remaining_r: f64,
    pub daily_loss_hit: bool,
    pub checklist_complete: bool,
    /// Trade-idea creation is locked.
    pub locked: bool,
}

impl RiskGate {
    /// Evaluate the gate for a given NST calendar day.
    pub fn evaluate(snapshot: &TradingSnapshot, today: NaiveDate) -> Self {
        let fee = snapshot.settings.fee_percent;
        let daily_pnl: f64 = snapshot
            .closed_trades
            .iter()
            .filter(|t| exited_on(t, today))
            .map(|t| trade_pnl(t, fee))
            .sum();

        let r_value = snapshot.account_equity * GATE_RISK_FRACTION;
        let max_loss_r = snapshot.settings.max_daily_loss_r;

        let remaining_r = if r_value > 0.0 {
            max_loss_r + daily_pnl / r_value
        } else {
            max_loss_r
        };

        let daily_loss_hit = r_value > 0.0 && daily_pnl <= -(max_loss_r * r_value);
        let checklist_complete = snapshot.checklist.is_complete();

        Self {
            daily_pnl,
            r_value,
            remaining_r,
            daily_loss_hit,
            checklist_complete,
            locked: !checklist_complete || daily_loss_hit,
        }
    }
}

fn exited_on(trade: &Trade, today: NaiveDate) -> bool {
    trade
        .exit_date
        .map(|exit| today_nst(exit) == today)
        .unwrap_or(false)
}
