//! Position sizing — risk budget plus liquidity cap → share count.
//!
//! # Formula
//! ```text
//! r_value          = equity * risk_percent
//! stop_distance    = entry - stop            (must be > 0 to size)
//! risk_shares      = floor(r_value / stop_distance)
//! liquidity_cap    = 0.10 * avg_daily_turnover_20d     (NPR)
//! cap_shares       = floor(liquidity_cap / entry)      (when turnover known)
//! effective_shares = min(risk_shares, cap_shares)
//! ```
//!
//! Invalid input never panics: an inverted stop sizes to zero, unknown
//! turnover skips the cap. The caller must refuse to commit a trade while
//! `zero_shares_error` is set.

use serde::{Deserialize, Serialize};

/// Fraction of 20-day average turnover a single position may consume.
const LIQUIDITY_CAP_FRACTION: f64 = 0.10;

/// Estimated exit horizon above which the position is flagged illiquid.
const DAYS_TO_EXIT_WARNING: f64 = 3.0;

pub const DEFAULT_FEE_PERCENT: f64 = 0.006;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizingInput {
    /// Account equity in NPR.
    pub account_equity: f64,
    /// Risk fraction per trade, e.g. 0.005 or 0.01.
    pub risk_percent: f64,
    pub entry_price: f64,
    pub stop_price: f64,
    /// 20-session average daily turnover in NPR; 0 means unknown.
    pub avg_daily_turnover_20d: f64,
    /// Round-trip fee fraction. `None` uses the NEPSE default of 0.6%.
    #[serde(default)]
    pub fee_percent: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizingOutput {
    /// Shares the risk budget alone allows.
    pub position_shares: u64,
    /// Notional of the risk-based share count.
    pub max_position_value: f64,
    /// NPR ceiling from the 10%-of-turnover rule.
    pub liquidity_cap_npr: f64,
    /// Share ceiling from the liquidity rule; 0 when turnover is unknown.
    pub liquidity_cap_shares: u64,
    /// Final share count after both constraints.
    pub effective_shares: u64,
    /// Notional of the effective share count.
    pub effective_value: f64,
    /// Price move (percent) needed to cover round-trip fees.
    pub breakeven_pct: f64,
    /// NPR value of one risk unit for this trade.
    pub r_value: f64,
    /// Sessions needed to exit at full participation in average turnover.
    pub days_to_exit: f64,
    pub liquidity_warning: bool,
    pub zero_shares_error: bool,
}

/// Size a long position. Pure and total: every input produces an output,
/// never a negative share count, never a division by zero.
pub fn calculate_position_sizing(input: SizingInput) -> SizingOutput {
    let fee_percent = input.fee_percent.unwrap_or(DEFAULT_FEE_PERCENT);

    let r_value = input.account_equity * input.risk_percent;
    let stop_distance = input.entry_price - input.stop_price;

    let position_shares = if stop_distance > 0.0 {
        (r_value / stop_distance).floor().max(0.0) as u64
    } else {
        0
    };

    let liquidity_cap_npr = input.avg_daily_turnover_20d * LIQUIDITY_CAP_FRACTION;
    let liquidity_cap_shares = if input.avg_daily_turnover_20d > 0.0 && input.entry_price > 0.0 {
        (liquidity_cap_npr / input.entry_price).floor().max(0.0) as u64
    } else {
        0
    };

    let effective_shares = if input.avg_daily_turnover_20d > 0.0 {
        position_shares.min(liquidity_cap_shares)
    } else {
        position_shares
    };

    let max_position_value = position_shares as f64 * input.entry_price;
    let effective_value = effective_shares as f64 * input.entry_price;

    let breakeven_pct = fee_percent * 100.0;

    let days_to_exit = if input.avg_daily_turnover_20d > 0.0 {
        effective_value / input.avg_daily_turnover_20d
    } else {
        0.0
    };

    SizingOutput {
        position_shares,
        max_position_value,
        liquidity_cap_npr,
        liquidity_cap_shares,
        effective_shares,
        effective_value,
        breakeven_pct,
        r_value,
        days_to_exit,
        liquidity_warning: days_to_exit > DAYS_TO_EXIT_WARNING,
        zero_shares_error: effective_shares == 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_input() -> SizingInput {
        SizingInput {
            account_equity: 1_000_000.0,
            risk_percent: 0.01,
            entry_price: 500.0,
            stop_price: 480.0,
            avg_daily_turnover_20d: 0.0,
            fee_percent: None,
        }
    }

    #[test]
    fn risk_based_sizing_without_liquidity_data() {
        let out = calculate_position_sizing(base_input());
        assert_eq!(out.r_value, 10_000.0);
        assert_eq!(out.position_shares, 500); // 10,000 / 20
        assert_eq!(out.effective_shares, 500);
        assert_eq!(out.max_position_value, 250_000.0);
        assert!((out.breakeven_pct - 0.6).abs() < 1e-10);
        assert_eq!(out.days_to_exit, 0.0);
        assert!(!out.liquidity_warning);
        assert!(!out.zero_shares_error);
    }

    #[test]
    fn liquidity_cap_binds() {
        let input = SizingInput {
            avg_daily_turnover_20d: 100_000.0,
            ..base_input()
        };
        let out = calculate_position_sizing(input);
        assert_eq!(out.liquidity_cap_npr, 10_000.0);
        assert_eq!(out.liquidity_cap_shares, 20); // floor(10,000 / 500)
        assert_eq!(out.effective_shares, 20); // min(500, 20)
        assert!((out.days_to_exit - 0.1).abs() < 1e-10); // 10,000 / 100,000
        assert!(!out.liquidity_warning);
    }

    #[test]
    fn inverted_stop_sizes_to_zero() {
        let input = SizingInput {
            stop_price: 520.0,
            ..base_input()
        };
        let out = calculate_position_sizing(input);
        assert_eq!(out.position_shares, 0);
        assert_eq!(out.effective_shares, 0);
        assert!(out.zero_shares_error);
    }

    #[test]
    fn stop_at_entry_sizes_to_zero() {
        let input = SizingInput {
            stop_price: 500.0,
            ..base_input()
        };
        let out = calculate_position_sizing(input);
        assert_eq!(out.effective_shares, 0);
        assert!(out.zero_shares_error);
    }

    #[test]
    fn cap_bounds_days_to_exit() {
        // With known turnover the cap keeps the effective value at or below
        // 10% of a session, so the exit estimate never exceeds 0.1 days and
        // the warning stays quiet.
        let input = SizingInput {
            account_equity: 100_000_000.0,
            avg_daily_turnover_20d: 1_000_000.0,
            ..base_input()
        };
        let out = calculate_position_sizing(input);
        // r_value 1,000,000 → 50,000 risk shares; cap = 100,000/500 = 200 shares
        assert_eq!(out.effective_shares, 200);
        assert!((out.days_to_exit - 0.1).abs() < 1e-10);
        assert!(!out.liquidity_warning);

        // Unknown turnover: no cap, no exit estimate.
        let uncapped = calculate_position_sizing(SizingInput {
            avg_daily_turnover_20d: 0.0,
            ..input
        });
        assert_eq!(uncapped.effective_shares, 50_000);
        assert_eq!(uncapped.days_to_exit, 0.0);
    }

    #[test]
    fn zero_equity_sizes_to_zero() {
        let input = SizingInput {
            account_equity: 0.0,
            ..base_input()
        };
        let out = calculate_position_sizing(input);
        assert_eq!(out.r_value, 0.0);
        assert_eq!(out.effective_shares, 0);
        assert!(out.zero_shares_error);
    }

    #[test]
    fn custom_fee_changes_breakeven_only() {
        let input = SizingInput {
            fee_percent: Some(0.004),
            ..base_input()
        };
        let out = calculate_position_sizing(input);
        assert!((out.breakeven_pct - 0.4).abs() < 1e-10);
        assert_eq!(out.effective_shares, 500);
    }
}
