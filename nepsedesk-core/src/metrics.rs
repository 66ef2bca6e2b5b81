//! Trade P&L and performance metrics — pure functions over a trade list.
//!
//! Every function treats an unset exit price as "not yet realized" and
//! excludes it from realized aggregates. Division-by-zero candidates (empty
//! winner/loser subsets, zero R-values, zero turnover) are defined as 0,
//! never NaN.
//!
//! P&L conventions, pinned by tests:
//! - win rate and avg win/loss classify on **gross** P&L
//! - max drawdown walks a **gross** cumulative curve
//! - the equity curve and per-playbook table use **net** P&L

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Trade;

/// Fallback R divisor for the equity curve when a trade carries no R-value:
/// half a percent of account equity.
const FALLBACK_RISK_FRACTION: f64 = 0.005;

/// Realized net P&L for one trade; 0 while the exit price is unset.
pub fn trade_pnl(trade: &Trade, fee_percent: f64) -> f64 {
    trade.net_pnl(fee_percent).unwrap_or(0.0)
}

/// Unrealized P&L against the user-entered mark; 0 without a mark.
pub fn current_pnl(trade: &Trade) -> f64 {
    trade.unrealized_pnl()
}

/// Percentage of exited trades with positive gross P&L. 0 when no trade
/// has exited.
pub fn win_rate(trades: &[Trade]) -> f64 {
    let closed: Vec<&Trade> = trades.iter().filter(|t| t.exit_price.is_some()).collect();
    if closed.is_empty() {
        return 0.0;
    }
    let wins = closed
        .iter()
        .filter(|t| t.gross_pnl().unwrap_or(0.0) > 0.0)
        .count();
    wins as f64 / closed.len() as f64 * 100.0
}

/// Mean holding period in calendar days over exited trades.
pub fn avg_holding_days(trades: &[Trade]) -> f64 {
    let days: Vec<f64> = trades.iter().filter_map(Trade::holding_days).collect();
    if days.is_empty() {
        return 0.0;
    }
    days.iter().sum::<f64>() / days.len() as f64
}

/// Mean net P&L per exited trade.
pub fn net_pnl_per_trade(trades: &[Trade], fee_percent: f64) -> f64 {
    let pnls: Vec<f64> = trades
        .iter()
        .filter_map(|t| t.net_pnl(fee_percent))
        .collect();
    if pnls.is_empty() {
        return 0.0;
    }
    pnls.iter().sum::<f64>() / pnls.len() as f64
}

/// `mean(gross wins) / |mean(gross losses)|`; 0 when either subset is empty.
pub fn avg_win_loss(trades: &[Trade]) -> f64 {
    let grosses: Vec<f64> = trades.iter().filter_map(Trade::gross_pnl).collect();
    let wins: Vec<f64> = grosses.iter().copied().filter(|p| *p > 0.0).collect();
    let losses: Vec<f64> = grosses.iter().copied().filter(|p| *p < 0.0).collect();
    if wins.is_empty() || losses.is_empty() {
        return 0.0;
    }
    let avg_win = wins.iter().sum::<f64>() / wins.len() as f64;
    let avg_loss = (losses.iter().sum::<f64>() / losses.len() as f64).abs();
    if avg_loss > 0.0 {
        avg_win / avg_loss
    } else {
        0.0
    }
}

/// Maximum peak-to-trough drop of the cumulative **gross** P&L curve,
/// walking exited trades in exit-time order. Positive NPR amount; 0 when
/// nothing has exited.
pub fn max_drawdown(trades: &[Trade]) -> f64 {
    let mut closed: Vec<&Trade> = trades
        .iter()
        .filter(|t| t.exit_date.is_some() && t.exit_price.is_some())
        .collect();
    closed.sort_by_key(|t| t.exit_date);

    let mut peak = 0.0_f64;
    let mut cum_pnl = 0.0_f64;
    let mut max_dd = 0.0_f64;
    for t in closed {
        cum_pnl += t.gross_pnl().unwrap_or(0.0);
        if cum_pnl > peak {
            peak = cum_pnl;
        }
        let dd = peak - cum_pnl;
        if dd > max_dd {
            max_dd = dd;
        }
    }
    max_dd
}

/// Total entry notional of the trades passed in (caller picks the subset).
pub fn portfolio_turnover(trades: &[Trade]) -> f64 {
    trades.iter().map(Trade::notional).sum()
}

/// P&L expressed in risk units; 0 when the R-value is 0.
pub fn r_multiple(pnl: f64, r_value: f64) -> f64 {
    if r_value == 0.0 {
        return 0.0;
    }
    pnl / r_value
}

/// Per-playbook performance row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybookPerformance {
    pub name: String,
    /// Exited trades in this playbook.
    pub trades: usize,
    pub win_rate: f64,
    /// Legacy metric: pooled net P&L divided by the group's *first* trade's
    /// R-value. Kept because the dashboard has always reported it this way.
    pub avg_r: f64,
    /// Per-trade weighted mean of net P&L / own R-value.
    pub avg_r_weighted: f64,
    pub best: f64,
    pub worst: f64,
}

/// Group trades by playbook label (first-seen order) and score each group.
pub fn playbook_performance(trades: &[Trade], fee_percent: f64) -> Vec<PlaybookPerformance> {
    let mut order: Vec<&str> = Vec::new();
    for t in trades {
        if !order.contains(&t.playbook.as_str()) {
            order.push(&t.playbook);
        }
    }

    order
        .into_iter()
        .map(|name| {
            let group: Vec<&Trade> = trades.iter().filter(|t| t.playbook == name).collect();
            let closed: Vec<&Trade> =
                group.iter().copied().filter(|t| t.exit_price.is_some()).collect();
            let pnls: Vec<f64> = closed.iter().map(|t| trade_pnl(t, fee_percent)).collect();

            let wins = pnls.iter().filter(|p| **p > 0.0).count();
            let win_rate = if closed.is_empty() {
                0.0
            } else {
                wins as f64 / closed.len() as f64 * 100.0
            };

            let avg_r = match closed.first() {
                Some(first) if first.r_value > 0.0 => {
                    pnls.iter().sum::<f64>() / closed.len() as f64 / first.r_value
                }
                _ => 0.0,
            };

            let avg_r_weighted = if closed.is_empty() {
                0.0
            } else {
                closed
                    .iter()
                    .zip(&pnls)
                    .map(|(t, pnl)| r_multiple(*pnl, t.r_value))
                    .sum::<f64>()
                    / closed.len() as f64
            };

            let best = pnls.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let worst = pnls.iter().copied().fold(f64::INFINITY, f64::min);

            PlaybookPerformance {
                name: name.to_string(),
                trades: closed.len(),
                win_rate,
                avg_r,
                avg_r_weighted,
                best: if pnls.is_empty() { 0.0 } else { best },
                worst: if pnls.is_empty() { 0.0 } else { worst },
            }
        })
        .collect()
}

/// One point of the realized equity curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityPoint {
    pub date: DateTime<Utc>,
    /// Cumulative net P&L through this exit.
    pub pnl: f64,
    /// Cumulative P&L in risk units (trade's own R, or 0.5% of equity).
    pub r_multiple: f64,
}

/// Running cumulative **net** P&L over exited trades, exit-time ascending.
pub fn equity_curve(trades: &[Trade], fee_percent: f64, account_equity: f64) -> Vec<EquityPoint> {
    let mut closed: Vec<&Trade> = trades
        .iter()
        .filter(|t| t.exit_date.is_some() && t.exit_price.is_some())
        .collect();
    closed.sort_by_key(|t| t.exit_date);

    let mut cum_pnl = 0.0;
    closed
        .into_iter()
        .map(|t| {
            cum_pnl += trade_pnl(t, fee_percent);
            let r_val = if t.r_value > 0.0 {
                t.r_value
            } else {
                account_equity * FALLBACK_RISK_FRACTION
            };
            EquityPoint {
                date: t.exit_date.expect("filtered on exit_date"),
                pnl: cum_pnl,
                r_multiple: r_multiple(cum_pnl, r_val),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{StrategyCategory, TradeStatus};
    use chrono::TimeZone;

    const FEE: f64 = 0.006;

    fn make_trade(id: &str, entry: f64, exit: Option<f64>, size: u32, exit_day: u32) -> Trade {
        Trade {
            id: id.into(),
            ticker: "NABIL".into(),
            playbook: "Book-close momentum".into(),
            playbook_category: StrategyCategory::Event,
            entry_price: entry,
            stop_price: entry * 0.95,
            size,
            entry_date: Utc.with_ymd_and_hms(2024, 6, 1, 5, 0, 0).unwrap(),
            current_price: None,
            exit_price: exit,
            exit_date: exit
                .map(|_| Utc.with_ymd_and_hms(2024, 6, exit_day, 9, 0, 0).unwrap()),
            status: if exit.is_some() {
                TradeStatus::Closed
            } else {
                TradeStatus::Open
            },
            edis_flag: false,
            notes: None,
            r_value: 10_000.0,
        }
    }

    // ── Trade P&L ──

    #[test]
    fn trade_pnl_scenario_from_fee_schedule() {
        // entry 100, exit 110, 1000 shares: gross 10,000; fees 630; net 9,370
        let t = make_trade("t1", 100.0, Some(110.0), 1000, 5);
        assert!((trade_pnl(&t, FEE) - 9_370.0).abs() < 1e-10);
    }

    #[test]
    fn open_trade_pnl_is_zero() {
        let t = make_trade("t1", 100.0, None, 1000, 5);
        assert_eq!(trade_pnl(&t, FEE), 0.0);
    }

    // ── Win rate ──

    #[test]
    fn win_rate_empty_is_zero() {
        assert_eq!(win_rate(&[]), 0.0);
    }

    #[test]
    fn win_rate_ignores_open_trades() {
        let trades = vec![
            make_trade("w", 100.0, Some(110.0), 100, 3),
            make_trade("l", 100.0, Some(90.0), 100, 4),
            make_trade("o", 100.0, None, 100, 5),
        ];
        assert!((win_rate(&trades) - 50.0).abs() < 1e-10);
    }

    #[test]
    fn win_rate_classifies_on_gross() {
        // Gross +100 but net negative after fees: still counted as a win.
        let trades = vec![make_trade("w", 100.0, Some(100.01), 100, 3)];
        assert!((win_rate(&trades) - 100.0).abs() < 1e-10);
    }

    // ── Holding days ──

    #[test]
    fn avg_holding_days_means_over_closed() {
        let trades = vec![
            make_trade("a", 100.0, Some(105.0), 10, 3), // 2 days
            make_trade("b", 100.0, Some(95.0), 10, 7),  // 6 days
            make_trade("c", 100.0, None, 10, 9),
        ];
        assert!((avg_holding_days(&trades) - 4.0).abs() < 1e-10);
    }

    // ── Net P&L per trade ──

    #[test]
    fn net_pnl_per_trade_empty_is_zero() {
        assert_eq!(net_pnl_per_trade(&[], FEE), 0.0);
    }

    #[test]
    fn net_pnl_per_trade_mean() {
        let trades = vec![
            make_trade("a", 100.0, Some(110.0), 1000, 3), // net 9,370
            make_trade("b", 100.0, Some(100.0), 1000, 4), // net -600 (fees only)
        ];
        let expected = (9_370.0 + (0.0 - 200.0 * 1000.0 * 0.003)) / 2.0;
        assert!((net_pnl_per_trade(&trades, FEE) - expected).abs() < 1e-10);
    }

    // ── Avg win / avg loss ──

    #[test]
    fn avg_win_loss_no_losers_is_zero() {
        let trades = vec![
            make_trade("a", 100.0, Some(110.0), 100, 3),
            make_trade("b", 100.0, Some(105.0), 100, 4),
        ];
        assert_eq!(avg_win_loss(&trades), 0.0);
    }

    #[test]
    fn avg_win_loss_no_winners_is_zero() {
        let trades = vec![make_trade("a", 100.0, Some(90.0), 100, 3)];
        assert_eq!(avg_win_loss(&trades), 0.0);
    }

    #[test]
    fn avg_win_loss_ratio() {
        let trades = vec![
            make_trade("w1", 100.0, Some(130.0), 100, 3), // +3,000
            make_trade("w2", 100.0, Some(110.0), 100, 4), // +1,000
            make_trade("l1", 100.0, Some(90.0), 100, 5),  // -1,000
        ];
        // avg win 2,000 / avg loss 1,000 = 2.0
        assert!((avg_win_loss(&trades) - 2.0).abs() < 1e-10);
    }

    // ── Max drawdown ──

    #[test]
    fn max_drawdown_empty_is_zero() {
        assert_eq!(max_drawdown(&[]), 0.0);
    }

    #[test]
    fn max_drawdown_walks_exit_order() {
        // Exits ordered by date: +5,000, -8,000, +2,000.
        // Curve: 5,000 → -3,000 → -1,000. Peak 5,000, trough -3,000 → dd 8,000.
        let trades = vec![
            make_trade("c", 100.0, Some(102.0), 1000, 9), // last exit, +2,000
            make_trade("a", 100.0, Some(105.0), 1000, 3), // first exit, +5,000
            make_trade("b", 100.0, Some(92.0), 1000, 6),  // middle exit, -8,000
        ];
        assert!((max_drawdown(&trades) - 8_000.0).abs() < 1e-10);
    }

    #[test]
    fn max_drawdown_uses_gross_not_net() {
        // One breakeven exit: gross 0, net -600. A gross curve never dips,
        // so drawdown must be exactly 0 even though net P&L is negative.
        let trades = vec![make_trade("a", 100.0, Some(100.0), 1000, 3)];
        assert_eq!(max_drawdown(&trades), 0.0);
    }

    #[test]
    fn max_drawdown_monotonic_wins_is_zero() {
        let trades = vec![
            make_trade("a", 100.0, Some(105.0), 100, 3),
            make_trade("b", 100.0, Some(110.0), 100, 5),
        ];
        assert_eq!(max_drawdown(&trades), 0.0);
    }

    // ── Turnover ──

    #[test]
    fn turnover_sums_entry_notional() {
        let trades = vec![
            make_trade("a", 100.0, Some(105.0), 100, 3), // 10,000
            make_trade("b", 200.0, None, 50, 5),         // 10,000
        ];
        assert!((portfolio_turnover(&trades) - 20_000.0).abs() < 1e-10);
    }

    // ── R-multiple ──

    #[test]
    fn r_multiple_zero_r_value_is_zero() {
        assert_eq!(r_multiple(5_000.0, 0.0), 0.0);
    }

    #[test]
    fn r_multiple_basic() {
        assert!((r_multiple(-25_000.0, 10_000.0) + 2.5).abs() < 1e-10);
    }

    // ── Playbook performance ──

    #[test]
    fn playbook_groups_preserve_first_seen_order() {
        let mut a = make_trade("a", 100.0, Some(110.0), 100, 3);
        a.playbook = "Alpha".into();
        let mut b = make_trade("b", 100.0, Some(90.0), 100, 4);
        b.playbook = "Beta".into();
        let mut a2 = make_trade("a2", 100.0, Some(120.0), 100, 5);
        a2.playbook = "Alpha".into();

        let rows = playbook_performance(&[a, b, a2], FEE);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Alpha");
        assert_eq!(rows[1].name, "Beta");
        assert_eq!(rows[0].trades, 2);
        assert!((rows[0].win_rate - 100.0).abs() < 1e-10);
    }

    #[test]
    fn playbook_legacy_avg_r_divides_by_first_r_value() {
        let mut a = make_trade("a", 100.0, Some(110.0), 1000, 3); // net 9,370
        a.r_value = 10_000.0;
        let mut b = make_trade("b", 100.0, Some(110.0), 1000, 4); // net 9,370
        b.r_value = 1_000.0; // different R, deliberately ignored by legacy metric

        let rows = playbook_performance(&[a, b], FEE);
        let row = &rows[0];
        // Legacy: pooled 18,740 / 2 trades / first R 10,000 = 0.937
        assert!((row.avg_r - 0.937).abs() < 1e-10);
        // Weighted: (9,370/10,000 + 9,370/1,000) / 2 = 5.1535
        assert!((row.avg_r_weighted - 5.1535).abs() < 1e-10);
    }

    #[test]
    fn playbook_best_worst_are_net() {
        let trades = vec![
            make_trade("a", 100.0, Some(110.0), 1000, 3), // net 9,370
            make_trade("b", 100.0, Some(90.0), 1000, 4),  // net -10,570
        ];
        let rows = playbook_performance(&trades, FEE);
        assert!((rows[0].best - 9_370.0).abs() < 1e-10);
        assert!((rows[0].worst + 10_570.0).abs() < 1e-10);
    }

    #[test]
    fn playbook_with_only_open_trades_scores_zero() {
        let trades = vec![make_trade("a", 100.0, None, 100, 3)];
        let rows = playbook_performance(&trades, FEE);
        assert_eq!(rows[0].trades, 0);
        assert_eq!(rows[0].avg_r, 0.0);
        assert_eq!(rows[0].best, 0.0);
        assert_eq!(rows[0].worst, 0.0);
    }

    // ── Equity curve ──

    #[test]
    fn equity_curve_empty() {
        assert!(equity_curve(&[], FEE, 1_000_000.0).is_empty());
    }

    #[test]
    fn equity_curve_is_cumulative_net_in_exit_order() {
        let trades = vec![
            make_trade("b", 100.0, Some(90.0), 1000, 6),  // net -10,570
            make_trade("a", 100.0, Some(110.0), 1000, 3), // net 9,370
        ];
        let curve = equity_curve(&trades, FEE, 1_000_000.0);
        assert_eq!(curve.len(), 2);
        assert!((curve[0].pnl - 9_370.0).abs() < 1e-10);
        assert!((curve[1].pnl + 1_200.0).abs() < 1e-10);
        assert!((curve[0].r_multiple - 0.937).abs() < 1e-10);
    }

    #[test]
    fn equity_curve_falls_back_to_half_percent_r() {
        let mut t = make_trade("a", 100.0, Some(110.0), 1000, 3);
        t.r_value = 0.0;
        let curve = equity_curve(&[t], FEE, 1_000_000.0);
        // fallback R = 5,000 → 9,370 / 5,000
        assert!((curve[0].r_multiple - 1.874).abs() < 1e-10);
    }
}
