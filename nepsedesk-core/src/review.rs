//! Weekly review — aggregated weekly metrics and the rule-based
//! recommendation table.
//!
//! Each rule checks one metric against a fixed threshold independently; all
//! violated rules contribute, in a stable order. A clean week yields a
//! single "maintain course" recommendation.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::TradingSnapshot;
use crate::metrics::{avg_win_loss, max_drawdown, win_rate};

/// Metrics the review rules run over. Some come from trade history, some
/// from the manually maintained weekly counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyMetrics {
    pub hit_rate: f64,
    pub avg_win_loss: f64,
    pub max_drawdown: f64,
    pub max_drawdown_r: f64,
    pub rule_adherence_pct: f64,
    pub edis_errors: u32,
    pub chase_rate: f64,
    pub plan_adherence_avg: f64,
    pub best_playbook: String,
    pub best_playbook_r: f64,
    pub worst_playbook: String,
    pub worst_playbook_r: f64,
}

impl WeeklyMetrics {
    /// Assemble the week's metrics from the last seven days of closed
    /// trades plus the manual counters.
    pub fn from_snapshot(snapshot: &TradingSnapshot, now: DateTime<Utc>) -> Self {
        let week_ago = now - Duration::days(7);
        let week_trades: Vec<_> = snapshot
            .closed_trades
            .iter()
            .filter(|t| t.exit_date.map(|d| d >= week_ago).unwrap_or(false))
            .cloned()
            .collect();

        let hit_rate = win_rate(&week_trades);
        let awl = avg_win_loss(&week_trades);
        let dd = max_drawdown(&week_trades);
        let r_value = snapshot.account_equity * 0.01;
        let max_drawdown_r = if r_value > 0.0 { dd / r_value } else { 0.0 };

        // Best/worst playbook by pooled gross P&L over the group's first
        // R-value (the table's legacy convention).
        let mut best = ("—".to_string(), f64::NEG_INFINITY);
        let mut worst = ("—".to_string(), f64::INFINITY);
        let mut seen: Vec<&str> = Vec::new();
        for t in &week_trades {
            if t.exit_price.is_none() || seen.contains(&t.playbook.as_str()) {
                continue;
            }
            seen.push(&t.playbook);
            let group: Vec<_> = week_trades
                .iter()
                .filter(|g| g.playbook == t.playbook && g.exit_price.is_some())
                .collect();
            let first_r = group[0].r_value;
            let avg_r = if first_r > 0.0 {
                group.iter().map(|g| g.gross_pnl().unwrap_or(0.0)).sum::<f64>()
                    / group.len() as f64
                    / first_r
            } else {
                0.0
            };
            if avg_r > best.1 {
                best = (t.playbook.clone(), avg_r);
            }
            if avg_r < worst.1 {
                worst = (t.playbook.clone(), avg_r);
            }
        }

        let manual = &snapshot.manual_metrics;
        Self {
            hit_rate,
            avg_win_loss: awl,
            max_drawdown: dd,
            max_drawdown_r,
            rule_adherence_pct: manual.rule_adherence_pct,
            edis_errors: manual.edis_errors_this_week,
            chase_rate: manual.plan_adherence_score,
            plan_adherence_avg: manual.plan_adherence_score,
            best_playbook: short_label(&best.0),
            best_playbook_r: if best.1.is_finite() { best.1 } else { 0.0 },
            worst_playbook: short_label(&worst.0),
            worst_playbook_r: if worst.1.is_finite() { worst.1 } else { 0.0 },
        }
    }
}

/// First four words of a playbook label, for compact report rows.
fn short_label(name: &str) -> String {
    name.split_whitespace()
        .take(4)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run the rule table. Rules are independent; every violated rule emits its
/// remediation string, in declaration order.
pub fn generate_recommendations(metrics: &WeeklyMetrics) -> Vec<String> {
    let mut recs = Vec::new();

    if metrics.hit_rate < 40.0 {
        recs.push(
            "Win rate is below 40% threshold. Reduce to 1 trade/day and focus exclusively on \
             the highest-conviction playbook until win rate recovers above 50%."
                .to_string(),
        );
    }
    if metrics.chase_rate > 20.0 {
        recs.push(format!(
            "Chase rate is {:.1}% (target: <15%). Implement a mandatory 24-hour waiting rule \
             before entering any stock that has been up 3+ consecutive days.",
            metrics.chase_rate
        ));
    }
    if metrics.edis_errors > 0 {
        recs.push(format!(
            "{} EDIS error(s) recorded this week (target: 0). Enforce hard rule: no sell order \
             without confirming EDIS slot availability on the same day.",
            metrics.edis_errors
        ));
    }
    if metrics.plan_adherence_avg < 3.0 {
        recs.push(format!(
            "Plan adherence score is {:.1}/5 (target: ≥4). Switch to paper trading only next \
             week. Real capital requires rule discipline — no exceptions.",
            metrics.plan_adherence_avg
        ));
    }
    if metrics.rule_adherence_pct < 80.0 {
        recs.push(format!(
            "Rule adherence is {:.0}% (target: >80%). Review each deviation in the trade \
             journal and identify the specific rule that was broken.",
            metrics.rule_adherence_pct
        ));
    }
    if metrics.avg_win_loss < 1.5 && metrics.avg_win_loss > 0.0 {
        recs.push(format!(
            "Avg Win/Loss ratio is {:.2} (target: >1.5). Review exit rules — exits may be too \
             early on winners or too late on losers.",
            metrics.avg_win_loss
        ));
    }

    if recs.is_empty() {
        recs.push(
            "All key metrics are within target ranges. Maintain current approach. Consider \
             scaling R by 0.1% next week if win rate and plan adherence remain above targets \
             for 2 consecutive weeks."
                .to_string(),
        );
    }

    recs
}
