//! Portfolio allocation — open-position category weights vs. fixed targets.

use serde::{Deserialize, Serialize};

use crate::domain::{StrategyCategory, Trade};

/// Percentage points a category may run over target before a warning fires.
const REBALANCE_THRESHOLD: i64 = 10;

/// Category weights in whole percentage points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAllocation {
    pub event: i64,
    pub momentum: i64,
    pub intraday: i64,
}

/// The desk's fixed target mix: 50% event, 30% momentum, 20% intraday.
pub const TARGET_ALLOCATION: CategoryAllocation = CategoryAllocation {
    event: 50,
    momentum: 30,
    intraday: 20,
};

impl CategoryAllocation {
    /// Weight open positions by entry notional. All zeros when nothing is
    /// open. Weights are rounded independently and may not sum to 100.
    pub fn from_open_trades(open_trades: &[Trade]) -> Self {
        let total: f64 = open_trades.iter().map(Trade::notional).sum();
        if total == 0.0 {
            return Self::default();
        }

        let weight = |category: StrategyCategory| -> i64 {
            let notional: f64 = open_trades
                .iter()
                .filter(|t| t.playbook_category == category)
                .map(Trade::notional)
                .sum();
            (notional / total * 100.0).round() as i64
        };

        Self {
            event: weight(StrategyCategory::Event),
            momentum: weight(StrategyCategory::Momentum),
            intraday: weight(StrategyCategory::Intraday),
        }
    }
}

/// One warning per category running more than 10 points over its target.
pub fn rebalancing_warnings(current: CategoryAllocation) -> Vec<String> {
    let mut warnings = Vec::new();

    if current.event > TARGET_ALLOCATION.event + REBALANCE_THRESHOLD {
        warnings.push(format!(
            "Overweight Event/Swing ({}%). Reduce event-driven trades until momentum setup appears.",
            current.event
        ));
    }
    if current.momentum > TARGET_ALLOCATION.momentum + REBALANCE_THRESHOLD {
        warnings.push(format!(
            "Overweight Momentum ({}%). Reduce momentum trades until next event-driven setup.",
            current.momentum
        ));
    }
    if current.intraday > TARGET_ALLOCATION.intraday + REBALANCE_THRESHOLD {
        warnings.push(format!(
            "Overweight Intraday ({}%). Reduce intraday trades; target allocation is {}%.",
            current.intraday, TARGET_ALLOCATION.intraday
        ));
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TradeStatus;
    use chrono::Utc;

    fn open_trade(category: StrategyCategory, entry: f64, size: u32) -> Trade {
        Trade {
            id: format!("{category:?}-{entry}-{size}"),
            ticker: "NABIL".into(),
            playbook: "pb".into(),
            playbook_category: category,
            entry_price: entry,
            stop_price: entry * 0.95,
            size,
            entry_date: Utc::now(),
            current_price: None,
            exit_price: None,
            exit_date: None,
            status: TradeStatus::Open,
            edis_flag: false,
            notes: None,
            r_value: 1_000.0,
        }
    }

    #[test]
    fn empty_book_is_all_zero() {
        let alloc = CategoryAllocation::from_open_trades(&[]);
        assert_eq!(alloc, CategoryAllocation::default());
        assert!(rebalancing_warnings(alloc).is_empty());
    }

    #[test]
    fn weights_round_to_whole_percents() {
        let trades = vec![
            open_trade(StrategyCategory::Event, 100.0, 500),    // 50,000
            open_trade(StrategyCategory::Momentum, 100.0, 300), // 30,000
            open_trade(StrategyCategory::Intraday, 100.0, 200), // 20,000
        ];
        let alloc = CategoryAllocation::from_open_trades(&trades);
        assert_eq!(alloc, TARGET_ALLOCATION);
        assert!(rebalancing_warnings(alloc).is_empty());
    }

    #[test]
    fn single_category_book_is_100_percent() {
        let trades = vec![open_trade(StrategyCategory::Momentum, 250.0, 40)];
        let alloc = CategoryAllocation::from_open_trades(&trades);
        assert_eq!(alloc.momentum, 100);
        assert_eq!(alloc.event, 0);
        assert_eq!(alloc.intraday, 0);

        let warnings = rebalancing_warnings(alloc);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Overweight Momentum (100%)"));
    }

    #[test]
    fn warning_fires_only_past_threshold() {
        // Event at exactly target + 10 (60%) stays quiet; 61% fires.
        assert!(rebalancing_warnings(CategoryAllocation {
            event: 60,
            momentum: 25,
            intraday: 15,
        })
        .is_empty());

        let warnings = rebalancing_warnings(CategoryAllocation {
            event: 61,
            momentum: 24,
            intraday: 15,
        });
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Event/Swing (61%)"));
    }

    #[test]
    fn multiple_warnings_are_order_stable() {
        let warnings = rebalancing_warnings(CategoryAllocation {
            event: 65,
            momentum: 45,
            intraday: 35,
        });
        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].contains("Event/Swing"));
        assert!(warnings[1].contains("Momentum"));
        assert!(warnings[2].contains("Intraday"));
        assert!(warnings[2].contains("target allocation is 20%"));
    }
}
