//! TradingSnapshot — the single persisted state document (aggregate root).
//!
//! Every sub-object carries serde defaults so a document written by an older
//! build backfills field by field on load. Unknown top-level keys are kept
//! in `extra` and round-trip untouched.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::bias::BiasAuditDay;
use super::checklist::ChecklistState;
use super::signal::{default_signals, Signal};
use super::trade::Trade;

/// Risk-alert banner toggles. Manually set; never derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertState {
    pub edis_due_today: bool,
    pub closeout_risk: bool,
    pub lock_in_supply_shock: bool,
    pub promoter_overhang: bool,
    pub margin_buffer_low: bool,
    pub volatility_regime: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkGroup {
    Official,
    Aggregator,
}

/// External reference link with a last-checked stamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickLink {
    pub id: String,
    pub label: String,
    pub url: String,
    pub group: LinkGroup,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<DateTime<Utc>>,
}

impl QuickLink {
    fn seed(id: &str, label: &str, url: &str, group: LinkGroup) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            url: url.into(),
            group,
            last_checked: None,
        }
    }
}

/// The fixed reference-link panel the dashboard ships with.
pub fn default_quick_links() -> Vec<QuickLink> {
    use LinkGroup::{Aggregator, Official};
    vec![
        QuickLink::seed("ql1", "SEBON IPO Approved", "https://www.sebon.gov.np/approved-issues", Official),
        QuickLink::seed("ql2", "CDSC Lock-in Notices", "https://www.cdsc.com.np/notices", Official),
        QuickLink::seed("ql3", "CDSC Settlement Procedure", "https://www.cdsc.com.np/settlement", Official),
        QuickLink::seed("ql4", "CDSC EDIS Directive", "https://www.cdsc.com.np/edis", Official),
        QuickLink::seed("ql5", "Merolagani Announcements", "https://merolagani.com/Announcements.aspx", Aggregator),
        QuickLink::seed("ql6", "Merolagani Quarterly Reports", "https://merolagani.com/FinancialAnalysis.aspx", Aggregator),
        QuickLink::seed("ql7", "Merolagani Top Turnovers", "https://merolagani.com/StockQuote.aspx", Aggregator),
        QuickLink::seed("ql8", "Sharesansar Share Listed", "https://www.sharesansar.com/category/share-listed", Aggregator),
        QuickLink::seed("ql9", "Sharesansar Dividend/Bonus/Rights", "https://www.sharesansar.com/category/dividend", Aggregator),
        QuickLink::seed("ql10", "Sharesansar Top Turnovers", "https://www.sharesansar.com/top-turnover", Aggregator),
    ]
}

/// Manually entered metric overrides for the weekly review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManualMetrics {
    pub plan_adherence_score: f64,
    pub edis_delay_days_avg: f64,
    pub closeout_incidents: u32,
    pub mistimed_corp_action_trades: u32,
    pub forced_sell_events: u32,
    pub rule_adherence_pct: f64,
    pub edis_errors_this_week: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Round-trip fee fraction (both legs combined).
    pub fee_percent: f64,
    /// Daily loss allowance in risk units.
    pub max_daily_loss_r: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fee_percent: 0.006,
            max_daily_loss_r: 2.0,
        }
    }
}

/// The aggregate root. One document, one writer, whole-document replace is
/// the only bulk mutation (import).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TradingSnapshot {
    pub account_equity: f64,
    pub signals: Vec<Signal>,
    pub checklist: ChecklistState,
    pub open_trades: Vec<Trade>,
    pub closed_trades: Vec<Trade>,
    pub alert_state: AlertState,
    /// One bias-audit record per NST calendar day.
    pub bias_audit: BTreeMap<NaiveDate, BiasAuditDay>,
    pub quick_links: Vec<QuickLink>,
    pub manual_metrics: ManualMetrics,
    pub settings: Settings,
    /// One-shot: the EDIS reminder modal was dismissed this session.
    pub edis_modal_dismissed: bool,
    pub weekly_review_visible: bool,
    /// Unknown top-level keys from older or newer documents, passed through.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for TradingSnapshot {
    fn default() -> Self {
        Self {
            account_equity: 0.0,
            signals: default_signals(),
            checklist: ChecklistState::default(),
            open_trades: Vec::new(),
            closed_trades: Vec::new(),
            alert_state: AlertState::default(),
            bias_audit: BTreeMap::new(),
            quick_links: default_quick_links(),
            manual_metrics: ManualMetrics::default(),
            settings: Settings::default(),
            edis_modal_dismissed: false,
            weekly_review_visible: false,
            extra: serde_json::Map::new(),
        }
    }
}

impl TradingSnapshot {
    /// Look up a trade id in either collection.
    pub fn contains_trade(&self, id: &str) -> bool {
        self.open_trades.iter().any(|t| t.id == id)
            || self.closed_trades.iter().any(|t| t.id == id)
    }

    /// Invariant check: no id appears in both collections.
    pub fn trade_sets_disjoint(&self) -> bool {
        self.open_trades
            .iter()
            .all(|o| !self.closed_trades.iter().any(|c| c.id == o.id))
    }
}
