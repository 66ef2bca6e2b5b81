//! Signal trackers — the twelve fixed market-event trackers on the board.
//!
//! Trackers are configuration plus user-entered rows; the engine never
//! evaluates them against live data (there is no feed). They ride along in
//! the snapshot so the board survives restarts.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalStatus {
    Active,
    Watch,
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalCategory {
    Risk,
    Opportunity,
    Neutral,
}

/// One user-entered row under a tracker (ticker, date, quantity, notes —
/// all free text, all optional).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignalEntry {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    pub id: String,
    pub number: u32,
    pub name: String,
    pub description: String,
    pub status: SignalStatus,
    pub category: SignalCategory,
    #[serde(default)]
    pub data: Vec<SignalEntry>,
    /// RFC 3339 timestamp of the last manual update; empty when untouched.
    #[serde(default)]
    pub last_updated: String,
}

impl Signal {
    fn seed(
        id: &str,
        number: u32,
        name: &str,
        description: &str,
        status: SignalStatus,
        category: SignalCategory,
    ) -> Self {
        Self {
            id: id.into(),
            number,
            name: name.into(),
            description: description.into(),
            status,
            category,
            data: Vec::new(),
            last_updated: String::new(),
        }
    }
}

/// The fixed tracker catalog the dashboard ships with.
pub fn default_signals() -> Vec<Signal> {
    use SignalCategory::{Opportunity, Risk};
    use SignalStatus::{Clear, Watch};
    vec![
        Signal::seed("s1", 1, "SEBON Approval", "New IPO/Right/Debenture PDF posted in 24h", Clear, Opportunity),
        Signal::seed("s2", 2, "IPO Pipeline Update", "Pipeline PDF changed", Clear, Opportunity),
        Signal::seed("s3", 3, "New Listing", "Share Listed event on Sharesansar", Clear, Opportunity),
        Signal::seed("s4", 4, "Book-Close ≤7 Days", "Book closure or record date approaching", Clear, Opportunity),
        Signal::seed("s5", 5, "Price Adjustment", "Bonus/Rights price adjusted", Clear, Opportunity),
        Signal::seed("s6", 6, "Lock-in Supply Shock", "Expiry ≤14 days + qty ≥ 5× avg volume", Clear, Risk),
        Signal::seed("s7", 7, "Promoter Overhang", "Sale ≥ 500,000 shares or 0.5% of listed", Clear, Risk),
        Signal::seed("s8", 8, "Auction/Tender ≤7d", "Bid deadline approaching", Clear, Opportunity),
        Signal::seed("s9", 9, "Earnings Surprise", "Net profit change ≥ 50% vs prior period", Clear, Opportunity),
        Signal::seed("s10", 10, "EDIS Reminder", "Always-on: T+1 sell trades need EDIS", Watch, Risk),
        Signal::seed("s11", 11, "Momentum/Liquidity", "Ticker in top-10 turnover AND top-10 gainers", Clear, Opportunity),
        Signal::seed("s12", 12, "Volatility Regime", "Index move ≥2% or recent circuit halt", Clear, Risk),
    ]
}
