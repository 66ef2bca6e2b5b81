//! TradingStore — the single in-process writer over the state document.
//!
//! All mutations go through this command API; nothing else writes fields.
//! After every command the document is persisted best-effort: a failed
//! write is swallowed and never blocks or fails the mutation (the next
//! successful save catches up).

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};

use nepsedesk_core::domain::{
    AlertState, BiasAnswer, BiasAuditDay, Settings, SignalEntry, SignalStatus, Trade, TradeStatus,
    TradingSnapshot,
};
use nepsedesk_core::nst::today_nst;
use nepsedesk_core::risk_gate::RiskGate;

use crate::persistence;

/// The seven checklist gate items, addressable by command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecklistItem {
    EdisCompleted,
    NoDeliveryCheck,
    MarginBuffer,
    MaxLossConfirmed,
    PositionCapsReviewed,
    PreDefinedPlan,
    BiasCheckCompleted,
}

/// Partial update for a signal tracker. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct SignalUpdate {
    pub status: Option<SignalStatus>,
    pub data: Option<Vec<SignalEntry>>,
}

/// Partial update for an open trade. Only the mutable-while-open fields are
/// reachable; entry fields stay fixed for the trade's lifetime.
#[derive(Debug, Clone, Default)]
pub struct TradeUpdate {
    pub current_price: Option<f64>,
    pub edis_flag: Option<bool>,
    pub notes: Option<String>,
}

/// Owns the snapshot and the persistence side effect.
#[derive(Debug)]
pub struct TradingStore {
    state: TradingSnapshot,
    persist_path: Option<PathBuf>,
}

impl TradingStore {
    /// Open against a state file: loads it (or defaults when missing or
    /// malformed) and persists there after every command.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = persistence::load(&path);
        Self {
            state,
            persist_path: Some(path),
        }
    }

    /// Store without a backing file; useful for tests and dry runs.
    pub fn in_memory() -> Self {
        Self {
            state: TradingSnapshot::default(),
            persist_path: None,
        }
    }

    pub fn with_state(state: TradingSnapshot) -> Self {
        Self {
            state,
            persist_path: None,
        }
    }

    /// The current snapshot. Read-side components take this by reference.
    pub fn state(&self) -> &TradingSnapshot {
        &self.state
    }

    /// Fire-and-forget persistence after a mutation.
    fn persist(&self) {
        if let Some(path) = &self.persist_path {
            let _ = persistence::save(path, &self.state);
        }
    }

    // ─── Commands ────────────────────────────────────────────────────

    pub fn set_account_equity(&mut self, equity: f64) {
        self.state.account_equity = equity.max(0.0);
        self.persist();
    }

    /// Apply a partial update to a signal tracker, stamping its
    /// last-updated time. Unknown ids are a no-op.
    pub fn update_signal(&mut self, id: &str, update: SignalUpdate, now: DateTime<Utc>) -> bool {
        let Some(signal) = self.state.signals.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        if let Some(status) = update.status {
            signal.status = status;
        }
        if let Some(data) = update.data {
            signal.data = data;
        }
        signal.last_updated = now.to_rfc3339();
        self.persist();
        true
    }

    pub fn set_checklist_item(&mut self, item: ChecklistItem, value: bool) {
        let c = &mut self.state.checklist;
        match item {
            ChecklistItem::EdisCompleted => c.edis_completed = value,
            ChecklistItem::NoDeliveryCheck => c.no_delivery_check = value,
            ChecklistItem::MarginBuffer => c.margin_buffer = value,
            ChecklistItem::MaxLossConfirmed => c.max_loss_confirmed = value,
            ChecklistItem::PositionCapsReviewed => c.position_caps_reviewed = value,
            ChecklistItem::PreDefinedPlan => c.pre_defined_plan = value,
            ChecklistItem::BiasCheckCompleted => c.bias_check_completed = value,
        }
        self.persist();
    }

    pub fn set_margin_buffer_pct(&mut self, pct: String) {
        self.state.checklist.margin_buffer_pct = pct;
        self.persist();
    }

    /// Add a trade to the open book. Rejected (no-op) when the id already
    /// exists in either collection, which keeps the sets disjoint.
    pub fn add_trade(&mut self, trade: Trade) -> bool {
        if self.state.contains_trade(&trade.id) {
            return false;
        }
        self.state.open_trades.push(trade);
        self.persist();
        true
    }

    /// Update the mutable fields of an open trade. Closed trades are
    /// immutable; unknown ids are a no-op.
    pub fn update_trade(&mut self, id: &str, update: TradeUpdate) -> bool {
        let Some(trade) = self.state.open_trades.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        if let Some(mark) = update.current_price {
            trade.current_price = Some(mark);
        }
        if let Some(flag) = update.edis_flag {
            trade.edis_flag = flag;
        }
        if let Some(notes) = update.notes {
            trade.notes = Some(notes);
        }
        self.persist();
        true
    }

    /// Atomically move a trade from open to closed, stamping the exit.
    /// Idempotent: closing an unknown or already-closed id is a no-op.
    pub fn close_trade(&mut self, id: &str, exit_price: f64, now: DateTime<Utc>) -> bool {
        let Some(index) = self.state.open_trades.iter().position(|t| t.id == id) else {
            return false;
        };
        let mut trade = self.state.open_trades.remove(index);
        trade.exit_price = Some(exit_price);
        trade.exit_date = Some(now);
        trade.status = TradeStatus::Closed;
        self.state.closed_trades.push(trade);
        self.persist();
        true
    }

    /// Remove an open trade. Closed trades are history and cannot be
    /// deleted through this command.
    pub fn delete_trade(&mut self, id: &str) -> bool {
        let before = self.state.open_trades.len();
        self.state.open_trades.retain(|t| t.id != id);
        let removed = self.state.open_trades.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    pub fn update_alert_state(&mut self, alerts: AlertState) {
        self.state.alert_state = alerts;
        self.persist();
    }

    /// Record one bias answer for a day, creating the day's record on first
    /// touch and maintaining its completion flag.
    pub fn set_bias_answer(&mut self, date: NaiveDate, question: u8, answer: Option<BiasAnswer>) {
        // Out-of-range question: skip before touching the map.
        if !(1..=5).contains(&question) {
            return;
        }
        let record = self
            .state
            .bias_audit
            .entry(date)
            .or_insert_with(|| BiasAuditDay::new(date));
        match question {
            1 => record.q1 = answer,
            2 => record.q2 = answer,
            3 => record.q3 = answer,
            4 => record.q4 = answer,
            _ => record.q5 = answer,
        }
        record.completed = record.all_answered();
        self.persist();
    }

    /// 0–5 plan-adherence self-score for a day.
    pub fn set_plan_adherence(&mut self, date: NaiveDate, score: u8) {
        let record = self
            .state
            .bias_audit
            .entry(date)
            .or_insert_with(|| BiasAuditDay::new(date));
        record.plan_adherence_score = score.min(5);
        self.persist();
    }

    pub fn touch_quick_link(&mut self, id: &str, now: DateTime<Utc>) -> bool {
        let Some(link) = self.state.quick_links.iter_mut().find(|l| l.id == id) else {
            return false;
        };
        link.last_checked = Some(now);
        self.persist();
        true
    }

    pub fn update_manual_metrics(
        &mut self,
        apply: impl FnOnce(&mut nepsedesk_core::domain::ManualMetrics),
    ) {
        apply(&mut self.state.manual_metrics);
        self.persist();
    }

    pub fn update_settings(&mut self, settings: Settings) {
        self.state.settings = settings;
        self.persist();
    }

    pub fn dismiss_edis_modal(&mut self) {
        self.state.edis_modal_dismissed = true;
        self.persist();
    }

    pub fn set_weekly_review_visible(&mut self, visible: bool) {
        self.state.weekly_review_visible = visible;
        self.persist();
    }

    /// Whole-document replace (import). The only supported bulk mutation.
    pub fn replace(&mut self, snapshot: TradingSnapshot) {
        self.state = snapshot;
        self.persist();
    }

    // ─── Derived reads ───────────────────────────────────────────────

    /// Today's bias-audit record, if the day has been touched.
    pub fn today_bias_audit(&self, now: DateTime<Utc>) -> Option<&BiasAuditDay> {
        self.state.bias_audit.get(&today_nst(now))
    }

    pub fn checklist_completion(&self) -> usize {
        self.state.checklist.completed_count()
    }

    /// Net realized P&L over trades exited today (NST).
    pub fn daily_pnl(&self, now: DateTime<Utc>) -> f64 {
        self.risk_gate(now).daily_pnl
    }

    pub fn risk_gate(&self, now: DateTime<Utc>) -> RiskGate {
        RiskGate::evaluate(&self.state, today_nst(now))
    }

    pub fn is_trade_ideas_locked(&self, now: DateTime<Utc>) -> bool {
        self.risk_gate(now).locked
    }
}
