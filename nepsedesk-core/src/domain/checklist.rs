//! Pre-trade operational checklist — seven gate items answered each morning.
//!
//! The flags carry no date key. They persist until manually toggled; the UI
//! asks about "today" but nothing clears them at day rollover. That behavior
//! is deliberate and pinned by test (see `flags_persist_until_toggled`).

use serde::{Deserialize, Serialize};

/// Completion flags for the seven fixed checklist items, plus the free-text
/// margin-buffer percentage the user records alongside item three.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChecklistState {
    pub edis_completed: bool,
    pub no_delivery_check: bool,
    pub margin_buffer: bool,
    pub margin_buffer_pct: String,
    pub max_loss_confirmed: bool,
    pub position_caps_reviewed: bool,
    pub pre_defined_plan: bool,
    pub bias_check_completed: bool,
}

impl ChecklistState {
    /// Count of affirmatively answered items (0–7). The margin-buffer text
    /// field is informational and does not count.
    pub fn completed_count(&self) -> usize {
        [
            self.edis_completed,
            self.no_delivery_check,
            self.margin_buffer,
            self.max_loss_confirmed,
            self.position_caps_reviewed,
            self.pre_defined_plan,
            self.bias_check_completed,
        ]
        .iter()
        .filter(|&&b| b)
        .count()
    }

    /// All seven items answered affirmatively.
    pub fn is_complete(&self) -> bool {
        self.completed_count() >= 7
    }
}
