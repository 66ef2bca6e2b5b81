//! Behavioral bias audit — one record per calendar day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Tri-state answer to a bias question. Unanswered questions are `None`
/// on the record itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BiasAnswer {
    Yes,
    No,
    Unsure,
}

/// Answers to the five fixed bias questions for one day, plus the 0–5
/// plan-adherence self-score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BiasAuditDay {
    pub date: NaiveDate,
    pub q1: Option<BiasAnswer>,
    pub q2: Option<BiasAnswer>,
    pub q3: Option<BiasAnswer>,
    pub q4: Option<BiasAnswer>,
    pub q5: Option<BiasAnswer>,
    pub plan_adherence_score: u8,
    /// True iff all five answers are non-null. Maintained by the store
    /// whenever an answer changes.
    pub completed: bool,
}

impl Default for BiasAuditDay {
    fn default() -> Self {
        Self::new(NaiveDate::default())
    }
}

impl BiasAuditDay {
    /// Fresh record for a day: no answers, score parked mid-scale.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            q1: None,
            q2: None,
            q3: None,
            q4: None,
            q5: None,
            plan_adherence_score: 3,
            completed: false,
        }
    }

    pub fn answers(&self) -> [Option<BiasAnswer>; 5] {
        [self.q1, self.q2, self.q3, self.q4, self.q5]
    }

    pub fn answered_count(&self) -> usize {
        self.answers().iter().filter(|a| a.is_some()).count()
    }

    /// Completion rule: every question answered, whatever the answers are.
    pub fn all_answered(&self) -> bool {
        self.answered_count() == 5
    }
}
