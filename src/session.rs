use chrono::{DateTime, Utc};

use crate::model::{AnswerMap, Question};
use crate::timer;

/// Pure snapshot of the lifecycle, evaluated against a caller-supplied
/// `now` so expiry can be tested without waiting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionStatus {
    Idle,
    Active { remaining_secs: i64 },
    Submitted,
}

/// Per-session exam state: lifecycle flags, start timestamp, active variant
/// and the raw answer map. One instance per user context; answers never
/// leak across instances.
#[derive(Debug, Clone, Default)]
pub struct ExamSession {
    pub started: bool,
    pub submitted: bool,
    pub start_time: Option<DateTime<Utc>>,
    pub active_variant: u32,
    pub answers: AnswerMap,
    /// Set when the submit came from timer expiry rather than the user.
    pub auto_submitted: bool,
}

impl ExamSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start or restart a variant: stamps a fresh start time and destroys
    /// any in-progress answers, whichever variant they belonged to.
    pub fn start(&mut self, variant: u32, now: DateTime<Utc>) {
        self.started = true;
        self.submitted = false;
        self.auto_submitted = false;
        self.start_time = Some(now);
        self.active_variant = variant;
        self.answers.clear();
    }

    /// Submitted is terminal for the variant's answer set.
    pub fn submit(&mut self) {
        if self.started {
            self.submitted = true;
        }
    }

    /// Evaluate the lifecycle at `now`. An exhausted countdown reads as
    /// Submitted even before `tick` has materialized the flag.
    pub fn status(&self, now: DateTime<Utc>) -> SessionStatus {
        let Some(start) = self.start_time.filter(|_| self.started) else {
            return SessionStatus::Idle;
        };
        if self.submitted {
            return SessionStatus::Submitted;
        }
        let remaining = timer::remaining_secs(start, now);
        if remaining <= 0 {
            SessionStatus::Submitted
        } else {
            SessionStatus::Active {
                remaining_secs: remaining,
            }
        }
    }

    /// Convert expiry into an automatic submission. Called on every pass of
    /// the event loop; returns true when this call performed the submit.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        if !self.submitted && self.status(now) == SessionStatus::Submitted {
            self.submitted = true;
            self.auto_submitted = true;
            return true;
        }
        false
    }

    pub fn remaining_secs(&self, now: DateTime<Utc>) -> i64 {
        match self.start_time {
            Some(start) if self.started => timer::remaining_secs(start, now),
            _ => 0,
        }
    }

    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> i64 {
        match self.start_time {
            Some(start) if self.started => timer::elapsed_secs(start, now),
            _ => 0,
        }
    }

    /// Record a raw answer for the active variant. Refused before start and
    /// after submission; returns whether the value was stored.
    pub fn record_answer(&mut self, qnum: u32, value: String) -> bool {
        if !self.started || self.submitted {
            return false;
        }
        self.answers.insert((self.active_variant, qnum), value);
        true
    }

    pub fn answer(&self, qnum: u32) -> Option<&str> {
        self.answers
            .get(&(self.active_variant, qnum))
            .map(|s| s.as_str())
    }

    /// Non-empty answers for the given rows, for the progress display.
    pub fn answered_count(&self, rows: &[Question]) -> usize {
        rows.iter()
            .filter(|q| {
                self.answer(q.qnum)
                    .map(|a| !a.trim().is_empty())
                    .unwrap_or(false)
            })
            .count()
    }
}
