//! Period/timer state machine.
//!
//! The current period is carried by the state itself, so "running without a
//! period" or "finished but still counting" cannot be expressed.
//!
//! ```text
//! PreMatch ──start──▶ Running ◀──start── Paused
//!                       │  └────pause────▶  │
//!                       └──enter_interval──▶ Interval ──add_period──▶ Paused
//!   (any started state) ──finish──▶ Finished
//! ```

use serde::{Deserialize, Serialize};

use matchday_core::{DomainError, DomainResult};

use crate::types::PeriodKind;

/// Clock state of a match; `period` indexes into the match's periods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "kebab-case")]
pub enum ClockState {
    #[default]
    PreMatch,
    Running { period: usize },
    Paused { period: usize },
    Interval { period: usize },
    Finished,
}

/// Coarse lifecycle status derived from the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStatus {
    Scheduled,
    InProgress,
    Finished,
}

impl ClockState {
    pub fn current_period(&self) -> Option<usize> {
        match self {
            ClockState::Running { period }
            | ClockState::Paused { period }
            | ClockState::Interval { period } => Some(*period),
            ClockState::PreMatch | ClockState::Finished => None,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, ClockState::Running { .. })
    }

    pub fn has_started(&self) -> bool {
        !matches!(self, ClockState::PreMatch)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, ClockState::Finished)
    }

    pub fn is_interval(&self) -> bool {
        matches!(self, ClockState::Interval { .. })
    }

    pub fn status(&self) -> MatchStatus {
        match self {
            ClockState::PreMatch => MatchStatus::Scheduled,
            ClockState::Finished => MatchStatus::Finished,
            _ => MatchStatus::InProgress,
        }
    }

    pub fn phase_name(&self) -> &'static str {
        match self {
            ClockState::PreMatch => "pre-match",
            ClockState::Running { .. } => "running",
            ClockState::Paused { .. } => "paused",
            ClockState::Interval { .. } => "interval",
            ClockState::Finished => "finished",
        }
    }

    pub(crate) fn ensure_not_finished(&self) -> DomainResult<()> {
        if self.is_finished() {
            return Err(DomainError::invariant("the match is finished"));
        }
        Ok(())
    }

    pub(crate) fn ensure_started(&self) -> DomainResult<()> {
        if !self.has_started() {
            return Err(DomainError::invariant("the match has not started"));
        }
        Ok(())
    }

    pub(crate) fn ensure_not_interval(&self) -> DomainResult<()> {
        if self.is_interval() {
            return Err(DomainError::invariant("not allowed during the interval"));
        }
        Ok(())
    }

    /// Guard shared by every ledger append.
    pub(crate) fn ensure_accepts_entries(&self) -> DomainResult<()> {
        self.ensure_not_finished()?;
        self.ensure_started()?;
        self.ensure_not_interval()
    }

    /// State after a period of `kind` is appended at `index`.
    ///
    /// Intervals never count; a running clock carries over to a new playing
    /// period, anything else leaves the new period paused.
    pub(crate) fn with_new_period(self, index: usize, kind: PeriodKind) -> ClockState {
        match (self, kind) {
            (ClockState::Finished, _) => ClockState::Finished,
            (_, PeriodKind::Interval) => ClockState::Interval { period: index },
            (ClockState::Running { .. }, _) => ClockState::Running { period: index },
            _ => ClockState::Paused { period: index },
        }
    }

    /// State after the last period was dropped and `new_last` became current.
    pub(crate) fn after_last_period_removed(self, new_last: usize, kind: PeriodKind) -> ClockState {
        match (self, kind) {
            (ClockState::PreMatch, _) | (ClockState::Finished, _) => self,
            (_, PeriodKind::Interval) => ClockState::Interval { period: new_last },
            (ClockState::Running { .. }, _) => ClockState::Running { period: new_last },
            _ => ClockState::Paused { period: new_last },
        }
    }
}

/// Default label for the `ordinal`-th (1-based) period of a kind.
pub fn default_period_label(kind: PeriodKind, ordinal: usize) -> String {
    match kind {
        PeriodKind::Regular => format!("{} Half", ordinal_suffix(ordinal)),
        PeriodKind::Extra => format!("{} Extra Time", ordinal_suffix(ordinal)),
        PeriodKind::Interval => "Interval".to_string(),
    }
}

fn ordinal_suffix(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_phase() {
        assert_eq!(ClockState::PreMatch.status(), MatchStatus::Scheduled);
        assert_eq!(ClockState::Paused { period: 0 }.status(), MatchStatus::InProgress);
        assert_eq!(ClockState::Interval { period: 1 }.status(), MatchStatus::InProgress);
        assert_eq!(ClockState::Finished.status(), MatchStatus::Finished);
    }

    #[test]
    fn interval_period_never_runs() {
        let next = ClockState::Running { period: 0 }.with_new_period(1, PeriodKind::Interval);
        assert_eq!(next, ClockState::Interval { period: 1 });
        assert!(!next.is_running());
    }

    #[test]
    fn running_clock_carries_over_to_new_period() {
        let next = ClockState::Running { period: 0 }.with_new_period(1, PeriodKind::Extra);
        assert_eq!(next, ClockState::Running { period: 1 });
        let next = ClockState::Interval { period: 1 }.with_new_period(2, PeriodKind::Regular);
        assert_eq!(next, ClockState::Paused { period: 2 });
    }

    #[test]
    fn removal_lands_on_interval_when_previous_period_is_one() {
        let next = ClockState::Paused { period: 2 }.after_last_period_removed(1, PeriodKind::Interval);
        assert_eq!(next, ClockState::Interval { period: 1 });
    }

    #[test]
    fn entries_are_refused_outside_play() {
        assert!(ClockState::PreMatch.ensure_accepts_entries().is_err());
        assert!(ClockState::Interval { period: 1 }.ensure_accepts_entries().is_err());
        assert!(ClockState::Finished.ensure_accepts_entries().is_err());
        assert!(ClockState::Paused { period: 0 }.ensure_accepts_entries().is_ok());
        assert!(ClockState::Running { period: 0 }.ensure_accepts_entries().is_ok());
    }

    #[test]
    fn labels_use_english_ordinals() {
        assert_eq!(default_period_label(PeriodKind::Regular, 1), "1st Half");
        assert_eq!(default_period_label(PeriodKind::Regular, 2), "2nd Half");
        assert_eq!(default_period_label(PeriodKind::Extra, 3), "3rd Extra Time");
        assert_eq!(default_period_label(PeriodKind::Extra, 11), "11th Extra Time");
        assert_eq!(default_period_label(PeriodKind::Interval, 4), "Interval");
    }
}
