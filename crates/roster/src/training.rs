use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use matchday_core::{AggregateId, Entity};

use crate::player::PlayerId;

/// Training session identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrainingId(pub AggregateId);

impl TrainingId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

/// Attendance mark for one player at one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attendance {
    Present,
    Absent,
}

/// A training session and who attended it.
///
/// Players with no mark were not tracked for this session (shown as "N/A").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingSession {
    id: TrainingId,
    date: NaiveDate,
    attendance: BTreeMap<PlayerId, Attendance>,
}

impl TrainingSession {
    pub fn new(id: TrainingId, date: NaiveDate) -> Self {
        Self {
            id,
            date,
            attendance: BTreeMap::new(),
        }
    }

    pub fn id_typed(&self) -> TrainingId {
        self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Record (or overwrite) a player's attendance.
    pub fn mark(&mut self, player: PlayerId, attendance: Attendance) {
        self.attendance.insert(player, attendance);
    }

    pub fn attendance_of(&self, player: PlayerId) -> Option<Attendance> {
        self.attendance.get(&player).copied()
    }
}

impl Entity for TrainingSession {
    type Id = TrainingId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Per-player attendance totals across a set of sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    pub presences: u32,
    pub absences: u32,
}

impl AttendanceSummary {
    pub fn for_player(player: PlayerId, sessions: &[TrainingSession]) -> Self {
        sessions
            .iter()
            .filter_map(|s| s.attendance_of(player))
            .fold(Self::default(), |mut acc, mark| {
                match mark {
                    Attendance::Present => acc.presences += 1,
                    Attendance::Absent => acc.absences += 1,
                }
                acc
            })
    }

    /// Sessions in which the player was tracked at all.
    pub fn tracked(&self) -> u32 {
        self.presences + self.absences
    }

    /// Presence rate in percent (0 when the player was never tracked).
    pub fn percentage(&self) -> f64 {
        match self.tracked() {
            0 => 0.0,
            tracked => f64::from(self.presences) * 100.0 / f64::from(tracked),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(day: u32) -> TrainingSession {
        TrainingSession::new(
            TrainingId::new(AggregateId::new()),
            NaiveDate::from_ymd_opt(2024, 9, day).unwrap(),
        )
    }

    #[test]
    fn summary_ignores_untracked_sessions() {
        let player = PlayerId::new(AggregateId::new());
        let mut s1 = session(2);
        let mut s2 = session(4);
        let s3 = session(6);
        s1.mark(player, Attendance::Present);
        s2.mark(player, Attendance::Absent);

        let summary = AttendanceSummary::for_player(player, &[s1, s2, s3]);
        assert_eq!(summary.presences, 1);
        assert_eq!(summary.absences, 1);
        assert_eq!(summary.tracked(), 2);
        assert!((summary.percentage() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn never_tracked_is_zero_percent() {
        let summary = AttendanceSummary::default();
        assert_eq!(summary.percentage(), 0.0);
    }

    #[test]
    fn mark_overwrites_previous_value() {
        let player = PlayerId::new(AggregateId::new());
        let mut s = session(9);
        s.mark(player, Attendance::Absent);
        s.mark(player, Attendance::Present);
        assert_eq!(s.attendance_of(player), Some(Attendance::Present));
    }
}
