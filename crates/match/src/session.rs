//! Command pipeline for a live match.
//!
//! ```text
//! operation ─▶ MatchCommand ─▶ Match::handle ─▶ events ─▶ Match::apply
//!                                   │                         │
//!                                   └─ rejected: last_error   └─ history (EventEnvelope)
//! ```
//!
//! The session is the only place that reads the wall clock or mints ids; the
//! aggregate stays deterministic so a history can be replayed.

use std::collections::BTreeMap;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use matchday_core::{Aggregate, AggregateRoot, DomainError, EntryId};
use matchday_events::{Command, Event, EventEnvelope, verify_stream};
use matchday_roster::PlayerId;

use crate::game::{
    AddPeriod, EnterInterval, FinishMatch, Match, MatchCommand, MatchEvent, MatchId, PauseClock,
    RecordCard, RecordGoal, RecordOtherEvent, RemoveEvent, RemoveGoal, RemoveLastPeriod,
    RemoveSubstitution, ScheduleMatch, SetLineup, StartClock, Substitute, Tick,
};
use crate::types::{
    Attribution, EventKind, Fixture, LineupEntry, Participant, PeriodKind, RemovalConfirmation,
};

/// Stream type recorded on every envelope.
pub const AGGREGATE_TYPE: &str = "match";

/// A rejected operation, as shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ManagementError(String);

impl ManagementError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl From<DomainError> for ManagementError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg)
            | DomainError::InvariantViolation(msg)
            | DomainError::Conflict(msg) => Self(msg),
            DomainError::InvalidId(msg) => Self(format!("invalid identifier: {msg}")),
            DomainError::NotFound => Self("the match has not been scheduled".to_string()),
        }
    }
}

/// A match plus its event history.
#[derive(Debug, Clone)]
pub struct MatchSession {
    state: Match,
    history: Vec<EventEnvelope<MatchEvent>>,
    last_error: Option<ManagementError>,
}

impl MatchSession {
    pub fn new(id: MatchId) -> Self {
        Self {
            state: Match::empty(id),
            history: Vec::new(),
            last_error: None,
        }
    }

    /// Rebuild a session by replaying a stored history.
    ///
    /// The history must belong to `id` and be numbered 1, 2, 3, ...; an
    /// invalid history is refused before anything is applied.
    pub fn rehydrate(
        id: MatchId,
        history: Vec<EventEnvelope<MatchEvent>>,
    ) -> Result<Self, ManagementError> {
        verify_stream(id.0, &history)?;
        let mut state = Match::empty(id);
        for envelope in &history {
            state.apply(envelope.payload());
        }

        tracing::debug!(match_id = %id, events = history.len(), "match rehydrated");
        Ok(Self {
            state,
            history,
            last_error: None,
        })
    }

    pub fn state(&self) -> &Match {
        &self.state
    }

    pub fn id(&self) -> MatchId {
        *self.state.id()
    }

    pub fn history(&self) -> &[EventEnvelope<MatchEvent>] {
        &self.history
    }

    /// Message of the most recent rejection, cleared by the next accepted command.
    pub fn last_error(&self) -> Option<&ManagementError> {
        self.last_error.as_ref()
    }

    /// Handle a command and apply the resulting events.
    ///
    /// Returns the envelopes appended by this command (possibly none).
    pub fn execute(
        &mut self,
        command: MatchCommand,
    ) -> Result<&[EventEnvelope<MatchEvent>], ManagementError> {
        let match_id = self.id();
        let result = if command.target_aggregate_id() != match_id.0 {
            Err(ManagementError::new("command targets another match"))
        } else {
            self.state.handle(&command).map_err(ManagementError::from)
        };

        let events = match result {
            Ok(events) => events,
            Err(err) => {
                tracing::warn!(
                    match_id = %match_id,
                    command = command.name(),
                    error = %err,
                    "command rejected"
                );
                self.last_error = Some(err.clone());
                return Err(err);
            }
        };

        let first_new = self.history.len();
        for event in events {
            self.state.apply(&event);
            let sequence_number = self.history.len() as u64 + 1;
            tracing::trace!(
                match_id = %match_id,
                event_type = event.event_type(),
                sequence_number,
                "event applied"
            );
            self.history.push(EventEnvelope::new(
                Uuid::now_v7(),
                match_id.0,
                AGGREGATE_TYPE,
                sequence_number,
                event,
            ));
        }
        self.last_error = None;

        let appended = &self.history[first_new..];
        if !matches!(command, MatchCommand::Tick(_)) {
            tracing::info!(
                match_id = %match_id,
                command = command.name(),
                events = appended.len(),
                version = self.state.version(),
                "command accepted"
            );
        }
        Ok(appended)
    }

    fn run(&mut self, command: MatchCommand) -> Result<(), ManagementError> {
        self.execute(command).map(|_| ())
    }

    pub fn schedule(&mut self, fixture: Fixture) -> Result<(), ManagementError> {
        self.run(MatchCommand::ScheduleMatch(ScheduleMatch {
            match_id: self.id(),
            fixture,
            occurred_at: Utc::now(),
        }))
    }

    pub fn set_lineup(
        &mut self,
        lineup: Vec<LineupEntry>,
        bench: Vec<PlayerId>,
        opponent_lineup: Vec<u32>,
        jersey_numbers: BTreeMap<PlayerId, u32>,
    ) -> Result<(), ManagementError> {
        self.run(MatchCommand::SetLineup(SetLineup {
            match_id: self.id(),
            lineup,
            bench,
            opponent_lineup,
            jersey_numbers,
            occurred_at: Utc::now(),
        }))
    }

    pub fn start(&mut self) -> Result<(), ManagementError> {
        self.run(MatchCommand::StartClock(StartClock {
            match_id: self.id(),
            occurred_at: Utc::now(),
        }))
    }

    pub fn pause(&mut self) -> Result<(), ManagementError> {
        self.run(MatchCommand::PauseClock(PauseClock {
            match_id: self.id(),
            occurred_at: Utc::now(),
        }))
    }

    pub fn enter_interval(&mut self) -> Result<(), ManagementError> {
        self.run(MatchCommand::EnterInterval(EnterInterval {
            match_id: self.id(),
            occurred_at: Utc::now(),
        }))
    }

    pub fn add_period(
        &mut self,
        kind: PeriodKind,
        label: Option<String>,
    ) -> Result<(), ManagementError> {
        self.run(MatchCommand::AddPeriod(AddPeriod {
            match_id: self.id(),
            kind,
            label,
            occurred_at: Utc::now(),
        }))
    }

    pub fn remove_last_period(
        &mut self,
        confirmation: RemovalConfirmation,
    ) -> Result<(), ManagementError> {
        self.run(MatchCommand::RemoveLastPeriod(RemoveLastPeriod {
            match_id: self.id(),
            confirmation,
            occurred_at: Utc::now(),
        }))
    }

    pub fn finish(&mut self) -> Result<(), ManagementError> {
        self.run(MatchCommand::FinishMatch(FinishMatch {
            match_id: self.id(),
            occurred_at: Utc::now(),
        }))
    }

    /// One second from the clock collaborator. Ignored unless running.
    pub fn tick(&mut self) -> Result<(), ManagementError> {
        self.run(MatchCommand::Tick(Tick {
            match_id: self.id(),
            occurred_at: Utc::now(),
        }))
    }

    /// Deliver `seconds` ticks; returns how many were counted.
    pub fn advance(&mut self, seconds: u32) -> Result<u32, ManagementError> {
        let mut counted = 0;
        for _ in 0..seconds {
            if !self.execute(MatchCommand::Tick(Tick {
                match_id: self.id(),
                occurred_at: Utc::now(),
            }))?
            .is_empty()
            {
                counted += 1;
            }
        }
        Ok(counted)
    }

    pub fn record_goal(
        &mut self,
        attribution: Attribution,
        scorer: Option<Participant>,
        description: Option<String>,
    ) -> Result<EntryId, ManagementError> {
        let entry_id = EntryId::new();
        self.run(MatchCommand::RecordGoal(RecordGoal {
            match_id: self.id(),
            entry_id,
            attribution,
            scorer,
            description,
            occurred_at: Utc::now(),
        }))?;
        Ok(entry_id)
    }

    pub fn remove_goal(&mut self, attribution: Attribution) -> Result<(), ManagementError> {
        self.run(MatchCommand::RemoveGoal(RemoveGoal {
            match_id: self.id(),
            attribution,
            occurred_at: Utc::now(),
        }))
    }

    pub fn record_card(
        &mut self,
        kind: EventKind,
        target: Option<Participant>,
        description: Option<String>,
    ) -> Result<EntryId, ManagementError> {
        let entry_id = EntryId::new();
        self.run(MatchCommand::RecordCard(RecordCard {
            match_id: self.id(),
            entry_id,
            kind,
            target,
            description,
            occurred_at: Utc::now(),
        }))?;
        Ok(entry_id)
    }

    pub fn record_other_event(
        &mut self,
        kind: EventKind,
        attribution: Option<Attribution>,
        description: impl Into<String>,
    ) -> Result<EntryId, ManagementError> {
        let entry_id = EntryId::new();
        self.run(MatchCommand::RecordOtherEvent(RecordOtherEvent {
            match_id: self.id(),
            entry_id,
            kind,
            attribution,
            description: description.into(),
            occurred_at: Utc::now(),
        }))?;
        Ok(entry_id)
    }

    pub fn remove_event(&mut self, entry_id: EntryId) -> Result<(), ManagementError> {
        self.run(MatchCommand::RemoveEvent(RemoveEvent {
            match_id: self.id(),
            entry_id,
            occurred_at: Utc::now(),
        }))
    }

    pub fn substitute(
        &mut self,
        player_out: PlayerId,
        player_in: PlayerId,
        player_out_jersey: Option<u32>,
        player_in_jersey: Option<u32>,
    ) -> Result<EntryId, ManagementError> {
        let entry_id = EntryId::new();
        self.run(MatchCommand::Substitute(Substitute {
            match_id: self.id(),
            entry_id,
            player_out,
            player_in,
            player_out_jersey,
            player_in_jersey,
            occurred_at: Utc::now(),
        }))?;
        Ok(entry_id)
    }

    pub fn remove_substitution(&mut self, entry_id: EntryId) -> Result<(), ManagementError> {
        self.run(MatchCommand::RemoveSubstitution(RemoveSubstitution {
            match_id: self.id(),
            entry_id,
            occurred_at: Utc::now(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HomeAway;
    use chrono::NaiveDate;
    use matchday_core::AggregateId;

    fn fixture() -> Fixture {
        Fixture {
            opponent: "Polisportiva Lago".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
            time: None,
            location: None,
            field: None,
            home_away: HomeAway::Home,
        }
    }

    fn session() -> MatchSession {
        let mut s = MatchSession::new(MatchId::new(AggregateId::new()));
        s.schedule(fixture()).unwrap();
        s
    }

    #[test]
    fn history_is_numbered_from_one() {
        let mut s = session();
        s.start().unwrap();
        let numbers: Vec<u64> = s.history().iter().map(|e| e.sequence_number()).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(s.history().iter().all(|e| e.aggregate_type() == AGGREGATE_TYPE));
    }

    #[test]
    fn rejection_is_kept_until_next_success() {
        let mut s = session();
        let err = s.pause().unwrap_err();
        assert_eq!(err.message(), "the clock is not running");
        assert_eq!(s.last_error(), Some(&err));
        assert_eq!(s.history().len(), 1);

        s.start().unwrap();
        assert!(s.last_error().is_none());
    }

    #[test]
    fn unscheduled_match_reports_friendly_error() {
        let mut s = MatchSession::new(MatchId::new(AggregateId::new()));
        let err = s.start().unwrap_err();
        assert_eq!(err.to_string(), "the match has not been scheduled");
    }

    #[test]
    fn commands_for_other_matches_are_refused() {
        let mut s = session();
        let other = MatchId::new(AggregateId::new());
        let err = s
            .execute(MatchCommand::StartClock(StartClock {
                match_id: other,
                occurred_at: Utc::now(),
            }))
            .unwrap_err();
        assert!(err.message().contains("another match"));
    }

    #[test]
    fn advance_counts_only_running_seconds() {
        let mut s = session();
        assert_eq!(s.advance(5).unwrap(), 0);
        s.start().unwrap();
        assert_eq!(s.advance(90).unwrap(), 90);
        s.pause().unwrap();
        assert_eq!(s.advance(10).unwrap(), 0);
        assert_eq!(s.state().current_time().to_string(), "1:30");
    }

    #[test]
    fn rehydrate_rebuilds_identical_state() {
        let mut s = session();
        s.start().unwrap();
        s.advance(42).unwrap();
        s.record_goal(
            Attribution::Opponent,
            Some(Participant::Opponent { jersey: None }),
            None,
        )
        .unwrap();

        let copy = MatchSession::rehydrate(s.id(), s.history().to_vec()).unwrap();
        assert_eq!(copy.state(), s.state());
        assert_eq!(copy.state().away_score(), 1);
    }

    #[test]
    fn rehydrate_rejects_gaps() {
        let mut s = session();
        s.start().unwrap();
        let mut history = s.history().to_vec();
        history.remove(1);
        assert!(MatchSession::rehydrate(s.id(), history).is_err());
    }

    #[test]
    fn history_round_trips_through_json() {
        let mut s = session();
        s.start().unwrap();
        s.record_other_event(EventKind::Injury, Some(Attribution::Own), "knee")
            .unwrap();

        let json = serde_json::to_string(s.history()).unwrap();
        let back: Vec<EventEnvelope<MatchEvent>> = serde_json::from_str(&json).unwrap();
        let copy = MatchSession::rehydrate(s.id(), back).unwrap();
        assert_eq!(copy.state().events()[0].description, "knee");
    }
}
