//! Match aggregate: clock, periods, score and the two ledgers.
//!
//! Every operation is a command. `handle` validates it against the current
//! state and returns the events describing the change; `apply` folds those
//! events into state. Rejected commands leave the match untouched.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use matchday_core::{Aggregate, AggregateId, AggregateRoot, DomainError, DomainResult, EntryId};
use matchday_events::{Command, Event};
use matchday_roster::PlayerId;

use crate::clock::{ClockState, MatchStatus, default_period_label};
use crate::types::{
    Attribution, EventKind, Fixture, HomeAway, LineupEntry, MatchTime, Participant, Period,
    PeriodKind, RemovalConfirmation, Substitution, TimelineEvent,
};

/// Match identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(pub AggregateId);

impl MatchId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for MatchId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Aggregate
// ─────────────────────────────────────────────────────────────────────────────

/// Aggregate root: Match.
///
/// # Invariants
/// - `periods` is non-empty whenever the clock has left `PreMatch`.
/// - the clock's period index is always `periods.len() - 1`.
/// - scores only change through goals and goal removals and never underflow.
/// - ledger entry ids are unique across events and substitutions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    id: MatchId,
    fixture: Option<Fixture>,
    clock: ClockState,
    periods: Vec<Period>,
    home_score: u32,
    away_score: u32,
    lineup: Vec<LineupEntry>,
    bench: Vec<PlayerId>,
    opponent_lineup: Vec<u32>,
    jersey_numbers: BTreeMap<PlayerId, u32>,
    events: Vec<TimelineEvent>,
    substitutions: Vec<Substitution>,
    entries_recorded: u64,
    version: u64,
}

impl Match {
    /// Create an empty, not-yet-scheduled aggregate instance for rehydration.
    pub fn empty(id: MatchId) -> Self {
        Self {
            id,
            fixture: None,
            clock: ClockState::PreMatch,
            periods: Vec::new(),
            home_score: 0,
            away_score: 0,
            lineup: Vec::new(),
            bench: Vec::new(),
            opponent_lineup: Vec::new(),
            jersey_numbers: BTreeMap::new(),
            events: Vec::new(),
            substitutions: Vec::new(),
            entries_recorded: 0,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> MatchId {
        self.id
    }

    pub fn fixture(&self) -> Option<&Fixture> {
        self.fixture.as_ref()
    }

    pub fn is_scheduled(&self) -> bool {
        self.fixture.is_some()
    }

    pub fn clock(&self) -> ClockState {
        self.clock
    }

    pub fn status(&self) -> MatchStatus {
        self.clock.status()
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn current_period_index(&self) -> Option<usize> {
        self.clock.current_period()
    }

    pub fn current_period(&self) -> Option<&Period> {
        self.current_period_index().and_then(|i| self.periods.get(i))
    }

    pub fn home_score(&self) -> u32 {
        self.home_score
    }

    pub fn away_score(&self) -> u32 {
        self.away_score
    }

    /// Score of our team or of the opponent, resolved through home/away.
    pub fn score_of(&self, attribution: Attribution) -> u32 {
        match self.side_of(attribution) {
            HomeAway::Home => self.home_score,
            HomeAway::Away => self.away_score,
        }
    }

    pub fn lineup(&self) -> &[LineupEntry] {
        &self.lineup
    }

    pub fn bench(&self) -> &[PlayerId] {
        &self.bench
    }

    pub fn opponent_lineup(&self) -> &[u32] {
        &self.opponent_lineup
    }

    pub fn jersey_numbers(&self) -> &BTreeMap<PlayerId, u32> {
        &self.jersey_numbers
    }

    /// Event ledger in insertion order.
    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    /// Substitution ledger in insertion order.
    pub fn substitutions(&self) -> &[Substitution] {
        &self.substitutions
    }

    /// Elapsed time of the current period (zero before kick-off).
    pub fn current_time(&self) -> MatchTime {
        MatchTime::from_seconds(self.current_period().map_or(0, |p| p.duration))
    }

    fn side_of(&self, attribution: Attribution) -> HomeAway {
        let ours = self
            .fixture
            .as_ref()
            .map_or(HomeAway::Home, |f| f.home_away);
        match (attribution, ours) {
            (Attribution::Own, side) => side,
            (Attribution::Opponent, HomeAway::Home) => HomeAway::Away,
            (Attribution::Opponent, HomeAway::Away) => HomeAway::Home,
        }
    }
}

impl AggregateRoot for Match {
    type Id = MatchId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Command: ScheduleMatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleMatch {
    pub match_id: MatchId,
    pub fixture: Fixture,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SetLineup (pre-match only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetLineup {
    pub match_id: MatchId,
    pub lineup: Vec<LineupEntry>,
    pub bench: Vec<PlayerId>,
    pub opponent_lineup: Vec<u32>,
    /// Shirt numbers for squad members, bench players in particular.
    pub jersey_numbers: BTreeMap<PlayerId, u32>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: StartClock (kick-off or resume).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartClock {
    pub match_id: MatchId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: PauseClock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseClock {
    pub match_id: MatchId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: EnterInterval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnterInterval {
    pub match_id: MatchId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddPeriod (regular or extra time).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddPeriod {
    pub match_id: MatchId,
    pub kind: PeriodKind,
    pub label: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveLastPeriod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLastPeriod {
    pub match_id: MatchId,
    pub confirmation: RemovalConfirmation,
    pub occurred_at: DateTime<Utc>,
}

/// Command: FinishMatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishMatch {
    pub match_id: MatchId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: Tick (one elapsed second from the clock collaborator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    pub match_id: MatchId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordGoal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordGoal {
    pub match_id: MatchId,
    pub entry_id: EntryId,
    pub attribution: Attribution,
    pub scorer: Option<Participant>,
    pub description: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveGoal (score only; the ledger entry is removed separately).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveGoal {
    pub match_id: MatchId,
    pub attribution: Attribution,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordCard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCard {
    pub match_id: MatchId,
    pub entry_id: EntryId,
    pub kind: EventKind,
    pub target: Option<Participant>,
    pub description: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordOtherEvent (fouls, corners, injuries, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordOtherEvent {
    pub match_id: MatchId,
    pub entry_id: EntryId,
    pub kind: EventKind,
    pub attribution: Option<Attribution>,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveEvent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveEvent {
    pub match_id: MatchId,
    pub entry_id: EntryId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: Substitute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitute {
    pub match_id: MatchId,
    pub entry_id: EntryId,
    pub player_out: PlayerId,
    pub player_in: PlayerId,
    /// Shirt numbers chosen by the operator, if any.
    pub player_out_jersey: Option<u32>,
    pub player_in_jersey: Option<u32>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveSubstitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveSubstitution {
    pub match_id: MatchId,
    pub entry_id: EntryId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchCommand {
    ScheduleMatch(ScheduleMatch),
    SetLineup(SetLineup),
    StartClock(StartClock),
    PauseClock(PauseClock),
    EnterInterval(EnterInterval),
    AddPeriod(AddPeriod),
    RemoveLastPeriod(RemoveLastPeriod),
    FinishMatch(FinishMatch),
    Tick(Tick),
    RecordGoal(RecordGoal),
    RemoveGoal(RemoveGoal),
    RecordCard(RecordCard),
    RecordOtherEvent(RecordOtherEvent),
    RemoveEvent(RemoveEvent),
    Substitute(Substitute),
    RemoveSubstitution(RemoveSubstitution),
}

impl MatchCommand {
    pub fn match_id(&self) -> MatchId {
        match self {
            MatchCommand::ScheduleMatch(c) => c.match_id,
            MatchCommand::SetLineup(c) => c.match_id,
            MatchCommand::StartClock(c) => c.match_id,
            MatchCommand::PauseClock(c) => c.match_id,
            MatchCommand::EnterInterval(c) => c.match_id,
            MatchCommand::AddPeriod(c) => c.match_id,
            MatchCommand::RemoveLastPeriod(c) => c.match_id,
            MatchCommand::FinishMatch(c) => c.match_id,
            MatchCommand::Tick(c) => c.match_id,
            MatchCommand::RecordGoal(c) => c.match_id,
            MatchCommand::RemoveGoal(c) => c.match_id,
            MatchCommand::RecordCard(c) => c.match_id,
            MatchCommand::RecordOtherEvent(c) => c.match_id,
            MatchCommand::RemoveEvent(c) => c.match_id,
            MatchCommand::Substitute(c) => c.match_id,
            MatchCommand::RemoveSubstitution(c) => c.match_id,
        }
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            MatchCommand::ScheduleMatch(_) => "schedule_match",
            MatchCommand::SetLineup(_) => "set_lineup",
            MatchCommand::StartClock(_) => "start_clock",
            MatchCommand::PauseClock(_) => "pause_clock",
            MatchCommand::EnterInterval(_) => "enter_interval",
            MatchCommand::AddPeriod(_) => "add_period",
            MatchCommand::RemoveLastPeriod(_) => "remove_last_period",
            MatchCommand::FinishMatch(_) => "finish_match",
            MatchCommand::Tick(_) => "tick",
            MatchCommand::RecordGoal(_) => "record_goal",
            MatchCommand::RemoveGoal(_) => "remove_goal",
            MatchCommand::RecordCard(_) => "record_card",
            MatchCommand::RecordOtherEvent(_) => "record_other_event",
            MatchCommand::RemoveEvent(_) => "remove_event",
            MatchCommand::Substitute(_) => "substitute",
            MatchCommand::RemoveSubstitution(_) => "remove_substitution",
        }
    }
}

impl Command for MatchCommand {
    fn target_aggregate_id(&self) -> AggregateId {
        self.match_id().0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

/// Event: MatchScheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchScheduled {
    pub match_id: MatchId,
    pub fixture: Fixture,
    pub occurred_at: DateTime<Utc>,
}

/// Event: LineupSet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineupSet {
    pub match_id: MatchId,
    pub lineup: Vec<LineupEntry>,
    pub bench: Vec<PlayerId>,
    pub opponent_lineup: Vec<u32>,
    pub jersey_numbers: BTreeMap<PlayerId, u32>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PeriodAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodAdded {
    pub match_id: MatchId,
    pub period_index: usize,
    pub kind: PeriodKind,
    pub label: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PeriodRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRemoved {
    pub match_id: MatchId,
    pub period_index: usize,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ClockStarted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockStarted {
    pub match_id: MatchId,
    pub period_index: usize,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ClockPaused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockPaused {
    pub match_id: MatchId,
    pub period_index: usize,
    pub elapsed: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ClockTicked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockTicked {
    pub match_id: MatchId,
    pub period_index: usize,
    pub occurred_at: DateTime<Utc>,
}

/// Event: MatchFinished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFinished {
    pub match_id: MatchId,
    pub home_score: u32,
    pub away_score: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: GoalScored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalScored {
    pub match_id: MatchId,
    pub entry: TimelineEvent,
    pub occurred_at: DateTime<Utc>,
}

/// Event: GoalCancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalCancelled {
    pub match_id: MatchId,
    pub attribution: Attribution,
    pub occurred_at: DateTime<Utc>,
}

/// Event: IncidentRecorded (cards and other non-goal events).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentRecorded {
    pub match_id: MatchId,
    pub entry: TimelineEvent,
    pub occurred_at: DateTime<Utc>,
}

/// Event: EventRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRemoved {
    pub match_id: MatchId,
    pub entry_id: EntryId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: SubstitutionMade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionMade {
    pub match_id: MatchId,
    pub substitution: Substitution,
    pub occurred_at: DateTime<Utc>,
}

/// Event: SubstitutionRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionRemoved {
    pub match_id: MatchId,
    pub entry_id: EntryId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEvent {
    MatchScheduled(MatchScheduled),
    LineupSet(LineupSet),
    PeriodAdded(PeriodAdded),
    PeriodRemoved(PeriodRemoved),
    ClockStarted(ClockStarted),
    ClockPaused(ClockPaused),
    ClockTicked(ClockTicked),
    MatchFinished(MatchFinished),
    GoalScored(GoalScored),
    GoalCancelled(GoalCancelled),
    IncidentRecorded(IncidentRecorded),
    EventRemoved(EventRemoved),
    SubstitutionMade(SubstitutionMade),
    SubstitutionRemoved(SubstitutionRemoved),
}

impl Event for MatchEvent {
    fn event_type(&self) -> &'static str {
        match self {
            MatchEvent::MatchScheduled(_) => "match.scheduled",
            MatchEvent::LineupSet(_) => "match.lineup_set",
            MatchEvent::PeriodAdded(_) => "match.period_added",
            MatchEvent::PeriodRemoved(_) => "match.period_removed",
            MatchEvent::ClockStarted(_) => "match.clock_started",
            MatchEvent::ClockPaused(_) => "match.clock_paused",
            MatchEvent::ClockTicked(_) => "match.clock_ticked",
            MatchEvent::MatchFinished(_) => "match.finished",
            MatchEvent::GoalScored(_) => "match.goal_scored",
            MatchEvent::GoalCancelled(_) => "match.goal_cancelled",
            MatchEvent::IncidentRecorded(_) => "match.incident_recorded",
            MatchEvent::EventRemoved(_) => "match.event_removed",
            MatchEvent::SubstitutionMade(_) => "match.substitution_made",
            MatchEvent::SubstitutionRemoved(_) => "match.substitution_removed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            MatchEvent::MatchScheduled(e) => e.occurred_at,
            MatchEvent::LineupSet(e) => e.occurred_at,
            MatchEvent::PeriodAdded(e) => e.occurred_at,
            MatchEvent::PeriodRemoved(e) => e.occurred_at,
            MatchEvent::ClockStarted(e) => e.occurred_at,
            MatchEvent::ClockPaused(e) => e.occurred_at,
            MatchEvent::ClockTicked(e) => e.occurred_at,
            MatchEvent::MatchFinished(e) => e.occurred_at,
            MatchEvent::GoalScored(e) => e.occurred_at,
            MatchEvent::GoalCancelled(e) => e.occurred_at,
            MatchEvent::IncidentRecorded(e) => e.occurred_at,
            MatchEvent::EventRemoved(e) => e.occurred_at,
            MatchEvent::SubstitutionMade(e) => e.occurred_at,
            MatchEvent::SubstitutionRemoved(e) => e.occurred_at,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Aggregate implementation
// ─────────────────────────────────────────────────────────────────────────────

impl Aggregate for Match {
    type Command = MatchCommand;
    type Event = MatchEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            MatchEvent::MatchScheduled(e) => {
                self.id = e.match_id;
                self.fixture = Some(e.fixture.clone());
            }
            MatchEvent::LineupSet(e) => {
                self.lineup = e.lineup.clone();
                self.bench = e.bench.clone();
                self.opponent_lineup = e.opponent_lineup.clone();
                self.jersey_numbers = e.jersey_numbers.clone();
            }
            MatchEvent::PeriodAdded(e) => {
                self.periods.push(Period {
                    kind: e.kind,
                    label: e.label.clone(),
                    duration: 0,
                });
                self.clock = self.clock.with_new_period(e.period_index, e.kind);
            }
            MatchEvent::PeriodRemoved(e) => {
                self.periods.truncate(e.period_index);
                if let Some(last) = self.periods.len().checked_sub(1) {
                    let kind = self.periods[last].kind;
                    self.clock = self.clock.after_last_period_removed(last, kind);
                }
            }
            MatchEvent::ClockStarted(e) => {
                self.clock = ClockState::Running {
                    period: e.period_index,
                };
            }
            MatchEvent::ClockPaused(e) => {
                self.clock = ClockState::Paused {
                    period: e.period_index,
                };
            }
            MatchEvent::ClockTicked(e) => {
                if let Some(period) = self.periods.get_mut(e.period_index) {
                    period.duration = period.duration.saturating_add(1);
                }
            }
            MatchEvent::MatchFinished(_) => {
                self.clock = ClockState::Finished;
            }
            MatchEvent::GoalScored(e) => {
                if let Some(attribution) = e.entry.attribution {
                    match self.side_of(attribution) {
                        HomeAway::Home => self.home_score += 1,
                        HomeAway::Away => self.away_score += 1,
                    }
                }
                self.entries_recorded = self.entries_recorded.max(e.entry.sequence);
                self.events.push(e.entry.clone());
            }
            MatchEvent::GoalCancelled(e) => match self.side_of(e.attribution) {
                HomeAway::Home => self.home_score = self.home_score.saturating_sub(1),
                HomeAway::Away => self.away_score = self.away_score.saturating_sub(1),
            },
            MatchEvent::IncidentRecorded(e) => {
                self.entries_recorded = self.entries_recorded.max(e.entry.sequence);
                self.events.push(e.entry.clone());
            }
            MatchEvent::EventRemoved(e) => {
                self.events.retain(|entry| entry.id != e.entry_id);
            }
            MatchEvent::SubstitutionMade(e) => {
                self.entries_recorded = self.entries_recorded.max(e.substitution.sequence);
                self.substitutions.push(e.substitution.clone());
            }
            MatchEvent::SubstitutionRemoved(e) => {
                self.substitutions.retain(|s| s.id != e.entry_id);
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            MatchCommand::ScheduleMatch(cmd) => self.handle_schedule(cmd),
            MatchCommand::SetLineup(cmd) => self.handle_set_lineup(cmd),
            MatchCommand::StartClock(cmd) => self.handle_start(cmd),
            MatchCommand::PauseClock(cmd) => self.handle_pause(cmd),
            MatchCommand::EnterInterval(cmd) => self.handle_enter_interval(cmd),
            MatchCommand::AddPeriod(cmd) => self.handle_add_period(cmd),
            MatchCommand::RemoveLastPeriod(cmd) => self.handle_remove_last_period(cmd),
            MatchCommand::FinishMatch(cmd) => self.handle_finish(cmd),
            MatchCommand::Tick(cmd) => self.handle_tick(cmd),
            MatchCommand::RecordGoal(cmd) => self.handle_record_goal(cmd),
            MatchCommand::RemoveGoal(cmd) => self.handle_remove_goal(cmd),
            MatchCommand::RecordCard(cmd) => self.handle_record_card(cmd),
            MatchCommand::RecordOtherEvent(cmd) => self.handle_record_other(cmd),
            MatchCommand::RemoveEvent(cmd) => self.handle_remove_event(cmd),
            MatchCommand::Substitute(cmd) => self.handle_substitute(cmd),
            MatchCommand::RemoveSubstitution(cmd) => self.handle_remove_substitution(cmd),
        }
    }
}

impl Match {
    fn ensure_scheduled(&self, match_id: MatchId) -> DomainResult<()> {
        if !self.is_scheduled() {
            return Err(DomainError::not_found());
        }
        if self.id != match_id {
            return Err(DomainError::invariant("match_id mismatch"));
        }
        Ok(())
    }

    fn ensure_new_entry(&self, entry_id: EntryId) -> DomainResult<()> {
        let taken = self.events.iter().any(|e| e.id == entry_id)
            || self.substitutions.iter().any(|s| s.id == entry_id);
        if taken {
            return Err(DomainError::conflict(format!("entry {entry_id} already exists")));
        }
        Ok(())
    }

    fn next_sequence(&self) -> u64 {
        self.entries_recorded + 1
    }

    fn period_count(&self, kind: PeriodKind) -> usize {
        self.periods.iter().filter(|p| p.kind == kind).count()
    }

    fn is_in_squad(&self, player: PlayerId) -> bool {
        self.lineup.iter().any(|e| e.player_id == player) || self.bench.contains(&player)
    }

    /// Checks that `participant` belongs to the side named by `attribution`
    /// and is someone this match knows about.
    fn validate_participant(
        &self,
        participant: &Participant,
        attribution: Attribution,
        must_be_on_field: bool,
    ) -> DomainResult<()> {
        if participant.attribution() != attribution {
            return Err(DomainError::validation(
                "selected player does not belong to the chosen side",
            ));
        }
        match participant {
            Participant::Player { player_id } => {
                if !self.is_in_squad(*player_id) {
                    return Err(DomainError::validation(format!(
                        "player {player_id} is not in this match's squad"
                    )));
                }
                if must_be_on_field && !self.players_on_field().contains(player_id) {
                    return Err(DomainError::validation(format!(
                        "player {player_id} is not on the field"
                    )));
                }
            }
            Participant::Opponent { jersey } => match jersey {
                Some(n) if !self.opponent_lineup.is_empty() && !self.opponent_lineup.contains(n) => {
                    return Err(DomainError::validation(format!(
                        "jersey #{n} is not in the opponent lineup"
                    )));
                }
                None if !self.opponent_lineup.is_empty() => {
                    return Err(DomainError::validation("select the opponent's jersey number"));
                }
                _ => {}
            },
        }
        Ok(())
    }

    fn describe(description: Option<&str>, kind: EventKind) -> String {
        match description.map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => kind.label().to_string(),
        }
    }

    fn handle_schedule(&self, cmd: &ScheduleMatch) -> DomainResult<Vec<MatchEvent>> {
        if self.is_scheduled() {
            return Err(DomainError::conflict("match already scheduled"));
        }
        if cmd.fixture.opponent.trim().is_empty() {
            return Err(DomainError::validation("opponent cannot be empty"));
        }
        Ok(vec![MatchEvent::MatchScheduled(MatchScheduled {
            match_id: cmd.match_id,
            fixture: cmd.fixture.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_set_lineup(&self, cmd: &SetLineup) -> DomainResult<Vec<MatchEvent>> {
        self.ensure_scheduled(cmd.match_id)?;
        if self.clock.has_started() {
            return Err(DomainError::invariant(
                "the lineup is fixed once the match has started",
            ));
        }

        let mut players = BTreeSet::new();
        let mut jerseys = BTreeSet::new();
        for entry in &cmd.lineup {
            if !players.insert(entry.player_id) {
                return Err(DomainError::validation(format!(
                    "player {} appears twice in the lineup",
                    entry.player_id
                )));
            }
            if !jerseys.insert(entry.jersey_number) {
                return Err(DomainError::validation(format!(
                    "jersey #{} is used twice in the lineup",
                    entry.jersey_number
                )));
            }
        }
        for player in &cmd.bench {
            if !players.insert(*player) {
                return Err(DomainError::validation(format!(
                    "player {player} is listed twice in the squad"
                )));
            }
        }

        let mut opponent_lineup = cmd.opponent_lineup.clone();
        opponent_lineup.sort_unstable();
        opponent_lineup.dedup();

        Ok(vec![MatchEvent::LineupSet(LineupSet {
            match_id: cmd.match_id,
            lineup: cmd.lineup.clone(),
            bench: cmd.bench.clone(),
            opponent_lineup,
            jersey_numbers: cmd.jersey_numbers.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_start(&self, cmd: &StartClock) -> DomainResult<Vec<MatchEvent>> {
        self.ensure_scheduled(cmd.match_id)?;
        match self.clock {
            ClockState::PreMatch => Ok(vec![
                MatchEvent::PeriodAdded(PeriodAdded {
                    match_id: cmd.match_id,
                    period_index: 0,
                    kind: PeriodKind::Regular,
                    label: default_period_label(PeriodKind::Regular, 1),
                    occurred_at: cmd.occurred_at,
                }),
                MatchEvent::ClockStarted(ClockStarted {
                    match_id: cmd.match_id,
                    period_index: 0,
                    occurred_at: cmd.occurred_at,
                }),
            ]),
            ClockState::Paused { period } => Ok(vec![MatchEvent::ClockStarted(ClockStarted {
                match_id: cmd.match_id,
                period_index: period,
                occurred_at: cmd.occurred_at,
            })]),
            ClockState::Running { .. } => Err(DomainError::invariant("the clock is already running")),
            ClockState::Interval { .. } => Err(DomainError::invariant(
                "add a new period before restarting the clock",
            )),
            ClockState::Finished => Err(DomainError::invariant("the match is finished")),
        }
    }

    fn handle_pause(&self, cmd: &PauseClock) -> DomainResult<Vec<MatchEvent>> {
        self.ensure_scheduled(cmd.match_id)?;
        self.clock.ensure_not_finished()?;
        let ClockState::Running { period } = self.clock else {
            return Err(DomainError::invariant("the clock is not running"));
        };
        Ok(vec![MatchEvent::ClockPaused(ClockPaused {
            match_id: cmd.match_id,
            period_index: period,
            elapsed: self.periods.get(period).map_or(0, |p| p.duration),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_enter_interval(&self, cmd: &EnterInterval) -> DomainResult<Vec<MatchEvent>> {
        self.ensure_scheduled(cmd.match_id)?;
        self.clock.ensure_not_finished()?;
        self.clock.ensure_started()?;
        if self.clock.is_interval() {
            return Err(DomainError::invariant("the interval has already started"));
        }
        Ok(vec![MatchEvent::PeriodAdded(PeriodAdded {
            match_id: cmd.match_id,
            period_index: self.periods.len(),
            kind: PeriodKind::Interval,
            label: default_period_label(PeriodKind::Interval, self.period_count(PeriodKind::Interval) + 1),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_add_period(&self, cmd: &AddPeriod) -> DomainResult<Vec<MatchEvent>> {
        self.ensure_scheduled(cmd.match_id)?;
        self.clock.ensure_not_finished()?;
        self.clock.ensure_started()?;
        if cmd.kind == PeriodKind::Interval {
            return Err(DomainError::validation(
                "use enter_interval to start an interval",
            ));
        }
        let label = match cmd.label.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => default_period_label(cmd.kind, self.period_count(cmd.kind) + 1),
        };
        Ok(vec![MatchEvent::PeriodAdded(PeriodAdded {
            match_id: cmd.match_id,
            period_index: self.periods.len(),
            kind: cmd.kind,
            label,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove_last_period(&self, cmd: &RemoveLastPeriod) -> DomainResult<Vec<MatchEvent>> {
        self.ensure_scheduled(cmd.match_id)?;
        self.clock.ensure_not_finished()?;
        if self.periods.len() <= 1 {
            return Err(DomainError::invariant("cannot remove the only period"));
        }
        if !cmd.confirmation.is_granted() {
            return Err(DomainError::invariant(
                "removing a period requires confirmation",
            ));
        }
        Ok(vec![MatchEvent::PeriodRemoved(PeriodRemoved {
            match_id: cmd.match_id,
            period_index: self.periods.len() - 1,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_finish(&self, cmd: &FinishMatch) -> DomainResult<Vec<MatchEvent>> {
        self.ensure_scheduled(cmd.match_id)?;
        self.clock.ensure_not_finished()?;
        self.clock.ensure_started()?;
        Ok(vec![MatchEvent::MatchFinished(MatchFinished {
            match_id: cmd.match_id,
            home_score: self.home_score,
            away_score: self.away_score,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_tick(&self, cmd: &Tick) -> DomainResult<Vec<MatchEvent>> {
        self.ensure_scheduled(cmd.match_id)?;
        match self.clock {
            ClockState::Running { period } => Ok(vec![MatchEvent::ClockTicked(ClockTicked {
                match_id: cmd.match_id,
                period_index: period,
                occurred_at: cmd.occurred_at,
            })]),
            _ => Ok(Vec::new()),
        }
    }

    fn handle_record_goal(&self, cmd: &RecordGoal) -> DomainResult<Vec<MatchEvent>> {
        self.ensure_scheduled(cmd.match_id)?;
        self.clock.ensure_accepts_entries()?;
        self.ensure_new_entry(cmd.entry_id)?;

        let scorer = cmd
            .scorer
            .ok_or_else(|| DomainError::validation("no scorer selected"))?;
        self.validate_participant(&scorer, cmd.attribution, true)?;

        let entry = TimelineEvent {
            id: cmd.entry_id,
            kind: EventKind::Goal,
            attribution: Some(cmd.attribution),
            participant: Some(scorer),
            time: self.current_time(),
            description: Self::describe(cmd.description.as_deref(), EventKind::Goal),
            sequence: self.next_sequence(),
        };
        Ok(vec![MatchEvent::GoalScored(GoalScored {
            match_id: cmd.match_id,
            entry,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove_goal(&self, cmd: &RemoveGoal) -> DomainResult<Vec<MatchEvent>> {
        self.ensure_scheduled(cmd.match_id)?;
        self.clock.ensure_not_finished()?;
        self.clock.ensure_not_interval()?;
        if self.score_of(cmd.attribution) == 0 {
            return Err(DomainError::invariant("the score is already zero"));
        }
        Ok(vec![MatchEvent::GoalCancelled(GoalCancelled {
            match_id: cmd.match_id,
            attribution: cmd.attribution,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_record_card(&self, cmd: &RecordCard) -> DomainResult<Vec<MatchEvent>> {
        self.ensure_scheduled(cmd.match_id)?;
        self.clock.ensure_accepts_entries()?;
        self.ensure_new_entry(cmd.entry_id)?;

        if !cmd.kind.is_card() {
            return Err(DomainError::validation(format!(
                "{} is not a card",
                cmd.kind.as_str()
            )));
        }
        let target = cmd
            .target
            .ok_or_else(|| DomainError::validation("no player selected"))?;
        self.validate_participant(&target, target.attribution(), false)?;

        let entry = TimelineEvent {
            id: cmd.entry_id,
            kind: cmd.kind,
            attribution: Some(target.attribution()),
            participant: Some(target),
            time: self.current_time(),
            description: Self::describe(cmd.description.as_deref(), cmd.kind),
            sequence: self.next_sequence(),
        };
        Ok(vec![MatchEvent::IncidentRecorded(IncidentRecorded {
            match_id: cmd.match_id,
            entry,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_record_other(&self, cmd: &RecordOtherEvent) -> DomainResult<Vec<MatchEvent>> {
        self.ensure_scheduled(cmd.match_id)?;
        self.clock.ensure_accepts_entries()?;
        self.ensure_new_entry(cmd.entry_id)?;

        if cmd.kind == EventKind::Goal || cmd.kind.is_card() {
            return Err(DomainError::validation(format!(
                "{} must be recorded through its dedicated operation",
                cmd.kind.as_str()
            )));
        }

        let entry = TimelineEvent {
            id: cmd.entry_id,
            kind: cmd.kind,
            attribution: cmd.attribution,
            participant: None,
            time: self.current_time(),
            description: Self::describe(Some(&cmd.description), cmd.kind),
            sequence: self.next_sequence(),
        };
        Ok(vec![MatchEvent::IncidentRecorded(IncidentRecorded {
            match_id: cmd.match_id,
            entry,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove_event(&self, cmd: &RemoveEvent) -> DomainResult<Vec<MatchEvent>> {
        self.ensure_scheduled(cmd.match_id)?;
        self.clock.ensure_not_finished()?;
        self.clock.ensure_not_interval()?;
        if !self.events.iter().any(|e| e.id == cmd.entry_id) {
            return Ok(Vec::new());
        }
        Ok(vec![MatchEvent::EventRemoved(EventRemoved {
            match_id: cmd.match_id,
            entry_id: cmd.entry_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_substitute(&self, cmd: &Substitute) -> DomainResult<Vec<MatchEvent>> {
        self.ensure_scheduled(cmd.match_id)?;
        self.clock.ensure_accepts_entries()?;
        self.ensure_new_entry(cmd.entry_id)?;

        if cmd.player_out == cmd.player_in {
            return Err(DomainError::validation(
                "a player cannot be substituted by themselves",
            ));
        }
        if !self.players_on_field().contains(&cmd.player_out) {
            return Err(DomainError::validation(format!(
                "player {} is not on the field",
                cmd.player_out
            )));
        }
        if !self.players_on_bench().contains(&cmd.player_in) {
            return Err(DomainError::validation(format!(
                "player {} is not on the bench",
                cmd.player_in
            )));
        }

        let substitution = Substitution {
            id: cmd.entry_id,
            player_out: cmd.player_out,
            player_in: cmd.player_in,
            player_out_jersey: self.resolve_jersey(cmd.player_out, cmd.player_out_jersey),
            player_in_jersey: self.resolve_jersey(cmd.player_in, cmd.player_in_jersey),
            time: self.current_time(),
            sequence: self.next_sequence(),
        };
        Ok(vec![MatchEvent::SubstitutionMade(SubstitutionMade {
            match_id: cmd.match_id,
            substitution,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove_substitution(&self, cmd: &RemoveSubstitution) -> DomainResult<Vec<MatchEvent>> {
        self.ensure_scheduled(cmd.match_id)?;
        self.clock.ensure_not_finished()?;
        self.clock.ensure_not_interval()?;
        if !self.substitutions.iter().any(|s| s.id == cmd.entry_id) {
            return Ok(Vec::new());
        }
        Ok(vec![MatchEvent::SubstitutionRemoved(SubstitutionRemoved {
            match_id: cmd.match_id,
            entry_id: cmd.entry_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}
