//! Live match domain module (event-sourced).
//!
//! A [`Match`] owns its clock, periods, score, event ledger and substitution
//! ledger. All mutation goes through [`MatchCommand`]s; derived views
//! (players on the field, totals, the activity feed) are computed on demand.
//! [`MatchSession`] drives a match and keeps its event history.

pub mod clock;
pub mod game;
pub mod session;
pub mod stats;
pub mod types;

pub use clock::{ClockState, MatchStatus, default_period_label};
pub use game::{
    AddPeriod, ClockPaused, ClockStarted, ClockTicked, EnterInterval, EventRemoved, FinishMatch,
    GoalCancelled, GoalScored, IncidentRecorded, LineupSet, Match, MatchCommand, MatchEvent,
    MatchFinished, MatchId, MatchScheduled, PauseClock, PeriodAdded, PeriodRemoved, RecordCard,
    RecordGoal, RecordOtherEvent, RemoveEvent, RemoveGoal, RemoveLastPeriod, RemoveSubstitution,
    ScheduleMatch, SetLineup, StartClock, Substitute, SubstitutionMade, SubstitutionRemoved, Tick,
};
pub use session::{AGGREGATE_TYPE, ManagementError, MatchSession};
pub use stats::{
    Activity, ActivityLine, COMPACT_FEED_LEN, FULL_FEED_LEN, FieldSlot, MatchReport, MatchTotals,
    PeriodSummary, SUBSTITUTION_KIND,
};
pub use types::{
    Attribution, EventKind, Fixture, HomeAway, Jersey, LineupEntry, MatchTime, Participant, Period,
    PeriodKind, RemovalConfirmation, Substitution, TimelineEvent, format_clock,
};
