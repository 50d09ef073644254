//! Value types shared by the match aggregate, its ledgers and derived views.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use matchday_core::{EntryId, ValueObject};
use matchday_roster::PlayerId;

// ─────────────────────────────────────────────────────────────────────────────
// Scheduling
// ─────────────────────────────────────────────────────────────────────────────

/// Whether the managed team plays at home or away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HomeAway {
    Home,
    Away,
}

/// Immutable scheduling facts of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub opponent: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
    pub field: Option<String>,
    pub home_away: HomeAway,
}

impl ValueObject for Fixture {}

/// A starter: player, shirt number and position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineupEntry {
    pub player_id: PlayerId,
    pub jersey_number: u32,
    pub position: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Periods & time
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Regular,
    Extra,
    Interval,
}

/// One timed segment of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub kind: PeriodKind,
    pub label: String,
    /// Elapsed seconds; only grows while the clock runs on this period.
    pub duration: u32,
}

/// Elapsed time within a period, as shown on the match clock.
///
/// Field order matters: the derived `Ord` compares minutes first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MatchTime {
    pub minute: u32,
    pub second: u32,
}

impl ValueObject for MatchTime {}

impl MatchTime {
    pub fn from_seconds(seconds: u32) -> Self {
        Self {
            minute: seconds / 60,
            second: seconds % 60,
        }
    }

    pub fn as_seconds(&self) -> u32 {
        self.minute * 60 + self.second
    }
}

impl core::fmt::Display for MatchTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{:02}", self.minute, self.second)
    }
}

/// Format a number of seconds as `m:ss`.
pub fn format_clock(seconds: u32) -> String {
    MatchTime::from_seconds(seconds).to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Jersey numbers
// ─────────────────────────────────────────────────────────────────────────────

/// A shirt number, or the `Unknown` sentinel when no source knows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Jersey {
    Number(u32),
    Unknown,
}

impl ValueObject for Jersey {}

impl Jersey {
    /// First known number among `sources`, tried in order.
    pub fn first_known<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = Option<u32>>,
    {
        sources
            .into_iter()
            .flatten()
            .next()
            .map_or(Jersey::Unknown, Jersey::Number)
    }

    pub fn number(&self) -> Option<u32> {
        match self {
            Jersey::Number(n) => Some(*n),
            Jersey::Unknown => None,
        }
    }
}

impl core::fmt::Display for Jersey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Jersey::Number(n) => write!(f, "{n}"),
            Jersey::Unknown => f.write_str("?"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Ledger records
// ─────────────────────────────────────────────────────────────────────────────

/// Which team a goal or card belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribution {
    Own,
    Opponent,
}

/// Who a goal or card refers to.
///
/// Our players are known by id; opponents only by shirt number, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "side", rename_all = "lowercase")]
pub enum Participant {
    Player { player_id: PlayerId },
    Opponent { jersey: Option<u32> },
}

impl Participant {
    pub fn attribution(&self) -> Attribution {
        match self {
            Participant::Player { .. } => Attribution::Own,
            Participant::Opponent { .. } => Attribution::Opponent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    Goal,
    YellowCard,
    RedCard,
    SecondYellowCard,
    BlueCard,
    Expulsion,
    Warning,
    Foul,
    Corner,
    Offside,
    FreeKick,
    Penalty,
    ThrowIn,
    Injury,
}

impl EventKind {
    pub const ALL: [EventKind; 14] = [
        EventKind::Goal,
        EventKind::YellowCard,
        EventKind::RedCard,
        EventKind::SecondYellowCard,
        EventKind::BlueCard,
        EventKind::Expulsion,
        EventKind::Warning,
        EventKind::Foul,
        EventKind::Corner,
        EventKind::Offside,
        EventKind::FreeKick,
        EventKind::Penalty,
        EventKind::ThrowIn,
        EventKind::Injury,
    ];

    pub fn is_card(&self) -> bool {
        matches!(
            self,
            EventKind::YellowCard
                | EventKind::RedCard
                | EventKind::SecondYellowCard
                | EventKind::BlueCard
        )
    }

    /// Stable wire name (matches the serde representation).
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Goal => "goal",
            EventKind::YellowCard => "yellow-card",
            EventKind::RedCard => "red-card",
            EventKind::SecondYellowCard => "second-yellow-card",
            EventKind::BlueCard => "blue-card",
            EventKind::Expulsion => "expulsion",
            EventKind::Warning => "warning",
            EventKind::Foul => "foul",
            EventKind::Corner => "corner",
            EventKind::Offside => "offside",
            EventKind::FreeKick => "free-kick",
            EventKind::Penalty => "penalty",
            EventKind::ThrowIn => "throw-in",
            EventKind::Injury => "injury",
        }
    }

    /// Default description when the operator gives none.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Goal => "Goal",
            EventKind::YellowCard => "Yellow card",
            EventKind::RedCard => "Red card",
            EventKind::SecondYellowCard => "Second yellow card",
            EventKind::BlueCard => "Blue card",
            EventKind::Expulsion => "Expulsion",
            EventKind::Warning => "Warning",
            EventKind::Foul => "Foul",
            EventKind::Corner => "Corner",
            EventKind::Offside => "Offside",
            EventKind::FreeKick => "Free kick",
            EventKind::Penalty => "Penalty",
            EventKind::ThrowIn => "Throw-in",
            EventKind::Injury => "Injury",
        }
    }
}

impl core::str::FromStr for EventKind {
    type Err = matchday_core::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| matchday_core::DomainError::validation(format!("unknown event kind: {s}")))
    }
}

/// An entry of the event ledger (goal, card or other incident).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: EntryId,
    pub kind: EventKind,
    pub attribution: Option<Attribution>,
    pub participant: Option<Participant>,
    pub time: MatchTime,
    pub description: String,
    /// Insertion order across both ledgers (starts at 1).
    pub sequence: u64,
}

/// An entry of the substitution ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    pub id: EntryId,
    pub player_out: PlayerId,
    pub player_in: PlayerId,
    pub player_out_jersey: Jersey,
    pub player_in_jersey: Jersey,
    pub time: MatchTime,
    pub sequence: u64,
}

/// How the operator approved removing the last period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemovalConfirmation {
    /// Not confirmed yet; the removal is rejected.
    Pending,
    Confirmed,
    /// Caller-level override that bypasses the confirmation prompt.
    SkipConfirmation,
}

impl RemovalConfirmation {
    pub fn is_granted(&self) -> bool {
        !matches!(self, RemovalConfirmation::Pending)
    }
}
