//! Derived views over a match: rosters, totals, time summaries and the
//! recent-activity feed. Nothing here is stored; every call recomputes from
//! the ledgers.

use std::cmp::Reverse;

use serde::Serialize;

use matchday_roster::{PlayerDirectory, PlayerId, player_display_name};

use crate::clock::MatchStatus;
use crate::game::Match;
use crate::types::{
    Attribution, EventKind, Jersey, MatchTime, Participant, PeriodKind, Substitution,
    TimelineEvent, format_clock,
};

/// Feed length for compact views.
pub const COMPACT_FEED_LEN: usize = 5;
/// Feed length for full views.
pub const FULL_FEED_LEN: usize = 8;

/// Synthetic kind name used for substitutions in the merged feed.
pub const SUBSTITUTION_KIND: &str = "substitution";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchTotals {
    pub own_goals: u32,
    pub opponent_goals: u32,
    pub own_cards: u32,
    pub opponent_cards: u32,
    pub substitutions: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodSummary {
    pub label: String,
    pub kind: PeriodKind,
    pub seconds: u32,
    /// `m:ss`
    pub clock: String,
}

/// One entry of the merged recent-activity feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity<'a> {
    Event(&'a TimelineEvent),
    Substitution(&'a Substitution),
}

impl Activity<'_> {
    pub fn time(&self) -> MatchTime {
        match self {
            Activity::Event(e) => e.time,
            Activity::Substitution(s) => s.time,
        }
    }

    pub fn sequence(&self) -> u64 {
        match self {
            Activity::Event(e) => e.sequence,
            Activity::Substitution(s) => s.sequence,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Activity::Event(e) => e.kind.as_str(),
            Activity::Substitution(_) => SUBSTITUTION_KIND,
        }
    }
}

/// Most recent first: minute, then second, then later insertion.
fn recency_key(time: MatchTime, sequence: u64) -> Reverse<(MatchTime, u64)> {
    Reverse((time, sequence))
}

impl Match {
    /// Everyone named for this match: starters in lineup order, then the bench.
    pub fn squad(&self) -> Vec<PlayerId> {
        self.lineup()
            .iter()
            .map(|e| e.player_id)
            .chain(self.bench().iter().copied())
            .collect()
    }

    /// Players currently on the field, in lineup slot order.
    pub fn players_on_field(&self) -> Vec<PlayerId> {
        let mut field: Vec<PlayerId> = self.lineup().iter().map(|e| e.player_id).collect();
        for sub in self.substitutions() {
            if field.contains(&sub.player_in) {
                continue;
            }
            if let Some(slot) = field.iter_mut().find(|p| **p == sub.player_out) {
                *slot = sub.player_in;
            }
        }
        field
    }

    /// Squad members not on the field, in squad order.
    pub fn players_on_bench(&self) -> Vec<PlayerId> {
        let field = self.players_on_field();
        self.squad()
            .into_iter()
            .filter(|p| !field.contains(p))
            .collect()
    }

    /// Shirt number shown for a player.
    pub fn jersey_number_of(&self, player: PlayerId) -> Jersey {
        let from_lineup = self
            .lineup()
            .iter()
            .find(|e| e.player_id == player)
            .map(|e| e.jersey_number);
        let from_substitution = self
            .substitutions()
            .iter()
            .rev()
            .filter(|s| s.player_in == player)
            .find_map(|s| s.player_in_jersey.number());
        let from_map = self.jersey_numbers().get(&player).copied();

        Jersey::first_known([from_lineup, from_substitution, from_map])
    }

    /// Number snapshotted into a substitution record.
    pub fn resolve_jersey(&self, player: PlayerId, explicit: Option<u32>) -> Jersey {
        let from_map = self.jersey_numbers().get(&player).copied();
        let from_lineup = self
            .lineup()
            .iter()
            .find(|e| e.player_id == player)
            .map(|e| e.jersey_number);

        Jersey::first_known([explicit, from_map, from_lineup])
    }

    pub fn totals(&self) -> MatchTotals {
        let mut totals = MatchTotals {
            substitutions: u32::try_from(self.substitutions().len()).unwrap_or(u32::MAX),
            ..MatchTotals::default()
        };
        for event in self.events() {
            let Some(attribution) = event.attribution else {
                continue;
            };
            match (event.kind, attribution) {
                (EventKind::Goal, Attribution::Own) => totals.own_goals += 1,
                (EventKind::Goal, Attribution::Opponent) => totals.opponent_goals += 1,
                (kind, Attribution::Own) if kind.is_card() => totals.own_cards += 1,
                (kind, Attribution::Opponent) if kind.is_card() => totals.opponent_cards += 1,
                _ => {}
            }
        }
        totals
    }

    pub fn period_summaries(&self) -> Vec<PeriodSummary> {
        self.periods()
            .iter()
            .map(|p| PeriodSummary {
                label: p.label.clone(),
                kind: p.kind,
                seconds: p.duration,
                clock: format_clock(p.duration),
            })
            .collect()
    }

    /// Seconds played across all non-interval periods.
    pub fn playing_time(&self) -> u32 {
        self.periods()
            .iter()
            .filter(|p| p.kind != PeriodKind::Interval)
            .map(|p| p.duration)
            .sum()
    }

    /// Event ledger, most recent first.
    pub fn timeline(&self) -> Vec<&TimelineEvent> {
        let mut events: Vec<&TimelineEvent> = self.events().iter().collect();
        events.sort_by_key(|e| recency_key(e.time, e.sequence));
        events
    }

    /// Substitution ledger, most recent first.
    pub fn substitution_timeline(&self) -> Vec<&Substitution> {
        let mut subs: Vec<&Substitution> = self.substitutions().iter().collect();
        subs.sort_by_key(|s| recency_key(s.time, s.sequence));
        subs
    }

    /// Events and substitutions merged, most recent first, at most `limit`.
    pub fn recent_activity(&self, limit: usize) -> Vec<Activity<'_>> {
        let mut feed: Vec<Activity<'_>> = self
            .events()
            .iter()
            .map(Activity::Event)
            .chain(self.substitutions().iter().map(Activity::Substitution))
            .collect();
        feed.sort_by_key(|a| recency_key(a.time(), a.sequence()));
        feed.truncate(limit);
        feed
    }

    /// Read-only snapshot of the match for presentation.
    pub fn report<D: PlayerDirectory + ?Sized>(&self, directory: &D, feed_len: usize) -> MatchReport {
        let slot = |player_id: PlayerId| FieldSlot {
            player_id,
            name: player_display_name(directory, player_id),
            jersey: self.jersey_number_of(player_id),
        };

        let activity = self
            .recent_activity(feed_len)
            .into_iter()
            .map(|a| ActivityLine {
                time: a.time().to_string(),
                kind: a.kind_name().to_string(),
                text: match a {
                    Activity::Event(e) => describe_event(directory, e),
                    Activity::Substitution(s) => format!(
                        "{} (#{}) for {} (#{})",
                        player_display_name(directory, s.player_in),
                        s.player_in_jersey,
                        player_display_name(directory, s.player_out),
                        s.player_out_jersey,
                    ),
                },
            })
            .collect();

        MatchReport {
            opponent: self.fixture().map(|f| f.opponent.clone()).unwrap_or_default(),
            status: self.status(),
            phase: self.clock().phase_name().to_string(),
            home_score: self.home_score(),
            away_score: self.away_score(),
            current_period: self.current_period().map(|p| p.label.clone()),
            clock: self.current_time().to_string(),
            periods: self.period_summaries(),
            playing_time: format_clock(self.playing_time()),
            totals: self.totals(),
            on_field: self.players_on_field().into_iter().map(slot).collect(),
            bench: self.players_on_bench().into_iter().map(slot).collect(),
            activity,
        }
    }
}

fn describe_event<D: PlayerDirectory + ?Sized>(directory: &D, event: &TimelineEvent) -> String {
    match event.participant {
        Some(Participant::Player { player_id }) => format!(
            "{} - {}",
            event.description,
            player_display_name(directory, player_id)
        ),
        Some(Participant::Opponent { jersey: Some(n) }) => {
            format!("{} - opponent #{n}", event.description)
        }
        Some(Participant::Opponent { jersey: None }) | None => event.description.clone(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSlot {
    pub player_id: PlayerId,
    pub name: String,
    pub jersey: Jersey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityLine {
    pub time: String,
    pub kind: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    pub opponent: String,
    pub status: MatchStatus,
    pub phase: String,
    pub home_score: u32,
    pub away_score: u32,
    pub current_period: Option<String>,
    pub clock: String,
    pub periods: Vec<PeriodSummary>,
    pub playing_time: String,
    pub totals: MatchTotals,
    pub on_field: Vec<FieldSlot>,
    pub bench: Vec<FieldSlot>,
    pub activity: Vec<ActivityLine>,
}
