//! Drive a match session from a JSON script and report the outcome.
//!
//! Players are referenced by license number and resolved against a roster.
//! Rejected steps are collected, the way an operator would see them, and the
//! replay carries on.

use std::collections::{BTreeMap, HashMap};

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};

use matchday_core::{AggregateId, EntryId};
use matchday_match::{
    Attribution, EventKind, Fixture, LineupEntry, ManagementError, MatchId, MatchReport,
    MatchSession, Participant, PeriodKind, RemovalConfirmation,
};
use matchday_roster::{PlayerId, Roster};

use crate::settings::MatchSettings;

/// Longest single `advance` step; each counted second is one history entry.
pub const MAX_ADVANCE_SECONDS: u32 = 4 * 60 * 60;

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    pub fixture: Fixture,
    #[serde(default)]
    pub lineup: Vec<Starter>,
    /// License numbers.
    #[serde(default)]
    pub bench: Vec<String>,
    #[serde(default)]
    pub opponent_lineup: Vec<u32>,
    /// Shirt numbers by license number.
    #[serde(default)]
    pub jersey_numbers: BTreeMap<String, u32>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Starter {
    pub license: String,
    pub jersey: u32,
    #[serde(default)]
    pub position: Option<String>,
}

/// One operator action. `tag` names a recorded entry so later steps can
/// remove it.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Start,
    Pause,
    Interval,
    Finish,
    AddPeriod {
        kind: PeriodKind,
        #[serde(default)]
        label: Option<String>,
    },
    RemoveLastPeriod {
        #[serde(default)]
        confirm: bool,
    },
    Advance {
        seconds: u32,
    },
    Goal {
        side: Attribution,
        #[serde(default)]
        scorer: Option<String>,
        #[serde(default)]
        jersey: Option<u32>,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        tag: Option<String>,
    },
    RemoveGoal {
        side: Attribution,
    },
    Card {
        kind: EventKind,
        side: Attribution,
        #[serde(default)]
        player: Option<String>,
        #[serde(default)]
        jersey: Option<u32>,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        tag: Option<String>,
    },
    Event {
        kind: EventKind,
        #[serde(default)]
        side: Option<Attribution>,
        #[serde(default)]
        description: String,
        #[serde(default)]
        tag: Option<String>,
    },
    RemoveEvent {
        tag: String,
    },
    Substitute {
        out: String,
        #[serde(rename = "in")]
        player_in: String,
        #[serde(default)]
        tag: Option<String>,
    },
    RemoveSubstitution {
        tag: String,
    },
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Start => "start",
            Step::Pause => "pause",
            Step::Interval => "interval",
            Step::Finish => "finish",
            Step::AddPeriod { .. } => "add_period",
            Step::RemoveLastPeriod { .. } => "remove_last_period",
            Step::Advance { .. } => "advance",
            Step::Goal { .. } => "goal",
            Step::RemoveGoal { .. } => "remove_goal",
            Step::Card { .. } => "card",
            Step::Event { .. } => "event",
            Step::RemoveEvent { .. } => "remove_event",
            Step::Substitute { .. } => "substitute",
            Step::RemoveSubstitution { .. } => "remove_substitution",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Rejection {
    /// 1-based step number.
    pub step: usize,
    pub op: &'static str,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub report: MatchReport,
    pub events_recorded: usize,
    pub rejected: Vec<Rejection>,
}

struct Replay<'r> {
    roster: &'r Roster,
    session: MatchSession,
    tags: HashMap<String, EntryId>,
    confirm_period_removal: bool,
}

impl Replay<'_> {
    fn player(&self, license: &str) -> Result<PlayerId> {
        self.roster
            .find_by_license(license)
            .map(|p| p.id_typed())
            .ok_or_else(|| anyhow!("no player with license number {license}"))
    }

    fn participant(
        &self,
        side: Attribution,
        license: Option<&str>,
        jersey: Option<u32>,
    ) -> Result<Option<Participant>> {
        Ok(match (side, license) {
            (Attribution::Own, Some(license)) => Some(Participant::Player {
                player_id: self.player(license)?,
            }),
            (Attribution::Own, None) => None,
            (Attribution::Opponent, _) => Some(Participant::Opponent { jersey }),
        })
    }

    fn tagged(&self, tag: &str) -> Result<EntryId> {
        self.tags
            .get(tag)
            .copied()
            .ok_or_else(|| anyhow!("unknown tag {tag}"))
    }

    fn remember(
        &mut self,
        tag: Option<String>,
        result: Result<EntryId, ManagementError>,
    ) -> Result<(), ManagementError> {
        let entry_id = result?;
        if let Some(tag) = tag {
            self.tags.insert(tag, entry_id);
        }
        Ok(())
    }

    /// Outer error: the script itself is broken. Inner error: the session
    /// refused the step.
    fn step(&mut self, step: Step) -> Result<Result<(), ManagementError>> {
        Ok(match step {
            Step::Start => self.session.start(),
            Step::Pause => self.session.pause(),
            Step::Interval => self.session.enter_interval(),
            Step::Finish => self.session.finish(),
            Step::AddPeriod { kind, label } => self.session.add_period(kind, label),
            Step::RemoveLastPeriod { confirm } => {
                let confirmation = if !self.confirm_period_removal {
                    RemovalConfirmation::SkipConfirmation
                } else if confirm {
                    RemovalConfirmation::Confirmed
                } else {
                    RemovalConfirmation::Pending
                };
                self.session.remove_last_period(confirmation)
            }
            Step::Advance { seconds } => {
                if seconds > MAX_ADVANCE_SECONDS {
                    bail!("cannot advance {seconds} seconds at once (limit {MAX_ADVANCE_SECONDS})");
                }
                self.session.advance(seconds).map(|_| ())
            }
            Step::RemoveGoal { side } => self.session.remove_goal(side),
            Step::Goal {
                side,
                scorer,
                jersey,
                description,
                tag,
            } => {
                let scorer = self.participant(side, scorer.as_deref(), jersey)?;
                let result = self.session.record_goal(side, scorer, description);
                self.remember(tag, result)
            }
            Step::Card {
                kind,
                side,
                player,
                jersey,
                description,
                tag,
            } => {
                let target = self.participant(side, player.as_deref(), jersey)?;
                let result = self.session.record_card(kind, target, description);
                self.remember(tag, result)
            }
            Step::Event {
                kind,
                side,
                description,
                tag,
            } => {
                let result = self.session.record_other_event(kind, side, description);
                self.remember(tag, result)
            }
            Step::RemoveEvent { tag } => {
                let entry_id = self.tagged(&tag)?;
                self.session.remove_event(entry_id)
            }
            Step::Substitute {
                out,
                player_in,
                tag,
            } => {
                let (out, player_in) = (self.player(&out)?, self.player(&player_in)?);
                let result = self.session.substitute(out, player_in, None, None);
                self.remember(tag, result)
            }
            Step::RemoveSubstitution { tag } => {
                let entry_id = self.tagged(&tag)?;
                self.session.remove_substitution(entry_id)
            }
        })
    }
}

pub fn run(script: Script, roster: &Roster, settings: &MatchSettings, full: bool) -> Result<Outcome> {
    let mut replay = Replay {
        roster,
        session: MatchSession::new(MatchId::new(AggregateId::new())),
        tags: HashMap::new(),
        confirm_period_removal: settings.confirm_period_removal,
    };

    let lineup = script
        .lineup
        .iter()
        .map(|s| {
            Ok(LineupEntry {
                player_id: replay.player(&s.license)?,
                jersey_number: s.jersey,
                position: s.position.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let bench = script
        .bench
        .iter()
        .map(|license| replay.player(license))
        .collect::<Result<Vec<_>>>()?;
    let jersey_numbers = script
        .jersey_numbers
        .iter()
        .map(|(license, n)| Ok((replay.player(license)?, *n)))
        .collect::<Result<BTreeMap<_, _>>>()?;

    replay
        .session
        .schedule(script.fixture)
        .context("fixture rejected")?;
    replay
        .session
        .set_lineup(lineup, bench, script.opponent_lineup, jersey_numbers)
        .context("lineup rejected")?;

    let mut rejected = Vec::new();
    for (i, step) in script.steps.into_iter().enumerate() {
        let op = step.name();
        if let Err(err) = replay
            .step(step)
            .with_context(|| format!("step {} ({op}) is invalid", i + 1))?
        {
            rejected.push(Rejection {
                step: i + 1,
                op,
                error: err.to_string(),
            });
        }
    }

    let feed_len = if full {
        settings.full_feed_len
    } else {
        settings.compact_feed_len
    };
    let state = replay.session.state();
    tracing::info!(
        match_id = %state.id_typed(),
        steps_rejected = rejected.len(),
        "replay finished"
    );
    Ok(Outcome {
        report: state.report(roster, feed_len),
        events_recorded: replay.session.history().len(),
        rejected,
    })
}
