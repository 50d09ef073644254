//! File-backed inputs for the commands: the players sheet and training
//! attendance records.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::Deserialize;

use matchday_core::AggregateId;
use matchday_roster::{Attendance, Roster, TrainingId, TrainingSession};

/// Attendance for one training date, players given by license number.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingRecord {
    pub date: NaiveDate,
    #[serde(default)]
    pub present: Vec<String>,
    #[serde(default)]
    pub absent: Vec<String>,
}

pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Import a players sheet into a roster.
pub fn load_roster(path: &Path) -> Result<Roster> {
    let players = matchday_csv::import_players(&read_text(path)?)
        .with_context(|| format!("failed to import players from {}", path.display()))?;
    Ok(players.into_iter().collect())
}

pub fn load_training_records(path: &Path) -> Result<Vec<TrainingRecord>> {
    serde_json::from_str(&read_text(path)?)
        .with_context(|| format!("failed to parse training records in {}", path.display()))
}

/// Resolve license numbers against the roster.
///
/// A player listed both present and absent ends up absent.
pub fn sessions_from_records(
    records: &[TrainingRecord],
    roster: &Roster,
) -> Result<Vec<TrainingSession>> {
    records
        .iter()
        .map(|record| {
            let mut session = TrainingSession::new(TrainingId::new(AggregateId::new()), record.date);
            let marks = record
                .present
                .iter()
                .map(|l| (l, Attendance::Present))
                .chain(record.absent.iter().map(|l| (l, Attendance::Absent)));
            for (license, attendance) in marks {
                let Some(player) = roster.find_by_license(license) else {
                    bail!("training on {}: no player with license number {license}", record.date);
                };
                session.mark(player.id_typed(), attendance);
            }
            Ok(session)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYERS: &str = "Nome,Cognome,Data Nascita,Numero Tessera\n\
                           Marco,Rossi,04/03/2011,T1\n\
                           Luca,Bassi,12/09/2011,T2\n";

    fn roster() -> Roster {
        matchday_csv::import_players(PLAYERS).unwrap().into_iter().collect()
    }

    #[test]
    fn records_resolve_to_sessions() {
        let records: Vec<TrainingRecord> = serde_json::from_str(
            r#"[{ "date": "2025-02-03", "present": ["T1"], "absent": ["T2"] },
                { "date": "2025-02-05", "present": ["T2"] }]"#,
        )
        .unwrap();
        let roster = roster();
        let sessions = sessions_from_records(&records, &roster).unwrap();

        let t1 = roster.find_by_license("T1").unwrap().id_typed();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].attendance_of(t1), Some(Attendance::Present));
        assert_eq!(sessions[1].attendance_of(t1), None);
    }

    #[test]
    fn unknown_license_is_reported() {
        let records = vec![TrainingRecord {
            date: NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
            present: vec!["T9".to_string()],
            absent: Vec::new(),
        }];
        let err = sessions_from_records(&records, &roster()).unwrap_err();
        assert!(err.to_string().contains("T9"));
    }
}
