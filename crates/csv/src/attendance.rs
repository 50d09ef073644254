//! Training attendance sheet (export only).
//!
//! `Totale Allenamenti` counts every exported session. `Percentuale` is
//! presences over the sessions the player was marked in, so `N/A` cells do
//! not lower it.

use std::cmp::Ordering;

use matchday_roster::{Attendance, AttendanceSummary, Player, TrainingSession};

use crate::dates::format_date;
use crate::error::ExportError;
use crate::table::{ExportOptions, write_rows};

pub const PRESENT: &str = "Presente";
pub const ABSENT: &str = "Assente";
pub const NOT_TRACKED: &str = "N/A";

pub const IDENTITY_HEADERS: [&str; 3] = ["Cognome", "Nome", "Numero Tessera"];
pub const SUMMARY_HEADERS: [&str; 4] = [
    "Totale Presenze",
    "Totale Allenamenti",
    "Percentuale",
    "Assenze",
];

fn cell(mark: Option<Attendance>) -> &'static str {
    match mark {
        Some(Attendance::Present) => PRESENT,
        Some(Attendance::Absent) => ABSENT,
        None => NOT_TRACKED,
    }
}

/// One row per player, one column per session (chronological), then totals.
///
/// Rows are ordered by attendance percentage, highest first; ties by name.
pub fn export_attendance<'a, I>(
    players: I,
    sessions: &[TrainingSession],
    options: ExportOptions,
) -> Result<String, ExportError>
where
    I: IntoIterator<Item = &'a Player>,
{
    let mut ordered: Vec<&TrainingSession> = sessions.iter().collect();
    ordered.sort_by_key(|s| s.date());
    let total_sessions = ordered.len().to_string();

    let dates: Vec<String> = ordered.iter().map(|s| format_date(s.date())).collect();
    let headers: Vec<&str> = IDENTITY_HEADERS
        .iter()
        .copied()
        .chain(dates.iter().map(String::as_str))
        .chain(SUMMARY_HEADERS.iter().copied())
        .collect();

    let mut rows: Vec<(&Player, AttendanceSummary)> = players
        .into_iter()
        .map(|p| (p, AttendanceSummary::for_player(p.id_typed(), sessions)))
        .collect();

    rows.sort_by(|(pa, a), (pb, b)| {
        b.percentage()
            .partial_cmp(&a.percentage())
            .unwrap_or(Ordering::Equal)
            .then_with(|| pa.last_name().cmp(pb.last_name()))
            .then_with(|| pa.first_name().cmp(pb.first_name()))
    });

    let records = rows.into_iter().map(|(player, summary)| {
        let mut record = vec![
            player.last_name().to_string(),
            player.first_name().to_string(),
            player.license_number().to_string(),
        ];
        record.extend(
            ordered
                .iter()
                .map(|s| cell(s.attendance_of(player.id_typed())).to_string()),
        );
        record.push(summary.presences.to_string());
        record.push(total_sessions.clone());
        record.push(format!("{:.0}%", summary.percentage()));
        record.push(summary.absences.to_string());
        record
    });

    let out = write_rows(&headers, records, options)?;
    tracing::info!(
        sessions = ordered.len(),
        bytes = out.len(),
        "attendance exported"
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use matchday_core::AggregateId;
    use matchday_roster::{ContactInfo, NewPlayer, PlayerId, PlayerStatus, TrainingId};

    fn player(first: &str, last: &str) -> Player {
        Player::register(
            PlayerId::new(AggregateId::new()),
            NewPlayer {
                first_name: first.to_string(),
                last_name: last.to_string(),
                birth_date: NaiveDate::from_ymd_opt(2012, 4, 1).unwrap(),
                license_number: format!("T-{last}"),
                status: PlayerStatus::Active,
                contact: ContactInfo::default(),
                guardian: None,
            },
        )
        .unwrap()
    }

    fn session(day: u32) -> TrainingSession {
        TrainingSession::new(
            TrainingId::new(AggregateId::new()),
            NaiveDate::from_ymd_opt(2024, 10, day).unwrap(),
        )
    }

    #[test]
    fn rows_sorted_by_percentage_with_na_cells() {
        let anna = player("Anna", "Rota");
        let bruno = player("Bruno", "Costa");
        let carla = player("Carla", "Bini");

        let mut s1 = session(8);
        let mut s2 = session(1);
        s1.mark(anna.id_typed(), Attendance::Absent);
        s2.mark(anna.id_typed(), Attendance::Present);
        s1.mark(bruno.id_typed(), Attendance::Present);
        s2.mark(bruno.id_typed(), Attendance::Present);
        s1.mark(carla.id_typed(), Attendance::Absent);

        let players = [anna, bruno, carla];
        let out = export_attendance(&players, &[s1, s2], ExportOptions { bom: false }).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(
            lines[0],
            "Cognome,Nome,Numero Tessera,01/10/2024,08/10/2024,Totale Presenze,Totale Allenamenti,Percentuale,Assenze"
        );
        assert_eq!(lines[1], "Costa,Bruno,T-Costa,Presente,Presente,2,2,100%,0");
        assert_eq!(lines[2], "Rota,Anna,T-Rota,Presente,Assente,1,2,50%,1");
        assert_eq!(lines[3], "Bini,Carla,T-Bini,N/A,Assente,0,2,0%,1");
    }

    #[test]
    fn untracked_sessions_count_in_total_but_not_in_percentage() {
        let elena = player("Elena", "Fusi");
        let mut s1 = session(2);
        let s2 = session(9);
        let s3 = session(16);
        s1.mark(elena.id_typed(), Attendance::Present);

        let out = export_attendance([&elena], &[s1, s2, s3], ExportOptions { bom: false }).unwrap();
        assert_eq!(
            out.lines().nth(1).unwrap(),
            "Fusi,Elena,T-Fusi,Presente,N/A,N/A,1,3,100%,0"
        );
    }

    #[test]
    fn untracked_player_is_zero_percent() {
        let dario = player("Dario", "Villa");
        let out = export_attendance([&dario], &[session(3)], ExportOptions::default()).unwrap();
        assert!(out.lines().nth(1).unwrap().ends_with("N/A,0,1,0%,0"));
    }
}
