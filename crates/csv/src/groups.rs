//! Groups sheet: `Nome, Descrizione, Icona` plus four permission flags.

use std::collections::HashSet;

use matchday_core::AggregateId;
use matchday_roster::{Group, GroupId, GroupPermissions};

use crate::error::{ExportError, ImportError, RowError};
use crate::fields::{format_flag, parse_flag};
use crate::table::{Columns, ExportOptions, logged, read_rows, write_rows};

pub const NAME: &str = "Nome";
pub const DESCRIPTION: &str = "Descrizione";
pub const ICON: &str = "Icona";
pub const MANAGE_TEAM: &str = "Gestione Squadra";
pub const MANAGE_MATCHES: &str = "Gestione Partite";
pub const VIEW_RESULTS: &str = "Visualizzazione Risultati";
pub const VIEW_STATISTICS: &str = "Visualizzazione Statistiche";

pub const HEADERS: [&str; 7] = [
    NAME,
    DESCRIPTION,
    ICON,
    MANAGE_TEAM,
    MANAGE_MATCHES,
    VIEW_RESULTS,
    VIEW_STATISTICS,
];

/// Only the name is mandatory; missing flag columns read as `NO`.
const REQUIRED: [&str; 1] = [NAME];

pub fn import_groups(input: &str) -> Result<Vec<Group>, ImportError> {
    logged("groups", parse_groups(input))
}

fn parse_groups(input: &str) -> Result<Vec<Group>, ImportError> {
    let (columns, rows) = read_rows(input, &REQUIRED)?;
    let mut names = HashSet::new();
    let mut groups = Vec::with_capacity(rows.len());

    for (row, record) in rows {
        let group = parse_row(&columns, &record, row)?;
        if !names.insert(group.name().to_string()) {
            return Err(RowError::new(row, format!("duplicate group name: {}", group.name())).into());
        }
        groups.push(group);
    }
    Ok(groups)
}

fn parse_row(columns: &Columns, record: &csv::StringRecord, row: usize) -> Result<Group, RowError> {
    let flag = |name: &str| {
        let value = columns.value(record, name);
        parse_flag(value)
            .ok_or_else(|| RowError::new(row, format!("{name} must be SI or NO, found {value:?}")))
    };

    let permissions = GroupPermissions {
        manage_team: flag(MANAGE_TEAM)?,
        manage_matches: flag(MANAGE_MATCHES)?,
        view_results: flag(VIEW_RESULTS)?,
        view_statistics: flag(VIEW_STATISTICS)?,
    };

    Group::new(
        GroupId::new(AggregateId::new()),
        &columns.required(record, NAME, row)?,
        columns.optional(record, DESCRIPTION),
        columns.optional(record, ICON),
        permissions,
    )
    .map_err(|e| RowError::new(row, e.to_string()))
}

pub fn export_groups(groups: &[Group], options: ExportOptions) -> Result<String, ExportError> {
    let rows = groups.iter().map(|g| {
        let p = g.permissions();
        [
            g.name().to_string(),
            g.description().unwrap_or_default().to_string(),
            g.icon().unwrap_or_default().to_string(),
            format_flag(p.manage_team).to_string(),
            format_flag(p.manage_matches).to_string(),
            format_flag(p.view_results).to_string(),
            format_flag(p.view_statistics).to_string(),
        ]
    });
    write_rows(&HEADERS, rows, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "Nome,Descrizione,Icona,Gestione Squadra,Gestione Partite,Visualizzazione Risultati,Visualizzazione Statistiche\n\
        Allenatori,Staff tecnico,whistle,SI,SI,SI,SI\n\
        Genitori,,,NO,NO,SI,no\n";

    #[test]
    fn imports_flags_and_optional_fields() {
        let groups = import_groups(SHEET).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name(), "Allenatori");
        assert_eq!(groups[0].icon(), Some("whistle"));
        assert!(groups[0].permissions().manage_matches);
        assert_eq!(groups[1].description(), None);
        assert_eq!(
            groups[1].permissions(),
            GroupPermissions {
                manage_team: false,
                manage_matches: false,
                view_results: true,
                view_statistics: false,
            }
        );
    }

    #[test]
    fn bad_flag_aborts_with_row_number() {
        let input = "Nome,Gestione Squadra\nA,SI\nB,forse\n";
        match import_groups(input) {
            Err(ImportError::Row(err)) => {
                assert_eq!(err.row, 2);
                assert!(err.message.contains("Gestione Squadra"));
            }
            other => panic!("Expected row error, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = import_groups("Nome\nStaff\nStaff\n").unwrap_err();
        assert!(err.to_string().starts_with("row 2"));
    }

    #[test]
    fn export_then_import_keeps_groups() {
        let groups = import_groups(SHEET).unwrap();
        let out = export_groups(&groups, ExportOptions::default()).unwrap();
        let again = import_groups(&out).unwrap();
        let summary = |gs: &[Group]| -> Vec<(String, GroupPermissions)> {
            gs.iter().map(|g| (g.name().to_string(), g.permissions())).collect()
        };
        assert_eq!(summary(&groups), summary(&again));
    }
}
