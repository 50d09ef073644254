//! Players sheet.
//!
//! Required: `Nome, Cognome, Data Nascita, Numero Tessera`. Optional:
//! `Stato`, own contacts and the guardian's (`Nome Genitore`, ...).

use std::collections::HashSet;

use matchday_core::AggregateId;
use matchday_roster::{ContactInfo, Guardian, NewPlayer, Player, PlayerId};

use crate::dates::{format_date, parse_date};
use crate::error::{ExportError, ImportError, RowError};
use crate::fields::{parse_active, player_status, player_status_label};
use crate::table::{Columns, ExportOptions, logged, read_rows, write_rows};

pub const FIRST_NAME: &str = "Nome";
pub const LAST_NAME: &str = "Cognome";
pub const BIRTH_DATE: &str = "Data Nascita";
pub const LICENSE_NUMBER: &str = "Numero Tessera";
pub const STATUS: &str = "Stato";
pub const PHONE: &str = "Telefono";
pub const EMAIL: &str = "Email";
pub const GUARDIAN_NAME: &str = "Nome Genitore";
pub const GUARDIAN_PHONE: &str = "Telefono Genitore";
pub const GUARDIAN_EMAIL: &str = "Email Genitore";

pub const REQUIRED: [&str; 4] = [FIRST_NAME, LAST_NAME, BIRTH_DATE, LICENSE_NUMBER];

pub const HEADERS: [&str; 10] = [
    FIRST_NAME,
    LAST_NAME,
    BIRTH_DATE,
    LICENSE_NUMBER,
    STATUS,
    PHONE,
    EMAIL,
    GUARDIAN_NAME,
    GUARDIAN_PHONE,
    GUARDIAN_EMAIL,
];

pub fn import_players(input: &str) -> Result<Vec<Player>, ImportError> {
    logged("players", parse_players(input))
}

fn parse_players(input: &str) -> Result<Vec<Player>, ImportError> {
    let (columns, rows) = read_rows(input, &REQUIRED)?;
    let mut licenses = HashSet::new();
    let mut players = Vec::with_capacity(rows.len());

    for (row, record) in rows {
        let player = parse_row(&columns, &record, row)?;
        if !licenses.insert(player.license_number().to_string()) {
            return Err(RowError::new(
                row,
                format!("duplicate license number: {}", player.license_number()),
            )
            .into());
        }
        players.push(player);
    }
    Ok(players)
}

fn parse_row(columns: &Columns, record: &csv::StringRecord, row: usize) -> Result<Player, RowError> {
    let birth = columns.required(record, BIRTH_DATE, row)?;
    let birth_date = parse_date(&birth)
        .ok_or_else(|| RowError::new(row, format!("invalid birth date: {birth}")))?;

    let status = columns.value(record, STATUS);
    let active = parse_active(status)
        .ok_or_else(|| RowError::new(row, format!("invalid status: {status}")))?;

    let guardian = Guardian {
        name: columns.optional(record, GUARDIAN_NAME),
        contact: ContactInfo {
            phone: columns.optional(record, GUARDIAN_PHONE),
            email: columns.optional(record, GUARDIAN_EMAIL),
        },
    };

    let input = NewPlayer {
        first_name: columns.required(record, FIRST_NAME, row)?,
        last_name: columns.required(record, LAST_NAME, row)?,
        birth_date,
        license_number: columns.required(record, LICENSE_NUMBER, row)?,
        status: player_status(active),
        contact: ContactInfo {
            phone: columns.optional(record, PHONE),
            email: columns.optional(record, EMAIL),
        },
        guardian: Some(guardian),
    };
    Player::register(PlayerId::new(AggregateId::new()), input)
        .map_err(|e| RowError::new(row, e.to_string()))
}

pub fn export_players<'a, I>(players: I, options: ExportOptions) -> Result<String, ExportError>
where
    I: IntoIterator<Item = &'a Player>,
{
    let rows = players.into_iter().map(|p| {
        let guardian = p.guardian();
        let guardian_contact = guardian.map(|g| &g.contact);
        [
            p.first_name().to_string(),
            p.last_name().to_string(),
            format_date(p.birth_date()),
            p.license_number().to_string(),
            player_status_label(p.status()).to_string(),
            p.contact().phone.clone().unwrap_or_default(),
            p.contact().email.clone().unwrap_or_default(),
            guardian.and_then(|g| g.name.clone()).unwrap_or_default(),
            guardian_contact.and_then(|c| c.phone.clone()).unwrap_or_default(),
            guardian_contact.and_then(|c| c.email.clone()).unwrap_or_default(),
        ]
    });
    write_rows(&HEADERS, rows, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use matchday_roster::PlayerStatus;

    #[test]
    fn imports_all_date_formats_and_guardian() {
        let input = "\u{feff}Nome,Cognome,Data Nascita,Numero Tessera,Stato,Nome Genitore,Email Genitore\n\
            Marco,Rossi,15/05/2010,T100,Attivo,Paola Rossi,paola@example.it\n\
            Giulia,Conti,2011-02-01,T101,Inattivo,,\n\
            Ivo,Sala,03-09-2012,T102,,,\n";
        let players = import_players(input).unwrap();
        assert_eq!(players.len(), 3);
        assert_eq!(players[0].birth_date(), NaiveDate::from_ymd_opt(2010, 5, 15).unwrap());
        assert_eq!(
            players[0].guardian().and_then(|g| g.name.as_deref()),
            Some("Paola Rossi")
        );
        assert_eq!(players[1].status(), PlayerStatus::Inactive);
        assert!(players[1].guardian().is_none());
        assert_eq!(players[2].birth_date(), NaiveDate::from_ymd_opt(2012, 9, 3).unwrap());
        assert!(players[2].is_active());
    }

    #[test]
    fn impossible_birth_date_names_the_row() {
        let input = "Nome,Cognome,Data Nascita,Numero Tessera\n\
            Marco,Rossi,15/05/2010,T1\n\
            Luca,Bassi,31/02/2010,T2\n";
        let err = import_players(input).unwrap_err();
        assert_eq!(err.to_string(), "row 2: invalid birth date: 31/02/2010");
    }

    #[test]
    fn duplicate_license_is_rejected() {
        let input = "Nome,Cognome,Data Nascita,Numero Tessera\n\
            Marco,Rossi,15/05/2010,T1\n\
            Luca,Bassi,01/01/2010,T1\n";
        assert!(matches!(
            import_players(input),
            Err(ImportError::Row(RowError { row: 2, .. }))
        ));
    }

    #[test]
    fn missing_required_column_is_named() {
        let err = import_players("Nome,Cognome,Numero Tessera\n").unwrap_err();
        assert_eq!(err.missing_columns(), &["Data Nascita".to_string()]);
    }

    use proptest::prelude::*;

    fn name() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z,\"' ]{0,10}[A-Za-z]"
    }

    fn birth_date() -> impl Strategy<Value = NaiveDate> {
        (1950i32..2020, 1u32..=365).prop_map(|(y, d)| NaiveDate::from_yo_opt(y, d).unwrap())
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 128, ..ProptestConfig::default() })]

        #[test]
        fn export_then_import_keeps_identity(
            rows in proptest::collection::vec((name(), name(), birth_date(), "[A-Z0-9]{3,6}", any::<bool>()), 0..12)
        ) {
            let players: Vec<Player> = rows
                .iter()
                .enumerate()
                .map(|(i, (first, last, birth, license, active))| {
                    Player::register(
                        PlayerId::new(AggregateId::new()),
                        NewPlayer {
                            first_name: first.clone(),
                            last_name: last.clone(),
                            birth_date: *birth,
                            license_number: format!("{license}-{i}"),
                            status: player_status(*active),
                            contact: ContactInfo::default(),
                            guardian: None,
                        },
                    )
                    .unwrap()
                })
                .collect();

            let csv = export_players(&players, ExportOptions::default()).unwrap();
            let back = import_players(&csv).unwrap();

            let identity = |p: &Player| {
                (
                    p.first_name().to_string(),
                    p.last_name().to_string(),
                    p.birth_date(),
                    p.license_number().to_string(),
                    p.is_active(),
                )
            };
            let expected: Vec<_> = players.iter().map(identity).collect();
            let actual: Vec<_> = back.iter().map(identity).collect();
            prop_assert_eq!(expected, actual);
        }
    }
}
