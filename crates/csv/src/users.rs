//! Users sheet. `Gruppo` must name an existing group exactly.

use std::collections::HashSet;

use matchday_core::AggregateId;
use matchday_roster::{Group, GroupDirectory, NewUser, User, UserId};

use crate::dates::{format_date, parse_date};
use crate::error::{ExportError, ImportError, RowError};
use crate::fields::{parse_active, user_status, user_status_label};
use crate::table::{Columns, ExportOptions, logged, read_rows, write_rows};

pub const FIRST_NAME: &str = "Nome";
pub const LAST_NAME: &str = "Cognome";
pub const USERNAME: &str = "Username";
pub const PASSWORD: &str = "Password";
pub const EMAIL: &str = "Email";
pub const PHONE: &str = "Cellulare";
pub const REGISTRATION_NUMBER: &str = "Matricola";
pub const STATUS: &str = "Stato";
pub const EXPIRES_ON: &str = "Data Scadenza";
pub const GROUP: &str = "Gruppo";

pub const HEADERS: [&str; 10] = [
    FIRST_NAME,
    LAST_NAME,
    USERNAME,
    PASSWORD,
    EMAIL,
    PHONE,
    REGISTRATION_NUMBER,
    STATUS,
    EXPIRES_ON,
    GROUP,
];

const REQUIRED: [&str; 7] = [
    FIRST_NAME,
    LAST_NAME,
    USERNAME,
    PASSWORD,
    EMAIL,
    REGISTRATION_NUMBER,
    GROUP,
];

pub fn import_users<G>(input: &str, groups: &G) -> Result<Vec<User>, ImportError>
where
    G: GroupDirectory + ?Sized,
{
    logged("users", parse_users(input, groups))
}

fn parse_users<G>(input: &str, groups: &G) -> Result<Vec<User>, ImportError>
where
    G: GroupDirectory + ?Sized,
{
    let (columns, rows) = read_rows(input, &REQUIRED)?;
    let mut usernames = HashSet::new();
    let mut users = Vec::with_capacity(rows.len());

    for (row, record) in rows {
        let user = parse_row(&columns, &record, row, groups)?;
        if !usernames.insert(user.username().to_string()) {
            return Err(RowError::new(row, format!("duplicate username: {}", user.username())).into());
        }
        users.push(user);
    }
    Ok(users)
}

fn parse_row<G>(
    columns: &Columns,
    record: &csv::StringRecord,
    row: usize,
    groups: &G,
) -> Result<User, RowError>
where
    G: GroupDirectory + ?Sized,
{
    let group_name = columns.required(record, GROUP, row)?;
    let group = groups
        .find_group_by_name(&group_name)
        .ok_or_else(|| RowError::new(row, format!("unknown group: {group_name}")))?;

    let status = columns.value(record, STATUS);
    let active = parse_active(status)
        .ok_or_else(|| RowError::new(row, format!("invalid status: {status}")))?;

    let expires_on = match columns.optional(record, EXPIRES_ON) {
        Some(value) => Some(
            parse_date(&value)
                .ok_or_else(|| RowError::new(row, format!("invalid expiry date: {value}")))?,
        ),
        None => None,
    };

    let input = NewUser {
        first_name: columns.required(record, FIRST_NAME, row)?,
        last_name: columns.required(record, LAST_NAME, row)?,
        username: columns.required(record, USERNAME, row)?,
        password: columns.required(record, PASSWORD, row)?,
        email: columns.required(record, EMAIL, row)?,
        phone: columns.optional(record, PHONE),
        registration_number: columns.required(record, REGISTRATION_NUMBER, row)?,
        status: user_status(active),
        expires_on,
        group_id: group.id_typed(),
    };
    User::create(UserId::new(AggregateId::new()), input).map_err(|e| RowError::new(row, e.to_string()))
}

/// Export users. The password column is always left blank.
pub fn export_users(
    users: &[User],
    groups: &[Group],
    options: ExportOptions,
) -> Result<String, ExportError> {
    let rows = users.iter().map(|u| {
        let group = groups
            .iter()
            .find(|g| g.id_typed() == u.group_id())
            .map(|g| g.name().to_string())
            .unwrap_or_default();
        [
            u.first_name().to_string(),
            u.last_name().to_string(),
            u.username().to_string(),
            String::new(),
            u.email().to_string(),
            u.phone().unwrap_or_default().to_string(),
            u.registration_number().to_string(),
            user_status_label(u.status()).to_string(),
            u.expires_on().map(format_date).unwrap_or_default(),
            group,
        ]
    });
    write_rows(&HEADERS, rows, options)
}
