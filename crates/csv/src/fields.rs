//! Cell vocabularies: `SI`/`NO` flags and `Attivo`/`Inattivo` statuses.

use matchday_roster::{PlayerStatus, UserStatus};

pub const YES: &str = "SI";
pub const NO: &str = "NO";
pub const ACTIVE: &str = "Attivo";
pub const INACTIVE: &str = "Inattivo";

/// `SI`/`NO`, case-insensitive; a blank cell means `NO`.
pub fn parse_flag(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(NO) {
        Some(false)
    } else if value.eq_ignore_ascii_case(YES) || value.eq_ignore_ascii_case("sì") || value == "SÌ" {
        Some(true)
    } else {
        None
    }
}

pub fn format_flag(value: bool) -> &'static str {
    if value { YES } else { NO }
}

/// `Attivo`/`Inattivo`, case-insensitive; a blank cell means active.
pub fn parse_active(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(ACTIVE) {
        Some(true)
    } else if value.eq_ignore_ascii_case(INACTIVE) {
        Some(false)
    } else {
        None
    }
}

pub fn player_status(active: bool) -> PlayerStatus {
    if active {
        PlayerStatus::Active
    } else {
        PlayerStatus::Inactive
    }
}

pub fn user_status(active: bool) -> UserStatus {
    if active {
        UserStatus::Active
    } else {
        UserStatus::Inactive
    }
}

pub fn player_status_label(status: PlayerStatus) -> &'static str {
    match status {
        PlayerStatus::Active => ACTIVE,
        PlayerStatus::Inactive => INACTIVE,
    }
}

pub fn user_status_label(status: UserStatus) -> &'static str {
    match status {
        UserStatus::Active => ACTIVE,
        UserStatus::Inactive => INACTIVE,
    }
}
