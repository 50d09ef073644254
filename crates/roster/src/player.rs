use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use matchday_core::{AggregateId, DomainError, DomainResult, Entity};

use crate::contact::ContactInfo;

/// Player identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub AggregateId);

impl PlayerId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Whether the player is currently part of the squad.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    #[default]
    Active,
    Inactive,
}

/// Parent or guardian of a (usually underage) player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guardian {
    pub name: Option<String>,
    pub contact: ContactInfo,
}

impl Guardian {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.contact.is_empty()
    }
}

/// Input for registering a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlayer {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub license_number: String,
    pub status: PlayerStatus,
    pub contact: ContactInfo,
    pub guardian: Option<Guardian>,
}

/// A registered player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    first_name: String,
    last_name: String,
    birth_date: NaiveDate,
    license_number: String,
    status: PlayerStatus,
    contact: ContactInfo,
    guardian: Option<Guardian>,
}

impl Player {
    /// Validate and build a player.
    ///
    /// Names and the license number are trimmed; an all-empty guardian is
    /// dropped.
    pub fn register(id: PlayerId, input: NewPlayer) -> DomainResult<Self> {
        let first_name = required(&input.first_name, "first name")?;
        let last_name = required(&input.last_name, "last name")?;
        let license_number = required(&input.license_number, "license number")?;

        input.contact.validate()?;
        let guardian = input.guardian.filter(|g| !g.is_empty());
        if let Some(guardian) = &guardian {
            guardian.contact.validate()?;
        }

        Ok(Self {
            id,
            first_name,
            last_name,
            birth_date: input.birth_date,
            license_number,
            status: input.status,
            contact: input.contact,
            guardian,
        })
    }

    pub fn id_typed(&self) -> PlayerId {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub fn license_number(&self) -> &str {
        &self.license_number
    }

    pub fn status(&self) -> PlayerStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == PlayerStatus::Active
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn guardian(&self) -> Option<&Guardian> {
        self.guardian.as_ref()
    }
}

impl Entity for Player {
    type Id = PlayerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn required(value: &str, field: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}
