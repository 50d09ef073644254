//! Application users (staff accounts) as imported from the users sheet.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use matchday_core::{AggregateId, DomainError, DomainResult, Entity};

use crate::contact::is_valid_email;
use crate::group::GroupId;

/// User identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub AggregateId);

impl UserId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for UserId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// User account status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

/// Input for creating a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: String,
    pub email: String,
    pub phone: Option<String>,
    /// Registration number ("matricola").
    pub registration_number: String,
    pub status: UserStatus,
    pub expires_on: Option<NaiveDate>,
    pub group_id: GroupId,
}

/// A registered user. Serialized without the password, so it is not
/// deserializable; users are rebuilt from [`NewUser`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    id: UserId,
    first_name: String,
    last_name: String,
    username: String,
    #[serde(skip_serializing)]
    password: String,
    email: String,
    phone: Option<String>,
    registration_number: String,
    status: UserStatus,
    expires_on: Option<NaiveDate>,
    group_id: GroupId,
}

impl User {
    pub fn create(id: UserId, input: NewUser) -> DomainResult<Self> {
        for (value, field) in [
            (&input.first_name, "first name"),
            (&input.last_name, "last name"),
            (&input.registration_number, "registration number"),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::validation(format!("{field} cannot be empty")));
            }
        }

        let username = input.username.trim();
        if username.is_empty() || username.chars().any(char::is_whitespace) {
            return Err(DomainError::validation(
                "username must be non-empty and contain no spaces",
            ));
        }
        if input.password.is_empty() {
            return Err(DomainError::validation("password cannot be empty"));
        }
        let email = input.email.trim();
        if !is_valid_email(email) {
            return Err(DomainError::validation(format!("invalid email: {email}")));
        }

        Ok(Self {
            id,
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            username: username.to_string(),
            password: input.password,
            email: email.to_string(),
            phone: input.phone,
            registration_number: input.registration_number.trim().to_string(),
            status: input.status,
            expires_on: input.expires_on,
            group_id: input.group_id,
        })
    }

    pub fn id_typed(&self) -> UserId {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn registration_number(&self) -> &str {
        &self.registration_number
    }

    pub fn status(&self) -> UserStatus {
        self.status
    }

    pub fn expires_on(&self) -> Option<NaiveDate> {
        self.expires_on
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
