use serde::{Deserialize, Serialize};

use matchday_core::{DomainError, DomainResult, ValueObject};

/// Contact information for a player, guardian or user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl ValueObject for ContactInfo {}

impl ContactInfo {
    pub fn is_empty(&self) -> bool {
        self.phone.is_none() && self.email.is_none()
    }

    /// Validates the email, if any.
    pub fn validate(&self) -> DomainResult<()> {
        match &self.email {
            Some(email) if !is_valid_email(email) => {
                Err(DomainError::validation(format!("invalid email: {email}")))
            }
            _ => Ok(()),
        }
    }
}

/// Minimal structural email check: `local@domain.tld`, no whitespace.
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_addresses() {
        assert!(is_valid_email("mario.rossi@example.it"));
        assert!(is_valid_email("a@b.co"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["", "mario", "@example.it", "mario@", "mario@example", "a b@c.it", "a@b@c.it", "a@.it"] {
            assert!(!is_valid_email(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn contact_without_email_is_valid() {
        let contact = ContactInfo {
            phone: Some("333 1234567".to_string()),
            email: None,
        };
        assert!(contact.validate().is_ok());
    }
}
