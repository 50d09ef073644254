use serde::{Deserialize, Serialize};

use matchday_core::{AggregateId, DomainError, DomainResult, Entity};

/// Group identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub AggregateId);

impl GroupId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for GroupId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// What members of a group may do in the application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPermissions {
    pub manage_team: bool,
    pub manage_matches: bool,
    pub view_results: bool,
    pub view_statistics: bool,
}

/// A user group (e.g. "Allenatori", "Dirigenti").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    id: GroupId,
    name: String,
    description: Option<String>,
    icon: Option<String>,
    permissions: GroupPermissions,
}

impl Group {
    pub fn new(
        id: GroupId,
        name: &str,
        description: Option<String>,
        icon: Option<String>,
        permissions: GroupPermissions,
    ) -> DomainResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("group name cannot be empty"));
        }
        Ok(Self {
            id,
            name: name.to_string(),
            description,
            icon,
            permissions,
        })
    }

    pub fn id_typed(&self) -> GroupId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn permissions(&self) -> GroupPermissions {
        self.permissions
    }
}

impl Entity for Group {
    type Id = GroupId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_rejected() {
        let err = Group::new(
            GroupId::new(AggregateId::new()),
            "  ",
            None,
            None,
            GroupPermissions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
