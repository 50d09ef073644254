//! Lookup seams used by the match core and the CSV importers.

use std::collections::BTreeMap;

use crate::group::Group;
use crate::player::{Player, PlayerId};

/// Display value used when a referenced player cannot be found.
pub const UNKNOWN_PLAYER: &str = "Unknown player";

/// Supplies players by id.
pub trait PlayerDirectory {
    fn find_player(&self, id: PlayerId) -> Option<&Player>;
}

/// Supplies groups by exact name.
pub trait GroupDirectory {
    fn find_group_by_name(&self, name: &str) -> Option<&Group>;
}

impl GroupDirectory for [Group] {
    fn find_group_by_name(&self, name: &str) -> Option<&Group> {
        self.iter().find(|g| g.name() == name)
    }
}

/// Full name of a player, or [`UNKNOWN_PLAYER`] on a lookup miss.
pub fn player_display_name<D: PlayerDirectory + ?Sized>(directory: &D, id: PlayerId) -> String {
    directory
        .find_player(id)
        .map(Player::full_name)
        .unwrap_or_else(|| UNKNOWN_PLAYER.to_string())
}

/// In-memory roster keyed by player id.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: BTreeMap<PlayerId, Player>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a player.
    pub fn insert(&mut self, player: Player) {
        self.players.insert(player.id_typed(), player);
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn find_by_license(&self, license_number: &str) -> Option<&Player> {
        self.players
            .values()
            .find(|p| p.license_number() == license_number)
    }
}

impl FromIterator<Player> for Roster {
    fn from_iter<I: IntoIterator<Item = Player>>(iter: I) -> Self {
        let mut roster = Roster::new();
        for player in iter {
            roster.insert(player);
        }
        roster
    }
}

impl PlayerDirectory for Roster {
    fn find_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::ContactInfo;
    use crate::group::{GroupId, GroupPermissions};
    use crate::player::{NewPlayer, PlayerStatus};
    use chrono::NaiveDate;
    use matchday_core::AggregateId;

    fn player(first: &str, license: &str) -> Player {
        Player::register(
            PlayerId::new(AggregateId::new()),
            NewPlayer {
                first_name: first.to_string(),
                last_name: "Verdi".to_string(),
                birth_date: NaiveDate::from_ymd_opt(2011, 1, 1).unwrap(),
                license_number: license.to_string(),
                status: PlayerStatus::Active,
                contact: ContactInfo::default(),
                guardian: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn unknown_player_degrades_to_placeholder() {
        let roster: Roster = [player("Gino", "L1")].into_iter().collect();
        let missing = PlayerId::new(AggregateId::new());
        assert_eq!(player_display_name(&roster, missing), UNKNOWN_PLAYER);
    }

    #[test]
    fn known_player_shows_full_name() {
        let gino = player("Gino", "L1");
        let id = gino.id_typed();
        let roster: Roster = [gino].into_iter().collect();
        assert_eq!(player_display_name(&roster, id), "Gino Verdi");
        assert_eq!(roster.find_by_license("L1").map(|p| p.id_typed()), Some(id));
    }

    #[test]
    fn group_lookup_is_exact() {
        let groups = vec![
            Group::new(
                GroupId::new(AggregateId::new()),
                "Allenatori",
                None,
                None,
                GroupPermissions::default(),
            )
            .unwrap(),
        ];
        assert!(groups.find_group_by_name("Allenatori").is_some());
        assert!(groups.find_group_by_name("allenatori").is_none());
    }
}
