//! Roster domain module: players, groups, users and training attendance.
//!
//! These are the collaborators the match core references by id. Everything
//! here is plain validated data plus lookup traits; nothing is persisted.

pub mod contact;
pub mod directory;
pub mod group;
pub mod player;
pub mod training;
pub mod user;

pub use contact::{ContactInfo, is_valid_email};
pub use directory::{GroupDirectory, PlayerDirectory, Roster, UNKNOWN_PLAYER, player_display_name};
pub use group::{Group, GroupId, GroupPermissions};
pub use player::{Guardian, NewPlayer, Player, PlayerId, PlayerStatus};
pub use training::{Attendance, AttendanceSummary, TrainingId, TrainingSession};
pub use user::{NewUser, User, UserId, UserStatus};
