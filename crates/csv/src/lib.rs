//! CSV import/export for the roster sheets.
//!
//! Imports are all-or-nothing: the first invalid row aborts the whole file
//! with a [`RowError`] carrying its 1-based data-row number. Exports are
//! UTF-8 with a BOM by default so spreadsheet programs pick the right
//! encoding.

pub mod attendance;
pub mod dates;
pub mod error;
pub mod fields;
pub mod groups;
pub mod players;
pub mod table;
pub mod users;

pub use attendance::export_attendance;
pub use dates::{format_date, normalize_date, parse_date};
pub use error::{ExportError, ImportError, RowError};
pub use groups::{export_groups, import_groups};
pub use players::{export_players, import_players};
pub use table::{BOM, ExportOptions};
pub use users::{export_users, import_users};
