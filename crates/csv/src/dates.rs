//! Date formats accepted on import and produced on export.

use chrono::NaiveDate;

/// Import formats, tried in order.
const INPUT_FORMATS: [&str; 3] = ["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y"];

/// Export format.
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// Parse `DD/MM/YYYY`, `YYYY-MM-DD` or `DD-MM-YYYY`. Impossible dates
/// (e.g. 31/02) yield `None`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Normalize any accepted format to `YYYY-MM-DD`.
pub fn normalize_date(value: &str) -> Option<String> {
    parse_date(value).map(|d| d.format("%Y-%m-%d").to_string())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_three_formats_normalize_to_iso() {
        for input in ["15/05/2010", "2010-05-15", "15-05-2010", " 15/05/2010 "] {
            assert_eq!(normalize_date(input).as_deref(), Some("2010-05-15"), "{input}");
        }
    }

    #[test]
    fn impossible_dates_are_rejected() {
        assert_eq!(parse_date("31/02/2010"), None);
        assert_eq!(parse_date("2010-13-01"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("maggio 2010"), None);
    }

    #[test]
    fn export_uses_day_first() {
        let date = NaiveDate::from_ymd_opt(2010, 5, 3).unwrap();
        assert_eq!(format_date(date), "03/05/2010");
        assert_eq!(parse_date(&format_date(date)), Some(date));
    }
}
