//! Runtime settings: built-in defaults, then `matchday.toml` (or the file
//! passed with `--config`), then `MATCHDAY__SECTION__KEY` environment
//! variables.

use std::path::Path;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use matchday_observability::LogFormat;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub log: LogSettings,
    pub matches: MatchSettings,
    pub csv: CsvSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchSettings {
    pub compact_feed_len: usize,
    pub full_feed_len: usize,
    /// When false, period removal skips the confirmation prompt.
    pub confirm_period_removal: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CsvSettings {
    pub write_bom: bool,
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("log.level", "info")?
        .set_default("log.format", "json")?
        .set_default("matches.compact_feed_len", 5i64)?
        .set_default("matches.full_feed_len", 8i64)?
        .set_default("matches.confirm_period_removal", true)?
        .set_default("csv.write_bom", true)
}

fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Settings, ConfigError> {
    let settings: Settings = builder.build()?.try_deserialize()?;
    if settings.matches.compact_feed_len == 0 || settings.matches.full_feed_len == 0 {
        return Err(ConfigError::Message(
            "feed lengths must be greater than zero".to_string(),
        ));
    }
    Ok(settings)
}

pub fn load(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let builder = match path {
        Some(path) => defaults()?.add_source(File::from(path).required(true)),
        None => defaults()?.add_source(File::with_name("matchday").required(false)),
    };
    finish(
        builder.add_source(
            Environment::with_prefix("MATCHDAY")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Result<Settings, ConfigError> {
        finish(defaults()?.add_source(File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn defaults_match_the_documented_values() {
        let settings = from_toml("").unwrap();
        assert_eq!(settings.log.level, "info");
        assert_eq!(settings.log.format, LogFormat::Json);
        assert_eq!(settings.matches.compact_feed_len, 5);
        assert_eq!(settings.matches.full_feed_len, 8);
        assert!(settings.matches.confirm_period_removal);
        assert!(settings.csv.write_bom);
    }

    #[test]
    fn file_values_override_defaults() {
        let settings = from_toml(
            "[log]\nformat = \"pretty\"\n[matches]\nfull_feed_len = 12\n[csv]\nwrite_bom = false\n",
        )
        .unwrap();
        assert_eq!(settings.log.format, LogFormat::Pretty);
        assert_eq!(settings.matches.full_feed_len, 12);
        assert_eq!(settings.matches.compact_feed_len, 5);
        assert!(!settings.csv.write_bom);
    }

    #[test]
    fn zero_feed_length_is_rejected() {
        assert!(from_toml("[matches]\ncompact_feed_len = 0\n").is_err());
    }
}
