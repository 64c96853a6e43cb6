//! Configuration validation.
//!
//! Validates the journal config before any command touches storage.

use crate::domain::error::JournalError;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_REPORT_DAYS: i64 = 7;
pub const DEFAULT_POOL_SIZE: u32 = 4;
pub const MAX_POOL_SIZE: u32 = 64;

pub fn validate_journal_config(config: &dyn ConfigPort) -> Result<(), JournalError> {
    validate_backend(config)?;
    validate_pool_size(config, "sqlite")?;
    validate_pool_size(config, "postgres")?;
    validate_tag_lists(config)?;
    validate_report(config)?;
    validate_logging(config)?;
    Ok(())
}

/// `[journal] backend`, defaulting to sqlite.
pub fn backend(config: &dyn ConfigPort) -> String {
    config
        .get_string("journal", "backend")
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_else(|| "sqlite".to_string())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> JournalError {
    JournalError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_backend(config: &dyn ConfigPort) -> Result<(), JournalError> {
    match backend(config).as_str() {
        "sqlite" => match config.get_string("sqlite", "path") {
            Some(p) if !p.trim().is_empty() => Ok(()),
            _ => Err(JournalError::ConfigMissing {
                section: "sqlite".to_string(),
                key: "path".to_string(),
            }),
        },
        "postgres" => {
            let conninfo = config
                .get_string("postgres", "connection_string")
                .or_else(|| config.get_string("database", "conninfo"));
            match conninfo {
                Some(c) if !c.trim().is_empty() => Ok(()),
                _ => Err(JournalError::ConfigMissing {
                    section: "database".to_string(),
                    key: "conninfo".to_string(),
                }),
            }
        }
        other => Err(invalid(
            "journal",
            "backend",
            format!("unsupported backend '{other}' (expected sqlite or postgres)"),
        )),
    }
}

/// `[<section>] pool_size`, bounded to `1..=MAX_POOL_SIZE`.
pub fn pool_size(config: &dyn ConfigPort, section: &str) -> Result<u32, JournalError> {
    let value = config.get_int(section, "pool_size", i64::from(DEFAULT_POOL_SIZE));
    u32::try_from(value)
        .ok()
        .filter(|size| (1..=MAX_POOL_SIZE).contains(size))
        .ok_or_else(|| {
            invalid(
                section,
                "pool_size",
                format!("pool_size must be between 1 and {MAX_POOL_SIZE}, got {value}"),
            )
        })
}

fn validate_pool_size(config: &dyn ConfigPort, section: &str) -> Result<(), JournalError> {
    pool_size(config, section).map(|_| ())
}

fn validate_tag_lists(config: &dyn ConfigPort) -> Result<(), JournalError> {
    for key in ["strategy_tags", "impulse_tags"] {
        if let Some(list) = config.get_string("categories", key) {
            if list.split(',').all(|s| s.trim().is_empty()) {
                return Err(invalid("categories", key, "tag list must not be empty"));
            }
        }
    }
    Ok(())
}

fn validate_report(config: &dyn ConfigPort) -> Result<(), JournalError> {
    let days = config.get_int("report", "days", DEFAULT_REPORT_DAYS);
    if !(1..=366).contains(&days) {
        return Err(invalid("report", "days", "days must be between 1 and 366"));
    }
    let hour = config.get_int("report", "late_night_hour", 22);
    if !(0..=23).contains(&hour) {
        return Err(invalid(
            "report",
            "late_night_hour",
            "late_night_hour must be between 0 and 23",
        ));
    }
    Ok(())
}

fn validate_logging(config: &dyn ConfigPort) -> Result<(), JournalError> {
    match config.get_string("logging", "format").as_deref() {
        None | Some("pretty") | Some("json") => Ok(()),
        Some(other) => Err(invalid(
            "logging",
            "format",
            format!("unknown format '{other}' (expected pretty or json)"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapConfig(HashMap<(String, String), String>);

    impl MapConfig {
        fn new(entries: &[(&str, &str, &str)]) -> Self {
            Self(
                entries
                    .iter()
                    .map(|(s, k, v)| ((s.to_string(), k.to_string()), v.to_string()))
                    .collect(),
            )
        }
    }

    impl ConfigPort for MapConfig {
        fn get_string(&self, section: &str, key: &str) -> Option<String> {
            self.0.get(&(section.to_string(), key.to_string())).cloned()
        }
        fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }
    }

    #[test]
    fn minimal_sqlite_config_is_valid() {
        let config = MapConfig::new(&[("sqlite", "path", "journal.db")]);
        validate_journal_config(&config).unwrap();
        assert_eq!(backend(&config), "sqlite");
    }

    #[test]
    fn sqlite_requires_path() {
        let config = MapConfig::new(&[]);
        let err = validate_journal_config(&config).unwrap_err();
        assert!(matches!(err, JournalError::ConfigMissing { section, key } if section == "sqlite" && key == "path"));
    }

    #[test]
    fn postgres_accepts_either_conninfo_key() {
        let config = MapConfig::new(&[
            ("journal", "backend", "Postgres"),
            ("database", "conninfo", "host=localhost"),
        ]);
        validate_journal_config(&config).unwrap();

        let config = MapConfig::new(&[("journal", "backend", "postgres")]);
        assert!(matches!(
            validate_journal_config(&config),
            Err(JournalError::ConfigMissing { .. })
        ));
    }

    #[test]
    fn unknown_backend_rejected() {
        let config = MapConfig::new(&[("journal", "backend", "mysql")]);
        let err = validate_journal_config(&config).unwrap_err();
        assert!(matches!(err, JournalError::ConfigInvalid { key, .. } if key == "backend"));
    }

    #[test]
    fn pool_size_must_be_positive() {
        let config = MapConfig::new(&[("sqlite", "path", "x.db"), ("sqlite", "pool_size", "0")]);
        let err = validate_journal_config(&config).unwrap_err();
        assert!(matches!(err, JournalError::ConfigInvalid { key, .. } if key == "pool_size"));
    }

    #[test]
    fn pool_size_is_bounded_above() {
        let config = MapConfig::new(&[("postgres", "pool_size", "4294967297")]);
        let err = pool_size(&config, "postgres").unwrap_err();
        assert!(matches!(err, JournalError::ConfigInvalid { key, .. } if key == "pool_size"));

        let config = MapConfig::new(&[("sqlite", "pool_size", "64")]);
        assert_eq!(pool_size(&config, "sqlite").unwrap(), MAX_POOL_SIZE);
        assert_eq!(pool_size(&config, "postgres").unwrap(), DEFAULT_POOL_SIZE);
    }

    #[test]
    fn empty_tag_list_rejected() {
        let config = MapConfig::new(&[
            ("sqlite", "path", "x.db"),
            ("categories", "impulse_tags", " , "),
        ]);
        let err = validate_journal_config(&config).unwrap_err();
        assert!(matches!(err, JournalError::ConfigInvalid { key, .. } if key == "impulse_tags"));
    }

    #[test]
    fn report_bounds() {
        let config = MapConfig::new(&[("sqlite", "path", "x.db"), ("report", "days", "0")]);
        assert!(validate_journal_config(&config).is_err());

        let config = MapConfig::new(&[
            ("sqlite", "path", "x.db"),
            ("report", "late_night_hour", "24"),
        ]);
        assert!(validate_journal_config(&config).is_err());
    }

    #[test]
    fn logging_format_checked() {
        let config = MapConfig::new(&[("sqlite", "path", "x.db"), ("logging", "format", "xml")]);
        let err = validate_journal_config(&config).unwrap_err();
        assert!(matches!(err, JournalError::ConfigInvalid { key, .. } if key == "format"));
    }
}
