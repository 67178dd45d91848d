//! User settings for SchoolBook
//!
//! School details printed on messages and documents, money/date formatting,
//! and the lock gate.

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::paths::SchoolPaths;
use crate::error::SchoolError;
use crate::models::employee::is_valid_pin;
use crate::models::Money;

/// Lock gate settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockSettings {
    /// When false every command runs unlocked
    #[serde(default)]
    pub enabled: bool,

    /// Administrator PIN, accepted alongside employee PINs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_pin: Option<String>,

    /// Failed attempts allowed before the gate refuses further tries
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_max_attempts() -> u32 {
    3
}

impl Default for LockSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            admin_pin: None,
            max_attempts: default_max_attempts(),
        }
    }
}

/// User settings for SchoolBook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default = "default_school_name")]
    pub school_name: String,

    #[serde(default)]
    pub school_address: String,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// strftime format used in messages and documents
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default)]
    pub lock: LockSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_school_name() -> String {
    "Our School".to_string()
}

fn default_currency() -> String {
    "₹".to_string()
}

fn default_date_format() -> String {
    "%d %b %Y".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            school_name: default_school_name(),
            school_address: String::new(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            lock: LockSettings::default(),
        }
    }
}

/// Keys accepted by `schoolbook config set`
pub const SETTING_KEYS: &[&str] = &[
    "school_name",
    "school_address",
    "currency_symbol",
    "date_format",
    "lock.enabled",
    "lock.admin_pin",
    "lock.max_attempts",
];

impl Settings {
    /// Load settings from disk, or defaults when no settings file exists yet
    pub fn load_or_create(paths: &SchoolPaths) -> Result<Self, SchoolError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| SchoolError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| SchoolError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &SchoolPaths) -> Result<(), SchoolError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| SchoolError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| SchoolError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Update one setting from its dotted key
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SchoolError> {
        let value = value.trim();
        match key {
            "school_name" => {
                if value.is_empty() {
                    return Err(SchoolError::Validation("School name cannot be empty".into()));
                }
                self.school_name = value.to_string();
            }
            "school_address" => self.school_address = value.to_string(),
            "currency_symbol" => self.currency_symbol = value.to_string(),
            "date_format" => {
                if value.is_empty() || !is_valid_date_format(value) {
                    return Err(SchoolError::Validation(format!(
                        "'{}' is not a valid date format",
                        value
                    )));
                }
                self.date_format = value.to_string();
            }
            "lock.enabled" => {
                let enabled = parse_bool(value).ok_or_else(|| {
                    SchoolError::Validation(format!("Expected true or false, got '{}'", value))
                })?;
                if enabled && self.lock.admin_pin.is_none() {
                    return Err(SchoolError::Validation(
                        "Set lock.admin_pin before enabling the lock".into(),
                    ));
                }
                self.lock.enabled = enabled;
            }
            "lock.admin_pin" => {
                if !is_valid_pin(value) {
                    return Err(SchoolError::Validation("PIN must be 4 to 6 digits".into()));
                }
                self.lock.admin_pin = Some(value.to_string());
            }
            "lock.max_attempts" => {
                let attempts: u32 = value.parse().map_err(|_| {
                    SchoolError::Validation(format!("Expected a number, got '{}'", value))
                })?;
                if attempts == 0 {
                    return Err(SchoolError::Validation(
                        "lock.max_attempts must be at least 1".into(),
                    ));
                }
                self.lock.max_attempts = attempts;
            }
            other => {
                return Err(SchoolError::Config(format!(
                    "Unknown setting '{}'. Valid keys: {}",
                    other,
                    SETTING_KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }
}

impl Settings {
    /// Amount with the configured currency symbol, e.g. `₹12,500`
    pub fn format_money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }

    /// Date in the configured format, ISO when the format is unusable
    pub fn format_date(&self, date: NaiveDate) -> String {
        if is_valid_date_format(&self.date_format) {
            date.format(&self.date_format).to_string()
        } else {
            date.format("%Y-%m-%d").to_string()
        }
    }
}

fn is_valid_date_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "₹");
        assert_eq!(settings.date_format, "%d %b %Y");
        assert!(!settings.lock.enabled);
        assert_eq!(settings.lock.max_attempts, 3);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SchoolPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.set("school_name", "Sunrise Public School").unwrap();
        settings.set("lock.admin_pin", "2468").unwrap();
        settings.set("lock.enabled", "yes").unwrap();
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.school_name, "Sunrise Public School");
        assert!(loaded.lock.enabled);
        assert_eq!(loaded.lock.admin_pin.as_deref(), Some("2468"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"school_name":"Hill View"}"#).unwrap();
        assert_eq!(settings.school_name, "Hill View");
        assert_eq!(settings.currency_symbol, "₹");
        assert_eq!(settings.lock.max_attempts, 3);
    }

    #[test]
    fn test_formatting() {
        let mut settings = Settings::default();
        let date = NaiveDate::from_ymd_opt(2025, 4, 3).unwrap();
        assert_eq!(settings.format_money(Money::from_units(12_500)), "₹12,500");
        assert_eq!(settings.format_money(Money::from_cents(150)), "₹1.50");
        assert_eq!(settings.format_date(date), "03 Apr 2025");

        settings.date_format = "%Q".into();
        assert_eq!(settings.format_date(date), "2025-04-03");
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut settings = Settings::default();
        assert!(settings.set("lock.enabled", "true").is_err());
        assert!(settings.set("lock.admin_pin", "12").is_err());
        assert!(settings.set("lock.max_attempts", "0").is_err());
        assert!(settings.set("lock.enabled", "maybe").is_err());
        assert!(settings.set("date_format", "%Q").is_err());
        assert!(matches!(
            settings.set("colour", "blue"),
            Err(SchoolError::Config(_))
        ));
    }
}
