use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::de;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" | "auto" => Ok(Theme::System),
            other => Err(format!("Unknown theme: {}", other)),
        }
    }
}

/// Account-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_true", alias = "notifications_enabled")]
    pub notifications_enabled: bool,
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            notifications_enabled: default_true(),
            language: default_language(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_language() -> String {
    "en".to_string()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

/// Dietary profile fed to the recommendation service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default, alias = "dietary_restrictions", deserialize_with = "de::null_default")]
    pub dietary_restrictions: Vec<String>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub allergies: Vec<String>,
    #[serde(default, alias = "cuisine", deserialize_with = "de::null_default")]
    pub cuisines: Vec<String>,
    #[serde(default, alias = "calorie_target", skip_serializing_if = "Option::is_none")]
    pub calorie_target: Option<u32>,
    #[serde(default, alias = "household_size", skip_serializing_if = "Option::is_none")]
    pub household_size: Option<u32>,
    #[serde(default, alias = "budget_per_meal", skip_serializing_if = "Option::is_none")]
    pub budget_per_meal: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupFrequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl BackupFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            BackupFrequency::Daily => "daily",
            BackupFrequency::Weekly => "weekly",
            BackupFrequency::Monthly => "monthly",
        }
    }
}

impl fmt::Display for BackupFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackupFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(BackupFrequency::Daily),
            "weekly" => Ok(BackupFrequency::Weekly),
            "monthly" => Ok(BackupFrequency::Monthly),
            other => Err(format!("Unknown backup frequency: {}", other)),
        }
    }
}

/// Scheduled backup configuration; the schedule itself runs server-side
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub frequency: BackupFrequency,
    #[serde(default = "default_retention", alias = "retention_days")]
    pub retention_days: u32,
    #[serde(default, alias = "last_backup_at", alias = "lastBackup")]
    pub last_backup_at: Option<DateTime<Utc>>,
}

fn default_retention() -> u32 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRecord {
    #[serde(flatten, with = "de::record_id")]
    pub id: String,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "sizeBytes", alias = "size")]
    pub size_bytes: Option<u64>,
    #[serde(default = "default_backup_status")]
    pub status: String,
}

fn default_backup_status() -> String {
    "completed".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_parse() {
        assert_eq!("Dark".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!("auto".parse::<Theme>(), Ok(Theme::System));
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[test]
    fn test_preferences_accept_both_casings() {
        let camel: Preferences =
            serde_json::from_str(r#"{"dietaryRestrictions": ["vegan"], "householdSize": 3}"#)
                .unwrap();
        let snake: Preferences =
            serde_json::from_str(r#"{"dietary_restrictions": ["vegan"], "household_size": 3}"#)
                .unwrap();
        assert_eq!(camel.dietary_restrictions, snake.dietary_restrictions);
        assert_eq!(camel.household_size, Some(3));
        assert_eq!(snake.household_size, Some(3));
    }

    #[test]
    fn test_backup_frequency_display_matches_wire() {
        for frequency in [BackupFrequency::Daily, BackupFrequency::Weekly, BackupFrequency::Monthly] {
            let wire = serde_json::to_string(&frequency).unwrap();
            assert_eq!(wire, format!("\"{}\"", frequency));
            assert_eq!(frequency.to_string().parse::<BackupFrequency>(), Ok(frequency));
        }
    }

    #[test]
    fn test_backup_settings_defaults() {
        let settings: BackupSettings = serde_json::from_str(r#"{"enabled": true}"#).unwrap();
        assert_eq!(settings.frequency, BackupFrequency::Daily);
        assert_eq!(settings.retention_days, 30);
        assert!(settings.last_backup_at.is_none());
    }
}
