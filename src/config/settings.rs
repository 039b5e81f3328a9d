//! User settings for ContaCerta
//!
//! Tunables for gamification, insights and the simulated authentication
//! service. Every field has a default, so a missing or partial settings file
//! is valid.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::paths::ContaCertaPaths;
use crate::error::FinanceError;
use crate::models::Money;

/// XP, level and achievement thresholds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GamificationSettings {
    /// XP awarded for each recorded transaction
    pub xp_per_transaction: u64,
    /// XP needed per level
    pub xp_per_level: u64,
    /// Net savings within one month that unlocks "Poupador"
    pub monthly_savings_target: Money,
    /// Consecutive active days that unlock "Disciplinado"
    pub streak_days: u32,
}

impl Default for GamificationSettings {
    fn default() -> Self {
        Self {
            xp_per_transaction: 10,
            xp_per_level: 100,
            monthly_savings_target: Money::from_cents(50_000),
            streak_days: 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightSettings {
    /// Fixed divisor for the average daily expense
    pub average_expense_days: u32,
    /// How many transactions the overview lists
    pub recent_transactions: usize,
}

impl Default for InsightSettings {
    fn default() -> Self {
        Self {
            average_expense_days: 30,
            recent_transactions: 5,
        }
    }
}

/// Simulated authentication service and client retry policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub login_delay_ms: u64,
    pub register_delay_ms: u64,
    pub min_password_length: usize,
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            login_delay_ms: 800,
            register_delay_ms: 1000,
            min_password_length: 6,
            max_attempts: 3,
            initial_backoff_ms: 200,
        }
    }
}

impl AuthSettings {
    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }

    pub fn register_delay(&self) -> Duration {
        Duration::from_millis(self.register_delay_ms)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }
}

/// User settings for ContaCerta
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default)]
    pub gamification: GamificationSettings,

    #[serde(default)]
    pub insights: InsightSettings,

    #[serde(default)]
    pub auth: AuthSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "R$".to_string()
}

fn default_date_format() -> String {
    "%d/%m/%Y".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            gamification: GamificationSettings::default(),
            insights: InsightSettings::default(),
            auth: AuthSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &ContaCertaPaths) -> Result<Self, FinanceError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| FinanceError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                FinanceError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &ContaCertaPaths) -> Result<(), FinanceError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| FinanceError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| FinanceError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Reject values that would break the rule engine
    pub fn validate(&self) -> Result<(), FinanceError> {
        if self.gamification.xp_per_level == 0 {
            return Err(FinanceError::Config("xp_per_level must be greater than zero".into()));
        }
        if self.insights.average_expense_days == 0 {
            return Err(FinanceError::Config(
                "average_expense_days must be greater than zero".into(),
            ));
        }
        if self.auth.max_attempts == 0 {
            return Err(FinanceError::Config("max_attempts must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "R$");
        assert_eq!(settings.gamification.xp_per_transaction, 10);
        assert_eq!(settings.gamification.xp_per_level, 100);
        assert_eq!(settings.gamification.monthly_savings_target.cents(), 50_000);
        assert_eq!(settings.insights.average_expense_days, 30);
        assert_eq!(settings.auth.login_delay(), Duration::from_millis(800));
        assert_eq!(settings.auth.register_delay(), Duration::from_millis(1000));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ContaCertaPaths::with_base_dir(temp_dir.path().to_path_buf());
        let settings = Settings::load_or_create(&paths).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ContaCertaPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.gamification.xp_per_transaction = 25;
        settings.auth.login_delay_ms = 0;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.gamification.xp_per_transaction, 25);
        assert_eq!(loaded.auth.login_delay_ms, 0);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ContaCertaPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(
            paths.settings_file(),
            r#"{"gamification": {"streak_days": 3}}"#,
        )
        .unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.gamification.streak_days, 3);
        assert_eq!(loaded.gamification.xp_per_level, 100);
        assert_eq!(loaded.currency_symbol, "R$");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ContaCertaPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(
            paths.settings_file(),
            r#"{"gamification": {"xp_per_level": 0}}"#,
        )
        .unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, FinanceError::Config(_)));
    }
}
