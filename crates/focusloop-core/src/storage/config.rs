//! TOML-based application configuration.
//!
//! Stored at `~/.config/focusloop/config.toml`. Missing files and missing
//! fields fall back to defaults; a malformed file is reported by `load`
//! but callers that merely read settings use `load_or_default`.

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;
use crate::scheduler::RescheduleSettings;
use crate::timer::TimerConfig;

/// Daily goal configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalsConfig {
    /// Target completed pomodoros per day.
    #[serde(default = "default_daily_goal")]
    pub daily_goal: u32,
}

fn default_daily_goal() -> u32 {
    8
}

impl Default for GoalsConfig {
    fn default() -> Self {
        Self {
            daily_goal: default_daily_goal(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub goals: GoalsConfig,
    #[serde(default)]
    pub reschedule: RescheduleSettings,
}

impl Config {
    /// Load the configuration file. Absent file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = data_dir()
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?
            .join("config.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Load, treating any failure as "start from defaults".
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = data_dir()
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?
            .join("config.toml");
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.timer.pomodoro_min, 25);
        assert_eq!(config.timer.short_break_min, 5);
        assert_eq!(config.timer.long_break_min, 15);
        assert_eq!(config.goals.daily_goal, 8);
        assert!(config.reschedule.enabled);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [timer]
            pomodoro_min = 50

            [reschedule]
            energy_based = false
            "#,
        )
        .unwrap();
        assert_eq!(config.timer.pomodoro_min, 50);
        assert_eq!(config.timer.short_break_min, 5);
        assert!(!config.reschedule.energy_based);
        assert!(config.reschedule.priority_based);
        assert_eq!(config.goals.daily_goal, 8);
    }

    #[test]
    fn test_round_trip() {
        let mut config = Config::default();
        config.timer.pomodoro_min = 30;
        config.reschedule.max_consecutive_pomodoros = 6;
        let encoded = toml::to_string_pretty(&config).unwrap();
        let decoded: Config = toml::from_str(&encoded).unwrap();
        assert_eq!(decoded, config);
    }
}
