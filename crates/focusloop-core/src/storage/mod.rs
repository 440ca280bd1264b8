//! Snapshot persistence and configuration.
//!
//! In-memory state is the source of truth; snapshots are JSON files under
//! the data directory, written wholesale and reloaded at startup. A
//! malformed or missing snapshot means "start from defaults" -- the load
//! path never fails toward the caller.

mod config;

pub use config::{Config, GoalsConfig};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::energy::EnergySample;
use crate::error::StorageError;
use crate::progression::UserStats;
use crate::scheduler::RescheduleSettings;
use crate::session::PomodoroSession;
use crate::task::Task;
use crate::timer::TimerConfig;

/// Returns `~/.config/focusloop[-dev]/` based on FOCUSLOOP_ENV.
///
/// Set FOCUSLOOP_ENV=dev to use a separate development data directory.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FOCUSLOOP_ENV").unwrap_or_else(|_| "production".to_string());
    let dir = if env == "dev" {
        base_dir.join("focusloop-dev")
    } else {
        base_dir.join("focusloop")
    };

    std::fs::create_dir_all(&dir).map_err(|e| StorageError::DataDir {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

/// Timer-domain snapshot (`pomodoro-storage`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PomodoroSnapshot {
    pub tasks: Vec<Task>,
    pub settings: TimerConfig,
    pub sessions: Vec<PomodoroSession>,
    pub daily_goal: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
}

impl Default for PomodoroSnapshot {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            settings: TimerConfig::default(),
            sessions: Vec::new(),
            daily_goal: GoalsConfig::default().daily_goal,
            current_streak: 0,
            longest_streak: 0,
        }
    }
}

/// Gamification snapshot (`gamification-storage`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GamificationSnapshot {
    pub user_stats: UserStats,
}

/// Scheduler snapshot (`auto-reschedule-storage`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RescheduleSnapshot {
    pub settings: RescheduleSettings,
    pub energy_level: Option<EnergySample>,
    pub consecutive_pomodoros: u32,
    pub last_break_time: Option<DateTime<Utc>>,
}

/// JSON snapshot files under a single directory, one per logical key.
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    pub const POMODORO_KEY: &'static str = "pomodoro-storage";
    pub const GAMIFICATION_KEY: &'static str = "gamification-storage";
    pub const RESCHEDULE_KEY: &'static str = "auto-reschedule-storage";

    /// Store rooted at the default data directory.
    pub fn open() -> Result<Self, StorageError> {
        Ok(Self { dir: data_dir()? })
    }

    /// Store rooted at a specific directory (tests, portable installs).
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let data = serde_json::to_string_pretty(value).map_err(|e| StorageError::EncodeFailed {
            key: key.to_string(),
            source: e,
        })?;
        std::fs::write(&path, data).map_err(|e| StorageError::SaveFailed {
            key: key.to_string(),
            path,
            message: e.to_string(),
        })
    }

    /// Load a snapshot; any failure (absent file, bad JSON) yields the
    /// default value.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let path = self.path_for(key);
        std::fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_snapshot_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = StateStore::with_dir(temp.path().to_path_buf());

        let mut snapshot = PomodoroSnapshot::default();
        snapshot.tasks.push(Task::new("persisted"));
        snapshot.daily_goal = 12;
        store.save(StateStore::POMODORO_KEY, &snapshot).unwrap();

        let loaded: PomodoroSnapshot = store.load_or_default(StateStore::POMODORO_KEY);
        assert_eq!(loaded.tasks.len(), 1);
        assert_eq!(loaded.tasks[0].title, "persisted");
        assert_eq!(loaded.daily_goal, 12);
    }

    #[test]
    fn test_missing_snapshot_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let store = StateStore::with_dir(temp.path().to_path_buf());
        let loaded: GamificationSnapshot = store.load_or_default(StateStore::GAMIFICATION_KEY);
        assert_eq!(loaded.user_stats.level, 1);
        assert_eq!(loaded.user_stats.total_xp, 0);
    }

    #[test]
    fn test_malformed_snapshot_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let store = StateStore::with_dir(temp.path().to_path_buf());
        std::fs::write(
            temp.path().join("auto-reschedule-storage.json"),
            "{not valid json",
        )
        .unwrap();
        let loaded: RescheduleSnapshot = store.load_or_default(StateStore::RESCHEDULE_KEY);
        assert_eq!(loaded.consecutive_pomodoros, 0);
        assert!(loaded.settings.enabled);
    }
}
