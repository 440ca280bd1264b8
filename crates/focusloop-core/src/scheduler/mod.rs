//! Energy-aware automatic task selection.
//!
//! The scheduler never subscribes to timer completions; the coordinating
//! layer drives its counters. Selection order is priority sort first,
//! energy filter second -- the filter can remove the tasks priority ranked
//! first, and can empty the list entirely even when candidates existed.
//! That ordering is observable behavior and is kept as-is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::energy::EnergyLevel;
use crate::task::Task;

/// Auto-reschedule settings. All flags toggle independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RescheduleSettings {
    pub enabled: bool,
    pub auto_start_next_task: bool,
    pub auto_start_break: bool,
    /// Stored and serialized but not read by the selection logic; the
    /// documented precedence (break before next task) is hard policy.
    /// Reserved for a future per-user override.
    pub break_before_next_task: bool,
    pub priority_based: bool,
    pub energy_based: bool,
    pub max_consecutive_pomodoros: u32,
}

impl Default for RescheduleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_start_next_task: true,
            auto_start_break: true,
            break_before_next_task: true,
            priority_based: true,
            energy_based: true,
            max_consecutive_pomodoros: 4,
        }
    }
}

/// Task selector plus the counters it selects on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskScheduler {
    settings: RescheduleSettings,
    consecutive_pomodoros: u32,
    last_break_time: Option<DateTime<Utc>>,
}

impl TaskScheduler {
    pub fn new(settings: RescheduleSettings) -> Self {
        Self {
            settings,
            consecutive_pomodoros: 0,
            last_break_time: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn settings(&self) -> &RescheduleSettings {
        &self.settings
    }

    pub fn consecutive_pomodoros(&self) -> u32 {
        self.consecutive_pomodoros
    }

    pub fn last_break_time(&self) -> Option<DateTime<Utc>> {
        self.last_break_time
    }

    /// Pick the next task to run.
    ///
    /// Pipeline: drop completed, stable priority sort (when enabled), then
    /// the energy filter (when enabled). The first survivor wins. Returns
    /// None when disabled, when no candidates remain, or when the energy
    /// filter empties a non-empty list.
    pub fn next_task<'a>(&self, candidates: &'a [Task], energy: EnergyLevel) -> Option<&'a Task> {
        if !self.settings.enabled || candidates.is_empty() {
            return None;
        }

        let mut remaining: Vec<&Task> = candidates.iter().filter(|t| !t.completed).collect();

        if self.settings.priority_based {
            // sort_by is stable: ties keep input order.
            remaining.sort_by(|a, b| b.priority.cmp(&a.priority));
        }

        if self.settings.energy_based {
            remaining.retain(|t| match energy {
                EnergyLevel::Low => t.estimated_pomodoros <= 2,
                EnergyLevel::Medium => true,
                EnergyLevel::High => t.estimated_pomodoros >= 3,
            });
        }

        remaining.first().copied()
    }

    /// Break is due once the consecutive-pomodoro budget is spent.
    pub fn should_start_break(&self) -> bool {
        self.settings.enabled
            && self.settings.auto_start_break
            && self.consecutive_pomodoros >= self.settings.max_consecutive_pomodoros
    }

    /// A due break always pre-empts starting the next task.
    pub fn should_start_next_task(&self) -> bool {
        self.settings.enabled && self.settings.auto_start_next_task && !self.should_start_break()
    }

    // ── Counter updates (caller-driven) ──────────────────────────────

    pub fn record_pomodoro(&mut self) {
        self.consecutive_pomodoros += 1;
    }

    /// Reset the consecutive counter and stamp the break time.
    pub fn record_break(&mut self, at: DateTime<Utc>) {
        self.consecutive_pomodoros = 0;
        self.last_break_time = Some(at);
    }

    pub fn update_settings(&mut self, settings: RescheduleSettings) {
        self.settings = settings;
    }

    pub fn restore_counters(
        &mut self,
        consecutive_pomodoros: u32,
        last_break_time: Option<DateTime<Utc>>,
    ) {
        self.consecutive_pomodoros = consecutive_pomodoros;
        self.last_break_time = last_break_time;
    }
}

impl Default for TaskScheduler {
    fn default() -> Self {
        Self::new(RescheduleSettings::default())
    }
}
