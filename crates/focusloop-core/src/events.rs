use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::progression::BadgeRarity;
use crate::session::InterruptionReason;

/// Every externally observable state change produces an Event.
///
/// The original design pushed changes to subscribers; here mutating calls
/// return the events they produced and callers poll or forward them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    PomodoroStarted {
        session_id: String,
        task_id: Option<String>,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        time_left_secs: u32,
        at: DateTime<Utc>,
    },
    TimerResumed {
        time_left_secs: u32,
        at: DateTime<Utc>,
    },
    /// The in-flight session was discarded. Destructive: it leaves no trace
    /// in the session history.
    TimerStopped {
        at: DateTime<Utc>,
    },
    PomodoroCompleted {
        session_id: String,
        task_id: Option<String>,
        duration_min: u32,
        at: DateTime<Utc>,
    },
    BreakStarted {
        long: bool,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    BreakCompleted {
        at: DateTime<Utc>,
    },
    InterruptionLogged {
        session_id: String,
        interruption_id: String,
        reason: InterruptionReason,
        at: DateTime<Utc>,
    },
    InterruptionRemoved {
        interruption_id: String,
        at: DateTime<Utc>,
    },
    /// The scheduler picked the next task to run.
    TaskSelected {
        task_id: String,
        at: DateTime<Utc>,
    },
    XpAwarded {
        amount: u64,
        total_xp: u64,
        at: DateTime<Utc>,
    },
    /// Side-channel notification; level is never a return value.
    LevelUp {
        level: u32,
        at: DateTime<Utc>,
    },
    BadgeUnlocked {
        badge_id: String,
        rarity: BadgeRarity,
        xp_granted: u64,
        at: DateTime<Utc>,
    },
    AchievementUnlocked {
        achievement_id: String,
        xp_reward: u64,
        at: DateTime<Utc>,
    },
    StreakChanged {
        current: u32,
        longest: u32,
        at: DateTime<Utc>,
    },
}
