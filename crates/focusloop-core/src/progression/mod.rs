//! XP, levels, streaks, badges and achievements.
//!
//! The level curve is `level = floor(sqrt(total_xp / 100)) + 1` with the
//! inverse `xp_for_level(l) = (l - 1)^2 * 100`. All progress math derives
//! from `total_xp`; the stored `xp` field is a legacy display counter that
//! is written on every award but never read for logic.

mod catalog;

pub use catalog::{default_achievements, default_badges};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::events::Event;

/// XP granted per completed pomodoro.
pub const XP_PER_POMODORO: u64 = 10;
/// XP granted per completed task.
pub const XP_PER_TASK: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeRarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl BadgeRarity {
    /// XP granted when a badge of this rarity unlocks.
    pub fn xp_bonus(self) -> u64 {
        match self {
            BadgeRarity::Common => 50,
            BadgeRarity::Rare => 100,
            BadgeRarity::Epic => 200,
            BadgeRarity::Legendary => 500,
        }
    }
}

/// Which stats counter a badge requirement reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKind {
    Pomodoros,
    Streak,
    Tasks,
    FocusScore,
    Interruptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementCondition {
    GreaterThan,
    EqualTo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeRequirement {
    pub kind: RequirementKind,
    pub value: u64,
    pub condition: RequirementCondition,
}

impl BadgeRequirement {
    fn satisfied_by(&self, stats: &UserStats) -> bool {
        let counter = match self.kind {
            RequirementKind::Pomodoros => stats.total_pomodoros,
            RequirementKind::Streak => stats.current_streak as u64,
            RequirementKind::Tasks => stats.total_tasks,
            RequirementKind::FocusScore => stats.total_focus_time_min,
            RequirementKind::Interruptions => stats.total_interruptions,
        };
        match self.condition {
            RequirementCondition::GreaterThan => counter > self.value,
            RequirementCondition::EqualTo => counter == self.value,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub rarity: BadgeRarity,
    pub requirement: BadgeRequirement,
    /// None in the catalog; stamped on unlock.
    pub unlocked_at: Option<DateTime<Utc>>,
}

/// Which stats counter feeds an achievement's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCounter {
    TotalPomodoros,
    TotalTasks,
    TotalFocusTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub counter: AchievementCounter,
    pub max_progress: u64,
    /// Mirrors the source counter, capped at `max_progress`. Monotonic
    /// because the source counters are monotonic.
    pub progress: u64,
    pub xp_reward: u64,
    pub unlocked_at: Option<DateTime<Utc>>,
}

/// Process-wide gamification state. Persisted wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    pub level: u32,
    /// Legacy display counter; never reset on level-up and never used for
    /// progress math.
    pub xp: u64,
    pub total_xp: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_pomodoros: u64,
    pub total_tasks: u64,
    pub total_focus_time_min: u64,
    pub total_interruptions: u64,
    /// Unlocked badges only; locked badges live in the catalog.
    pub badges: Vec<Badge>,
    pub achievements: Vec<Achievement>,
    pub last_active_date: Option<NaiveDate>,
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            total_xp: 0,
            current_streak: 0,
            longest_streak: 0,
            total_pomodoros: 0,
            total_tasks: 0,
            total_focus_time_min: 0,
            total_interruptions: 0,
            badges: Vec::new(),
            achievements: default_achievements(),
            last_active_date: None,
        }
    }
}

/// Within-level progress, derived from `total_xp` alone.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LevelProgress {
    pub level: u32,
    pub xp_into_level: u64,
    pub xp_for_next_level: u64,
    /// 0.0 .. 1.0 toward the next level.
    pub fraction: f64,
}

/// XP accumulation, unlock checks and streak tracking.
pub struct ProgressionEngine {
    stats: UserStats,
    badge_catalog: Vec<Badge>,
}

impl ProgressionEngine {
    pub fn new() -> Self {
        Self {
            stats: UserStats::default(),
            badge_catalog: default_badges(),
        }
    }

    pub fn with_catalog(badge_catalog: Vec<Badge>) -> Self {
        Self {
            stats: UserStats::default(),
            badge_catalog,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn stats(&self) -> &UserStats {
        &self.stats
    }

    pub fn badge_catalog(&self) -> &[Badge] {
        &self.badge_catalog
    }

    /// `floor(sqrt(total_xp / 100)) + 1`
    pub fn level_for_xp(total_xp: u64) -> u32 {
        (total_xp as f64 / 100.0).sqrt().floor() as u32 + 1
    }

    /// Inverse of the level curve: XP needed to reach `level`.
    pub fn xp_for_level(level: u32) -> u64 {
        let base = level.saturating_sub(1) as u64;
        base * base * 100
    }

    pub fn level_progress(&self) -> LevelProgress {
        let level = Self::level_for_xp(self.stats.total_xp);
        let floor = Self::xp_for_level(level);
        let ceiling = Self::xp_for_level(level + 1);
        let span = ceiling - floor;
        let into = self.stats.total_xp - floor;
        LevelProgress {
            level,
            xp_into_level: into,
            xp_for_next_level: ceiling,
            fraction: if span == 0 {
                0.0
            } else {
                into as f64 / span as f64
            },
        }
    }

    // ── Mutations ────────────────────────────────────────────────────

    pub fn restore(&mut self, stats: UserStats) {
        self.stats = stats;
    }

    /// Award XP. A level increase surfaces as a `LevelUp` event, never as
    /// a return value consumed by logic.
    pub fn add_xp(&mut self, amount: u64) -> Vec<Event> {
        let now = Utc::now();
        self.stats.xp += amount;
        self.stats.total_xp += amount;

        let mut events = vec![Event::XpAwarded {
            amount,
            total_xp: self.stats.total_xp,
            at: now,
        }];

        let new_level = Self::level_for_xp(self.stats.total_xp);
        if new_level > self.stats.level {
            self.stats.level = new_level;
            events.push(Event::LevelUp {
                level: new_level,
                at: now,
            });
        }
        events
    }

    /// Fold a completed focus session into the counters.
    pub fn record_pomodoro(&mut self, duration_min: u32) {
        self.stats.total_pomodoros += 1;
        self.stats.total_focus_time_min += duration_min as u64;
    }

    pub fn record_task_completed(&mut self) {
        self.stats.total_tasks += 1;
    }

    pub fn record_interruption(&mut self) {
        self.stats.total_interruptions += 1;
    }

    /// Extend or reset the daily streak.
    pub fn update_streak(&mut self, active_today: bool) -> Option<Event> {
        if active_today {
            self.stats.current_streak += 1;
            if self.stats.current_streak > self.stats.longest_streak {
                self.stats.longest_streak = self.stats.current_streak;
            }
            self.stats.last_active_date = Some(Utc::now().date_naive());
        } else {
            self.stats.current_streak = 0;
        }
        Some(Event::StreakChanged {
            current: self.stats.current_streak,
            longest: self.stats.longest_streak,
            at: Utc::now(),
        })
    }

    /// Evaluate every still-locked catalog badge against the counters.
    ///
    /// Unlocking grants the rarity XP immediately. Idempotent: a badge
    /// already in `stats.badges` is never re-evaluated.
    pub fn check_badges(&mut self) -> Vec<Event> {
        let now = Utc::now();
        let mut events = Vec::new();

        let newly_unlocked: Vec<Badge> = self
            .badge_catalog
            .iter()
            .filter(|b| !self.stats.badges.iter().any(|u| u.id == b.id))
            .filter(|b| b.requirement.satisfied_by(&self.stats))
            .cloned()
            .collect();

        for mut badge in newly_unlocked {
            badge.unlocked_at = Some(now);
            let xp = badge.rarity.xp_bonus();
            events.push(Event::BadgeUnlocked {
                badge_id: badge.id.clone(),
                rarity: badge.rarity,
                xp_granted: xp,
                at: now,
            });
            self.stats.badges.push(badge);
            events.extend(self.add_xp(xp));
        }
        events
    }

    /// Mirror the source counters into achievement progress and unlock
    /// anything that reached its target.
    pub fn check_achievements(&mut self) -> Vec<Event> {
        let now = Utc::now();
        let mut unlocked: Vec<(String, u64)> = Vec::new();

        for achievement in &mut self.stats.achievements {
            let counter = match achievement.counter {
                AchievementCounter::TotalPomodoros => self.stats.total_pomodoros,
                AchievementCounter::TotalTasks => self.stats.total_tasks,
                AchievementCounter::TotalFocusTime => self.stats.total_focus_time_min,
            };
            achievement.progress = counter.min(achievement.max_progress);
            if achievement.progress >= achievement.max_progress
                && achievement.unlocked_at.is_none()
            {
                achievement.unlocked_at = Some(now);
                unlocked.push((achievement.id.clone(), achievement.xp_reward));
            }
        }

        let mut events = Vec::new();
        for (id, xp_reward) in unlocked {
            events.push(Event::AchievementUnlocked {
                achievement_id: id,
                xp_reward,
                at: now,
            });
            events.extend(self.add_xp(xp_reward));
        }
        events
    }
}

impl Default for ProgressionEngine {
    fn default() -> Self {
        Self::new()
    }
}
