//! Default badge and achievement catalogs.

use super::{
    Achievement, AchievementCounter, Badge, BadgeRarity, BadgeRequirement, RequirementCondition,
    RequirementKind,
};

fn badge(
    id: &str,
    name: &str,
    description: &str,
    rarity: BadgeRarity,
    kind: RequirementKind,
    value: u64,
) -> Badge {
    Badge {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        rarity,
        requirement: BadgeRequirement {
            kind,
            value,
            condition: RequirementCondition::GreaterThan,
        },
        unlocked_at: None,
    }
}

/// The built-in badge set.
pub fn default_badges() -> Vec<Badge> {
    vec![
        badge(
            "first-focus",
            "First Focus",
            "Complete your first pomodoro",
            BadgeRarity::Common,
            RequirementKind::Pomodoros,
            0,
        ),
        badge(
            "deep-diver",
            "Deep Diver",
            "Complete 50 pomodoros",
            BadgeRarity::Rare,
            RequirementKind::Pomodoros,
            49,
        ),
        badge(
            "centurion",
            "Centurion",
            "Complete 100 pomodoros",
            BadgeRarity::Epic,
            RequirementKind::Pomodoros,
            99,
        ),
        badge(
            "week-streak",
            "Seven Days Strong",
            "Stay active seven days in a row",
            BadgeRarity::Rare,
            RequirementKind::Streak,
            6,
        ),
        badge(
            "fortnight-streak",
            "Fortnight Flame",
            "Stay active fourteen days in a row",
            BadgeRarity::Epic,
            RequirementKind::Streak,
            13,
        ),
        badge(
            "task-tamer",
            "Task Tamer",
            "Finish 10 tasks",
            BadgeRarity::Common,
            RequirementKind::Tasks,
            9,
        ),
        badge(
            "task-master",
            "Task Master",
            "Finish 25 tasks",
            BadgeRarity::Rare,
            RequirementKind::Tasks,
            24,
        ),
        badge(
            "marathoner",
            "Marathoner",
            "Accumulate 50 hours of focus time",
            BadgeRarity::Legendary,
            RequirementKind::FocusScore,
            2999,
        ),
        badge(
            "self-aware",
            "Self Aware",
            "Log 10 interruptions honestly",
            BadgeRarity::Common,
            RequirementKind::Interruptions,
            9,
        ),
    ]
}

fn achievement(
    id: &str,
    name: &str,
    description: &str,
    counter: AchievementCounter,
    max_progress: u64,
    xp_reward: u64,
) -> Achievement {
    Achievement {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        counter,
        max_progress,
        progress: 0,
        xp_reward,
        unlocked_at: None,
    }
}

/// The built-in achievement set. Ids are fixed; progress tracking keys on
/// them.
pub fn default_achievements() -> Vec<Achievement> {
    vec![
        achievement(
            "pomodoro-novice",
            "Pomodoro Novice",
            "Complete 10 pomodoros",
            AchievementCounter::TotalPomodoros,
            10,
            100,
        ),
        achievement(
            "pomodoro-adept",
            "Pomodoro Adept",
            "Complete 50 pomodoros",
            AchievementCounter::TotalPomodoros,
            50,
            300,
        ),
        achievement(
            "task-finisher",
            "Task Finisher",
            "Complete 25 tasks",
            AchievementCounter::TotalTasks,
            25,
            250,
        ),
        achievement(
            "focus-hours",
            "Deep Hours",
            "Accumulate 1000 minutes of focus time",
            AchievementCounter::TotalFocusTime,
            1000,
            500,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::ProgressionEngine;

    #[test]
    fn test_catalog_ids_are_unique() {
        let badges = default_badges();
        let mut ids: Vec<_> = badges.iter().map(|b| b.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), badges.len());

        let achievements = default_achievements();
        let mut ids: Vec<_> = achievements.iter().map(|a| a.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), achievements.len());
    }

    #[test]
    fn test_no_badge_unlocks_on_fresh_stats() {
        let mut engine = ProgressionEngine::new();
        assert!(engine.check_badges().is_empty());
        assert!(engine.stats().badges.is_empty());
    }

    #[test]
    fn test_equal_to_condition() {
        let custom = vec![Badge {
            id: "exactly-seven".into(),
            name: "Exactly Seven".into(),
            description: "Hold a streak of exactly seven days".into(),
            rarity: BadgeRarity::Rare,
            requirement: BadgeRequirement {
                kind: RequirementKind::Streak,
                value: 7,
                condition: RequirementCondition::EqualTo,
            },
            unlocked_at: None,
        }];
        let mut engine = ProgressionEngine::with_catalog(custom);
        for _ in 0..6 {
            engine.update_streak(true);
        }
        assert!(engine.check_badges().is_empty());
        engine.update_streak(true);
        assert_eq!(engine.stats().current_streak, 7);
        assert!(!engine.check_badges().is_empty());
    }
}
