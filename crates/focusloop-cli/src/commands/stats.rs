//! Progression and session statistics.

use clap::Subcommand;
use std::error::Error;

use focusloop_core::{analyze_energy_patterns, complexity_stats};

use super::Session;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Level, XP, streaks, badges and achievements
    Summary,
    /// Aggregate complexity over the task set
    Complexity,
    /// Per-hour productivity patterns mined from session history
    Patterns,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn Error>> {
    let session = Session::open()?;

    match action {
        StatsAction::Summary => summary(&session),
        StatsAction::Complexity => complexity(&session),
        StatsAction::Patterns => patterns(&session),
    }
    Ok(())
}

fn summary(session: &Session) {
    let progression = session.coordinator.progression();
    let stats = progression.stats();
    let progress = progression.level_progress();

    println!("Level {} ({} XP total)", stats.level, stats.total_xp);
    println!(
        "  {}/{} XP toward level {} ({:.0}%)",
        progress.xp_into_level,
        progress.xp_for_next_level - focusloop_core::ProgressionEngine::xp_for_level(progress.level),
        progress.level + 1,
        progress.fraction * 100.0
    );
    println!(
        "Streak: {} days (longest {})",
        stats.current_streak, stats.longest_streak
    );
    println!(
        "Pomodoros: {} ({} min focus), tasks: {}, interruptions: {}",
        stats.total_pomodoros, stats.total_focus_time_min, stats.total_tasks,
        stats.total_interruptions
    );
    println!("Daily goal: {} pomodoros", session.coordinator.daily_goal());

    if !stats.badges.is_empty() {
        println!("\nBadges:");
        for badge in &stats.badges {
            println!("  {} ({:?}) -- {}", badge.name, badge.rarity, badge.description);
        }
    }

    println!("\nAchievements:");
    for achievement in &stats.achievements {
        let state = if achievement.unlocked_at.is_some() {
            "done".to_string()
        } else {
            format!("{}/{}", achievement.progress, achievement.max_progress)
        };
        println!("  {} [{state}]", achievement.name);
    }
}

fn complexity(session: &Session) {
    let tasks = session.coordinator.tasks().tasks();
    if tasks.is_empty() {
        println!("No tasks to score.");
        return;
    }
    let stats = complexity_stats(tasks);

    println!("Average complexity: {:.1}/100", stats.average_overall);
    println!(
        "Levels: {} simple, {} moderate, {} complex, {} very-complex",
        stats.levels.simple, stats.levels.moderate, stats.levels.complex,
        stats.levels.very_complex
    );
    println!("\nMost complex:");
    for entry in &stats.most_complex {
        println!("  {:>5.1}  {}", entry.overall, entry.title);
    }
    println!("Least complex:");
    for entry in &stats.least_complex {
        println!("  {:>5.1}  {}", entry.overall, entry.title);
    }
}

fn patterns(session: &Session) {
    let history = session.coordinator.timer().log().history();
    let patterns = analyze_energy_patterns(history);
    if patterns.is_empty() {
        println!("No session history yet. Run some pomodoros first.");
        return;
    }

    println!("Hour  Level   Productivity  Focus  Motivation  Sessions");
    for p in patterns {
        println!(
            "{:02}:00 {:<7} {:>12.0}% {:>5.0}% {:>10.0}% {:>9}",
            p.hour,
            format!("{:?}", p.energy_level),
            p.productivity * 100.0,
            p.focus * 100.0,
            p.motivation * 100.0,
            p.sample_count
        );
    }
}
