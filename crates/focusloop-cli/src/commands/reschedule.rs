//! Auto-reschedule settings and next-task selection.

use clap::Subcommand;
use std::error::Error;

use focusloop_core::storage::Config;

use super::Session;

#[derive(Subcommand)]
pub enum RescheduleAction {
    /// Show the current settings
    Show,
    /// Change settings (persisted to config.toml)
    Set {
        #[arg(long)]
        enabled: Option<bool>,
        #[arg(long)]
        auto_start_next_task: Option<bool>,
        #[arg(long)]
        auto_start_break: Option<bool>,
        #[arg(long)]
        priority_based: Option<bool>,
        #[arg(long)]
        energy_based: Option<bool>,
        #[arg(long)]
        max_consecutive_pomodoros: Option<u32>,
    },
    /// Pick the next task for the current energy level
    Next,
}

pub fn run(action: RescheduleAction) -> Result<(), Box<dyn Error>> {
    match action {
        RescheduleAction::Show => show(),
        RescheduleAction::Set {
            enabled,
            auto_start_next_task,
            auto_start_break,
            priority_based,
            energy_based,
            max_consecutive_pomodoros,
        } => set(
            enabled,
            auto_start_next_task,
            auto_start_break,
            priority_based,
            energy_based,
            max_consecutive_pomodoros,
        ),
        RescheduleAction::Next => next(),
    }
}

fn show() -> Result<(), Box<dyn Error>> {
    let session = Session::open()?;
    let settings = session.coordinator.scheduler().settings();
    println!("{}", serde_json::to_string_pretty(settings)?);
    Ok(())
}

fn set(
    enabled: Option<bool>,
    auto_start_next_task: Option<bool>,
    auto_start_break: Option<bool>,
    priority_based: Option<bool>,
    energy_based: Option<bool>,
    max_consecutive_pomodoros: Option<u32>,
) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load_or_default();
    let settings = &mut config.reschedule;

    if let Some(v) = enabled {
        settings.enabled = v;
    }
    if let Some(v) = auto_start_next_task {
        settings.auto_start_next_task = v;
    }
    if let Some(v) = auto_start_break {
        settings.auto_start_break = v;
    }
    if let Some(v) = priority_based {
        settings.priority_based = v;
    }
    if let Some(v) = energy_based {
        settings.energy_based = v;
    }
    if let Some(v) = max_consecutive_pomodoros {
        settings.max_consecutive_pomodoros = v.max(1);
    }

    config.save()?;
    println!("{}", serde_json::to_string_pretty(&config.reschedule)?);
    Ok(())
}

fn next() -> Result<(), Box<dyn Error>> {
    let mut session = Session::open()?;

    let sample = session.coordinator.energy_sample();
    let picked = session
        .coordinator
        .scheduler()
        .next_task(session.coordinator.tasks().tasks(), sample.level)
        .cloned();

    match picked {
        Some(task) => {
            println!(
                "Next task at {:?} energy: {} ({}, {} pomodoros estimated)",
                sample.level, task.title, task.id, task.estimated_pomodoros
            );
        }
        None => println!(
            "No task fits the current {:?} energy level.",
            sample.level
        ),
    }

    session.save()?;
    Ok(())
}
