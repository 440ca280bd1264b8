//! Interactive timer commands. The run loop is the 1 Hz tick driver the
//! core expects.

use clap::Subcommand;
use std::error::Error;

use focusloop_core::{Event, TimerPhase};

use super::{format_clock, Session};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run a pomodoro to completion (Ctrl-C abandons it without a trace)
    Run {
        /// Task ID to attach the session to
        #[arg(long)]
        task: Option<String>,
    },
    /// Run a break to completion
    Break {
        /// Force a long break
        #[arg(long)]
        long: bool,
    },
    /// Show timer configuration and state
    Status,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn Error>> {
    match action {
        TimerAction::Run { task } => run_pomodoro(task),
        TimerAction::Break { long } => run_break(long),
        TimerAction::Status => status(),
    }
}

fn run_pomodoro(task: Option<String>) -> Result<(), Box<dyn Error>> {
    let mut session = Session::open()?;

    let events = session.coordinator.start_pomodoro(task.as_deref());
    if events.is_empty() {
        println!("Timer is already active.");
        return Ok(());
    }
    if let Some(Event::PomodoroStarted {
        task_id, duration_secs, ..
    }) = events.first()
    {
        match task_id {
            Some(id) => println!("Focus started on task {id} ({})", format_clock(*duration_secs)),
            None => println!("Focus started ({})", format_clock(*duration_secs)),
        }
    }

    drive_to_idle(&mut session)?;
    session.save()?;
    Ok(())
}

fn run_break(long: bool) -> Result<(), Box<dyn Error>> {
    let mut session = Session::open()?;

    // Without --long the coordinator decides short vs long from the cadence.
    let events = if long {
        session.coordinator.start_break_with(true)
    } else {
        session.coordinator.start_break()
    };
    if events.is_empty() {
        println!("Timer is already active.");
        return Ok(());
    }
    println!("Break started.");

    drive_to_idle(&mut session)?;
    session.save()?;
    Ok(())
}

/// Tick at 1 Hz until the timer returns to idle, echoing events.
fn drive_to_idle(session: &mut Session) -> Result<(), Box<dyn Error>> {
    loop {
        std::thread::sleep(std::time::Duration::from_secs(1));
        for event in session.coordinator.tick() {
            report(&event);
        }
        let timer = session.coordinator.timer();
        if timer.phase() == TimerPhase::Idle {
            return Ok(());
        }
        if timer.is_running() {
            print!("\r  {} remaining   ", format_clock(timer.time_left_secs()));
            use std::io::Write;
            std::io::stdout().flush().ok();
        }
    }
}

fn report(event: &Event) {
    match event {
        Event::PomodoroCompleted { duration_min, .. } => {
            println!("\nPomodoro complete ({duration_min} min).")
        }
        Event::BreakStarted { long, .. } => {
            println!("\n{} break starting.", if *long { "Long" } else { "Short" })
        }
        Event::BreakCompleted { .. } => println!("\nBreak complete."),
        Event::XpAwarded { amount, total_xp, .. } => {
            println!("+{amount} XP (total {total_xp})")
        }
        Event::LevelUp { level, .. } => println!("Level up! Now level {level}."),
        Event::BadgeUnlocked { badge_id, .. } => println!("Badge unlocked: {badge_id}"),
        Event::AchievementUnlocked { achievement_id, .. } => {
            println!("Achievement unlocked: {achievement_id}")
        }
        Event::TaskSelected { task_id, .. } => println!("Next up: task {task_id}"),
        _ => {}
    }
}

fn status() -> Result<(), Box<dyn Error>> {
    let session = Session::open()?;
    let timer = session.coordinator.timer();
    let config = timer.config();

    println!("Phase: {:?}", timer.phase());
    println!(
        "Durations: {} min focus / {} min short break / {} min long break",
        config.pomodoro_min, config.short_break_min, config.long_break_min
    );
    println!(
        "Long break after {} pomodoros",
        config.pomodoros_before_long_break
    );
    println!(
        "Sessions recorded: {}",
        session.coordinator.timer().log().history().len()
    );
    Ok(())
}
