//! Energy estimation commands.

use clap::Subcommand;
use std::error::Error;

use super::Session;

#[derive(Subcommand)]
pub enum EnergyAction {
    /// Compute the current energy estimate
    Show,
}

pub fn run(action: EnergyAction) -> Result<(), Box<dyn Error>> {
    match action {
        EnergyAction::Show => show(),
    }
}

fn show() -> Result<(), Box<dyn Error>> {
    let mut session = Session::open()?;

    let previous = session.coordinator.cached_energy().cloned();
    let sample = session.coordinator.energy_sample();

    println!("Energy level: {:?}", sample.level);
    println!("  time of day:     {:.2}", sample.factors.time_of_day);
    println!("  recent activity: {:.2}", sample.factors.recent_activity);
    println!("  break quality:   {:.2}", sample.factors.break_quality);
    println!(
        "Consecutive pomodoros: {}",
        session.coordinator.scheduler().consecutive_pomodoros()
    );
    match session.coordinator.scheduler().last_break_time() {
        Some(at) => println!("Last break: {}", at.format("%Y-%m-%d %H:%M UTC")),
        None => println!("Last break: none recorded"),
    }
    if let Some(previous) = previous {
        if previous.level != sample.level {
            println!(
                "(changed from {:?} at {})",
                previous.level,
                previous.timestamp.format("%H:%M")
            );
        }
    }

    session.save()?;
    Ok(())
}
