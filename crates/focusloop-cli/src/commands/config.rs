//! Configuration management.

use clap::Subcommand;
use std::error::Error;

use focusloop_core::storage::{data_dir, Config};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Change timer durations and goals
    Set {
        /// Focus duration in minutes
        #[arg(long)]
        pomodoro_min: Option<u32>,
        /// Short break duration in minutes
        #[arg(long)]
        short_break_min: Option<u32>,
        /// Long break duration in minutes
        #[arg(long)]
        long_break_min: Option<u32>,
        /// Pomodoros before a long break
        #[arg(long)]
        pomodoros_before_long_break: Option<u32>,
        /// Daily pomodoro goal
        #[arg(long)]
        daily_goal: Option<u32>,
    },
    /// Print the data directory path
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load_or_default();
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigAction::Set {
            pomodoro_min,
            short_break_min,
            long_break_min,
            pomodoros_before_long_break,
            daily_goal,
        } => {
            let mut config = Config::load_or_default();
            if let Some(v) = pomodoro_min {
                config.timer.pomodoro_min = v.max(1);
            }
            if let Some(v) = short_break_min {
                config.timer.short_break_min = v.max(1);
            }
            if let Some(v) = long_break_min {
                config.timer.long_break_min = v.max(1);
            }
            if let Some(v) = pomodoros_before_long_break {
                config.timer.pomodoros_before_long_break = v.max(1);
            }
            if let Some(v) = daily_goal {
                config.goals.daily_goal = v.max(1);
            }
            config.save()?;
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", data_dir()?.display());
            Ok(())
        }
    }
}
