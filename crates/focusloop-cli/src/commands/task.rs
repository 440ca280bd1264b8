//! Task management commands.

use clap::Subcommand;
use std::error::Error;

use focusloop_core::{ComplexityScorer, Task, TaskPriority};

use super::Session;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Create {
        /// Task title
        title: String,
        /// Task description
        #[arg(long)]
        description: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
        /// Estimated pomodoros (default: 1)
        #[arg(long, default_value = "1")]
        estimated_pomodoros: u32,
        /// Priority: low, medium or high (default: medium)
        #[arg(long, default_value = "medium")]
        priority: String,
    },
    /// List tasks
    List {
        /// Include completed tasks
        #[arg(long)]
        all: bool,
    },
    /// Get task details as JSON
    Get {
        /// Task ID
        id: String,
    },
    /// Update a task
    Update {
        /// Task ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
        /// New estimated pomodoros
        #[arg(long)]
        estimated_pomodoros: Option<u32>,
        /// New priority
        #[arg(long)]
        priority: Option<String>,
    },
    /// Mark a task completed
    Complete {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Show the complexity score for a task
    Score {
        /// Task ID
        id: String,
    },
}

fn parse_priority(value: &str) -> Result<TaskPriority, Box<dyn Error>> {
    match value.to_lowercase().as_str() {
        "low" => Ok(TaskPriority::Low),
        "medium" => Ok(TaskPriority::Medium),
        "high" => Ok(TaskPriority::High),
        other => Err(format!("Invalid priority: '{other}'. Use low, medium or high").into()),
    }
}

fn parse_tags(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn Error>> {
    let mut session = Session::open()?;

    match action {
        TaskAction::Create {
            title,
            description,
            tags,
            estimated_pomodoros,
            priority,
        } => {
            let mut task = Task::new(title)
                .with_estimate(estimated_pomodoros)
                .with_priority(parse_priority(&priority)?);
            task.description = description;
            if let Some(tags) = tags {
                task.tags = parse_tags(&tags);
            }
            let created = session.coordinator.tasks_mut().add(task).clone();
            session.save()?;
            println!("Task created: {}", created.id);
            println!("{}", serde_json::to_string_pretty(&created)?);
        }
        TaskAction::List { all } => {
            for task in session.coordinator.tasks().tasks() {
                if task.completed && !all {
                    continue;
                }
                let marker = if task.completed { "x" } else { " " };
                println!(
                    "[{marker}] {}  {} ({:?}, {}/{} pomodoros)",
                    task.id, task.title, task.priority, task.completed_pomodoros,
                    task.estimated_pomodoros
                );
            }
        }
        TaskAction::Get { id } => {
            let task = session
                .coordinator
                .tasks()
                .get(&id)
                .ok_or_else(|| format!("No task with id {id}"))?;
            println!("{}", serde_json::to_string_pretty(task)?);
        }
        TaskAction::Update {
            id,
            title,
            description,
            tags,
            estimated_pomodoros,
            priority,
        } => {
            let priority = priority.as_deref().map(parse_priority).transpose()?;
            let updated = session.coordinator.tasks_mut().update(&id, |task| {
                if let Some(title) = title {
                    task.title = title;
                }
                if let Some(description) = description {
                    task.description = Some(description);
                }
                if let Some(tags) = tags {
                    task.tags = parse_tags(&tags);
                }
                if let Some(estimate) = estimated_pomodoros {
                    task.estimated_pomodoros = estimate.max(1);
                }
                if let Some(priority) = priority {
                    task.priority = priority;
                }
            });
            if !updated {
                return Err(format!("No task with id {id}").into());
            }
            session.save()?;
            println!("Task updated: {id}");
        }
        TaskAction::Complete { id } => {
            let events = session.coordinator.complete_task(&id);
            if events.is_empty() {
                return Err(format!("No task with id {id}").into());
            }
            session.save()?;
            println!("Task completed: {id}");
        }
        TaskAction::Delete { id } => {
            if session.coordinator.tasks_mut().remove(&id).is_none() {
                return Err(format!("No task with id {id}").into());
            }
            session.save()?;
            println!("Task deleted: {id}");
        }
        TaskAction::Score { id } => {
            let task = session
                .coordinator
                .tasks()
                .get(&id)
                .ok_or_else(|| format!("No task with id {id}"))?;
            let score = ComplexityScorer::score(task);
            println!(
                "{}: {:.1}/100 ({})",
                task.title,
                score.overall,
                score.level.label()
            );
            println!(
                "Difficulty {}/10, time multiplier x{:.2}",
                score.estimated_difficulty, score.time_multiplier
            );
            for recommendation in &score.recommendations {
                println!("  - {recommendation}");
            }
        }
    }
    Ok(())
}
