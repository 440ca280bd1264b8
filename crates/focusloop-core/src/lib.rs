//! # Focusloop Core Library
//!
//! Core business logic for the Focusloop focus timer: the pomodoro state
//! machine, the interruption ledger, energy-aware task scheduling, task
//! complexity scoring and the XP/level progression engine.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a state machine driven by an external 1 Hz `tick()`
//!   caller; it holds no timer thread of its own
//! - **Coordinator**: one-directional composition -- timer completions flow
//!   into progression, the task store and the scheduler; components never
//!   call each other directly
//! - **Storage**: TOML configuration plus JSON state snapshots; in-memory
//!   state is always the source of truth
//! - **Sync**: mutating store calls enqueue fire-and-forget intents on an
//!   injected [`Persister`]
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: pomodoro/break state machine
//! - [`TaskScheduler`]: energy-aware next-task selection
//! - [`ComplexityScorer`]: deterministic task complexity scoring
//! - [`EnergyModel`]: pull-model energy estimation
//! - [`ProgressionEngine`]: XP, levels, streaks, badges, achievements

pub mod complexity;
pub mod coordinator;
pub mod energy;
pub mod error;
pub mod events;
pub mod progression;
pub mod scheduler;
pub mod session;
pub mod storage;
pub mod sync;
pub mod task;
pub mod timer;

pub use complexity::{complexity_stats, ComplexityLevel, ComplexityScore, ComplexityScorer};
pub use coordinator::Coordinator;
pub use energy::{analyze_energy_patterns, EnergyLevel, EnergyModel, EnergySample};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use progression::{Badge, ProgressionEngine, UserStats};
pub use scheduler::{RescheduleSettings, TaskScheduler};
pub use session::{Interruption, InterruptionReason, PomodoroSession, SessionLog};
pub use storage::{Config, StateStore};
pub use sync::{MutationKind, NullPersister, Persister, SyncQueue, SyncQueueEntry};
pub use task::{Task, TaskPriority, TaskStore};
pub use timer::{TimerConfig, TimerEngine, TimerPhase};
