//! Pomodoro timer state machine.
//!
//! The engine holds no wall-clock timer of its own -- an external 1 Hz
//! driver calls `tick()` and every other entry point is a synchronous user
//! action. All operations are total: an invalid transition is a silent
//! no-op, never an error.
//!
//! ## State transitions
//!
//! ```text
//! Idle -> Focus -> Idle          (complete or stop)
//! Idle -> Break -> Idle
//! ```
//!
//! Paused is not a distinct structural state: it is Focus/Break with the
//! `is_running` flag cleared.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::session::{PomodoroSession, SessionLog};

/// Timer durations in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_pomodoro_min")]
    pub pomodoro_min: u32,
    #[serde(default = "default_short_break_min")]
    pub short_break_min: u32,
    #[serde(default = "default_long_break_min")]
    pub long_break_min: u32,
    #[serde(default = "default_pomodoros_before_long_break")]
    pub pomodoros_before_long_break: u32,
}

fn default_pomodoro_min() -> u32 {
    25
}
fn default_short_break_min() -> u32 {
    5
}
fn default_long_break_min() -> u32 {
    15
}
fn default_pomodoros_before_long_break() -> u32 {
    4
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            pomodoro_min: default_pomodoro_min(),
            short_break_min: default_short_break_min(),
            long_break_min: default_long_break_min(),
            pomodoros_before_long_break: default_pomodoros_before_long_break(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Focus,
    Break,
}

/// Core timer engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    config: TimerConfig,
    phase: TimerPhase,
    /// Cleared while paused; the phase is unchanged.
    is_running: bool,
    time_left_secs: u32,
    sessions: SessionLog,
}

impl TimerEngine {
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            phase: TimerPhase::Idle,
            is_running: false,
            time_left_secs: 0,
            sessions: SessionLog::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn time_left_secs(&self) -> u32 {
        self.time_left_secs
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn current_session(&self) -> Option<&PomodoroSession> {
        self.sessions.current()
    }

    pub fn log(&self) -> &SessionLog {
        &self.sessions
    }

    pub fn log_mut(&mut self) -> &mut SessionLog {
        &mut self.sessions
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a new pomodoro. No-op unless idle.
    ///
    /// The engine stores whatever task id it is given; resolving the id
    /// against the task store is the caller's job, and an unresolved id is
    /// treated as "no task" there.
    pub fn start_pomodoro(&mut self, task_id: Option<String>) -> Option<Event> {
        if self.phase != TimerPhase::Idle {
            return None;
        }
        let session = self
            .sessions
            .begin(PomodoroSession::new(task_id, self.config.pomodoro_min, false));
        let session_id = session.id.clone();
        let session_task = session.task_id.clone();

        self.phase = TimerPhase::Focus;
        self.is_running = true;
        self.time_left_secs = self.config.pomodoro_min * 60;

        Some(Event::PomodoroStarted {
            session_id,
            task_id: session_task,
            duration_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    /// Pause the running timer. No-op when idle or already paused.
    pub fn pause(&mut self) -> Option<Event> {
        if self.phase == TimerPhase::Idle || !self.is_running {
            return None;
        }
        self.is_running = false;
        Some(Event::TimerPaused {
            time_left_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    /// Resume a paused timer. No-op when idle or already running.
    pub fn resume(&mut self) -> Option<Event> {
        if self.phase == TimerPhase::Idle || self.is_running {
            return None;
        }
        self.is_running = true;
        Some(Event::TimerResumed {
            time_left_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    /// Abandon the current pomodoro or break and return to idle.
    ///
    /// Destructive: the in-flight session is discarded without touching the
    /// history. This is the only cancellation primitive.
    pub fn stop(&mut self) -> Option<Event> {
        if self.phase == TimerPhase::Idle {
            return None;
        }
        self.sessions.discard();
        self.phase = TimerPhase::Idle;
        self.is_running = false;
        self.time_left_secs = 0;
        Some(Event::TimerStopped { at: Utc::now() })
    }

    /// Advance the clock by one second. The external driver is expected to
    /// call this at 1 Hz; no-op unless running with time remaining.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.is_running || self.time_left_secs == 0 {
            return None;
        }
        self.time_left_secs -= 1;
        if self.time_left_secs > 0 {
            return None;
        }
        match self.phase {
            TimerPhase::Break => self.complete_break(),
            _ => self.complete_pomodoro(),
        }
    }

    /// Finalize the current pomodoro into the history. No-op when no
    /// session is in flight.
    pub fn complete_pomodoro(&mut self) -> Option<Event> {
        let now = Utc::now();
        let finished = self.sessions.finish(now)?;
        self.phase = TimerPhase::Idle;
        self.is_running = false;
        self.time_left_secs = 0;
        Some(Event::PomodoroCompleted {
            session_id: finished.id,
            task_id: finished.task_id,
            duration_min: finished.duration_min,
            at: now,
        })
    }

    /// Begin a short or long break. No-op unless idle.
    ///
    /// No session record is created here; callers wanting break history
    /// construct one explicitly.
    pub fn start_break(&mut self, long: bool) -> Option<Event> {
        if self.phase != TimerPhase::Idle {
            return None;
        }
        let minutes = if long {
            self.config.long_break_min
        } else {
            self.config.short_break_min
        };
        self.phase = TimerPhase::Break;
        self.is_running = true;
        self.time_left_secs = minutes * 60;
        Some(Event::BreakStarted {
            long,
            duration_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    /// End the break and return to idle. No-op unless in a break.
    pub fn complete_break(&mut self) -> Option<Event> {
        if self.phase != TimerPhase::Break {
            return None;
        }
        self.phase = TimerPhase::Idle;
        self.is_running = false;
        self.time_left_secs = 0;
        Some(Event::BreakCompleted { at: Utc::now() })
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(TimerConfig::default())
    }
}
