//! Pomodoro sessions and the interruption ledger.
//!
//! `SessionLog` owns both the live session and the completed history.
//! Interruption writes go to the live session (when its id matches) and to
//! the matching history entry in the same call, so the two copies cannot
//! drift. History entries are immutable after completion except for
//! interruptions whose timestamp falls inside the session window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a session was interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterruptionReason {
    Phone,
    Email,
    Social,
    Urgent,
    Other,
}

/// A single interruption, owned by the session it references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interruption {
    pub id: String,
    /// Weak back-reference to the owning session.
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub reason: InterruptionReason,
    pub description: Option<String>,
    /// Seconds. Created at zero; closed later by the caller.
    pub duration_secs: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PomodoroSession {
    pub id: String,
    pub task_id: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// Planned duration in minutes.
    pub duration_min: u32,
    pub completed: bool,
    pub is_break: bool,
    /// Always equal to `interruption_list.len()`.
    pub interruptions: u32,
    #[serde(default)]
    pub interruption_list: Vec<Interruption>,
}

impl PomodoroSession {
    pub fn new(task_id: Option<String>, duration_min: u32, is_break: bool) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            task_id,
            start_time: Utc::now(),
            end_time: None,
            duration_min,
            completed: false,
            is_break,
            interruptions: 0,
            interruption_list: Vec::new(),
        }
    }
}

/// Owner of the live session and the completed session history.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SessionLog {
    current: Option<PomodoroSession>,
    history: Vec<PomodoroSession>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn current(&self) -> Option<&PomodoroSession> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &[PomodoroSession] {
        &self.history
    }

    // ── Session lifecycle (driven by the timer engine) ───────────────

    /// Install a new live session, replacing any previous one.
    pub fn begin(&mut self, session: PomodoroSession) -> &PomodoroSession {
        self.current = Some(session);
        self.current.as_ref().expect("just set")
    }

    /// Discard the live session without a trace.
    pub fn discard(&mut self) -> Option<PomodoroSession> {
        self.current.take()
    }

    /// Finalize the live session and append it to the history.
    /// Returns a clone of the finished session, or None when idle.
    pub fn finish(&mut self, at: DateTime<Utc>) -> Option<PomodoroSession> {
        let mut session = self.current.take()?;
        session.end_time = Some(at);
        session.completed = true;
        self.history.push(session.clone());
        Some(session)
    }

    /// Append an already-finalized session directly to the history.
    /// Used for break records constructed by the coordinator.
    pub fn append(&mut self, session: PomodoroSession) {
        self.history.push(session);
    }

    pub fn restore(&mut self, history: Vec<PomodoroSession>) {
        self.history = history;
        self.current = None;
    }

    // ── Interruption ledger ──────────────────────────────────────────

    /// Record an interruption against `session_id`.
    ///
    /// Writes to the live session and to the matching history entry in the
    /// same call. Returns None when the id resolves in neither place.
    pub fn add_interruption(
        &mut self,
        session_id: &str,
        reason: InterruptionReason,
        description: Option<String>,
    ) -> Option<Interruption> {
        let interruption = Interruption {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            timestamp: Utc::now(),
            reason,
            description,
            duration_secs: 0,
        };

        let mut matched = false;
        if let Some(current) = self.current.as_mut() {
            if current.id == session_id {
                current.interruption_list.push(interruption.clone());
                current.interruptions = current.interruption_list.len() as u32;
                matched = true;
            }
        }
        if let Some(session) = self.history.iter_mut().find(|s| s.id == session_id) {
            session.interruption_list.push(interruption.clone());
            session.interruptions = session.interruption_list.len() as u32;
            matched = true;
        }

        matched.then_some(interruption)
    }

    /// Remove an interruption by id from both locations.
    ///
    /// The counter is recomputed from the list length rather than
    /// decremented, so it cannot drift.
    pub fn remove_interruption(&mut self, id: &str) -> bool {
        let mut removed = false;
        if let Some(current) = self.current.as_mut() {
            let before = current.interruption_list.len();
            current.interruption_list.retain(|i| i.id != id);
            if current.interruption_list.len() != before {
                removed = true;
            }
            current.interruptions = current.interruption_list.len() as u32;
        }
        for session in &mut self.history {
            let before = session.interruption_list.len();
            session.interruption_list.retain(|i| i.id != id);
            if session.interruption_list.len() != before {
                removed = true;
                session.interruptions = session.interruption_list.len() as u32;
            }
        }
        removed
    }
}
