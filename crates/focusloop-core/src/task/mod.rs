//! Task records and the canonical task store.
//!
//! `TaskStore` owns the task set. Mutations go through its operations and
//! enqueue a matching sync intent on the injected [`Persister`]; nothing
//! else writes tasks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sync::{MutationKind, Persister, SyncQueueEntry};

/// Task priority. Ordering is part of the scheduler contract:
/// `High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: String,
    /// Task title
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Estimated number of pomodoros (at least 1)
    pub estimated_pomodoros: u32,
    /// Number of completed pomodoros. May exceed the estimate; an
    /// over-complete task signals under-estimation and is kept as-is.
    pub completed_pomodoros: u32,
    pub priority: TaskPriority,
    /// Tags for categorization
    #[serde(default)]
    pub tags: Vec<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new task with default values.
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Task {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            description: None,
            estimated_pomodoros: 1,
            completed_pomodoros: 0,
            priority: TaskPriority::default(),
            tags: Vec::new(),
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_estimate(mut self, pomodoros: u32) -> Self {
        self.estimated_pomodoros = pomodoros.max(1);
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// Canonical owner of the task set.
pub struct TaskStore {
    tasks: Vec<Task>,
    persister: Box<dyn Persister>,
}

impl TaskStore {
    pub fn new(persister: Box<dyn Persister>) -> Self {
        Self {
            tasks: Vec::new(),
            persister,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Add a task and enqueue a CREATE_TASK intent.
    pub fn add(&mut self, task: Task) -> &Task {
        self.enqueue(MutationKind::CreateTask, &task);
        self.tasks.push(task);
        self.tasks.last().expect("just pushed")
    }

    /// Apply `f` to the task with `id`, bump `updated_at`, enqueue an
    /// UPDATE_TASK intent. Returns false when the id does not resolve.
    pub fn update<F: FnOnce(&mut Task)>(&mut self, id: &str, f: F) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        f(task);
        task.updated_at = Utc::now();
        let snapshot = task.clone();
        self.enqueue(MutationKind::UpdateTask, &snapshot);
        true
    }

    /// Remove a task. Tasks are never deleted implicitly, only through here.
    pub fn remove(&mut self, id: &str) -> Option<Task> {
        let pos = self.tasks.iter().position(|t| t.id == id)?;
        let task = self.tasks.remove(pos);
        self.enqueue(MutationKind::DeleteTask, &task);
        Some(task)
    }

    /// Record one completed pomodoro against a task.
    pub fn record_pomodoro(&mut self, id: &str) -> bool {
        self.update(id, |t| t.completed_pomodoros += 1)
    }

    pub fn set_completed(&mut self, id: &str, completed: bool) -> bool {
        self.update(id, |t| t.completed = completed)
    }

    /// Replace the full task set without enqueueing sync intents.
    /// Used when restoring a persisted snapshot.
    pub fn restore(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    fn enqueue(&mut self, kind: MutationKind, task: &Task) {
        let payload = serde_json::to_value(task).unwrap_or(serde_json::Value::Null);
        self.persister
            .enqueue_mutation(SyncQueueEntry::new(kind, payload));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::NullPersister;

    fn store() -> TaskStore {
        TaskStore::new(Box::new(NullPersister))
    }

    #[test]
    fn test_add_and_get() {
        let mut store = store();
        let id = store.add(Task::new("Write report")).id.clone();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&id).unwrap().title, "Write report");
    }

    #[test]
    fn test_update_bumps_updated_at() {
        let mut store = store();
        let id = store.add(Task::new("a")).id.clone();
        let before = store.get(&id).unwrap().updated_at;
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(store.update(&id, |t| t.title = "b".into()));
        let task = store.get(&id).unwrap();
        assert_eq!(task.title, "b");
        assert!(task.updated_at > before);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut store = store();
        assert!(!store.update("missing", |t| t.title = "x".into()));
    }

    #[test]
    fn test_over_completion_is_allowed() {
        let mut store = store();
        let id = store.add(Task::new("small").with_estimate(1)).id.clone();
        assert!(store.record_pomodoro(&id));
        assert!(store.record_pomodoro(&id));
        assert_eq!(store.get(&id).unwrap().completed_pomodoros, 2);
        assert_eq!(store.get(&id).unwrap().estimated_pomodoros, 1);
    }

    #[test]
    fn test_mutations_enqueue_sync_entries() {
        use std::cell::RefCell;
        use std::rc::Rc;

        struct Capture(Rc<RefCell<Vec<SyncQueueEntry>>>);
        impl Persister for Capture {
            fn enqueue_mutation(&mut self, entry: SyncQueueEntry) {
                self.0.borrow_mut().push(entry);
            }
        }

        let captured = Rc::new(RefCell::new(Vec::new()));
        let mut store = TaskStore::new(Box::new(Capture(captured.clone())));
        let id = store.add(Task::new("a")).id.clone();
        store.record_pomodoro(&id);
        store.remove(&id);

        let entries = captured.borrow();
        let kinds: Vec<_> = entries.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                MutationKind::CreateTask,
                MutationKind::UpdateTask,
                MutationKind::DeleteTask
            ]
        );
        assert!(entries.iter().all(|e| e.max_retries == 3));
        assert_eq!(entries[0].payload["title"], "a");
    }

    #[test]
    fn test_restore_does_not_sync() {
        let mut store = store();
        store.restore(vec![Task::new("x"), Task::new("y")]);
        assert_eq!(store.len(), 2);
    }
}
