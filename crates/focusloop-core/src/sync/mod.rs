//! Offline sync queue and the `Persister` seam.
//!
//! Every mutating store call enqueues a durable-write intent. The core
//! never waits on (or learns about) transport delivery; in-memory state is
//! the immediate source of truth and the queue is fire-and-forget.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default retry budget handed to the external transport.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Kind of mutation carried by a queue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MutationKind {
    CreateTask,
    UpdateTask,
    DeleteTask,
}

/// A durable-write intent consumed by the external sync transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncQueueEntry {
    pub kind: MutationKind,
    pub payload: serde_json::Value,
    pub max_retries: u32,
}

impl SyncQueueEntry {
    pub fn new(kind: MutationKind, payload: serde_json::Value) -> Self {
        Self {
            kind,
            payload,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// Capability to enqueue durable-write intents.
///
/// Injected into the stores; the transport that drains the queue is out of
/// scope for the core.
pub trait Persister {
    fn enqueue_mutation(&mut self, entry: SyncQueueEntry);
}

/// Persister that drops every entry. For tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct NullPersister;

impl Persister for NullPersister {
    fn enqueue_mutation(&mut self, _entry: SyncQueueEntry) {}
}

/// Append-only FIFO queue for pending mutations.
///
/// Order is preserved; entries leave the queue only through
/// [`SyncQueue::drain_up_to`].
#[derive(Debug, Default)]
pub struct SyncQueue {
    pending: Vec<SyncQueueEntry>,
    /// Persistent queue file path, if any.
    queue_file: Option<PathBuf>,
}

impl SyncQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a queue backed by a JSON file.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            pending: Vec::new(),
            queue_file: Some(path),
        }
    }

    /// Remove and return up to `n` entries from the front of the queue.
    pub fn drain_up_to(&mut self, n: usize) -> Vec<SyncQueueEntry> {
        let n = n.min(self.pending.len());
        self.pending.drain(..n).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Persist pending entries to disk. No-op without a backing path.
    pub fn persist(&self) -> Result<(), std::io::Error> {
        let Some(path) = &self.queue_file else {
            return Ok(());
        };
        let data = serde_json::to_string_pretty(&self.pending)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Load pending entries from disk, appending after anything already queued.
    pub fn load(&mut self) -> Result<(), std::io::Error> {
        let Some(path) = &self.queue_file else {
            return Ok(());
        };
        if !path.exists() {
            return Ok(());
        }
        let content = std::fs::read_to_string(path)?;
        let loaded: Vec<SyncQueueEntry> = serde_json::from_str(&content)?;
        self.pending.extend(loaded);
        Ok(())
    }
}

impl Persister for SyncQueue {
    fn enqueue_mutation(&mut self, entry: SyncQueueEntry) {
        self.pending.push(entry);
    }
}
