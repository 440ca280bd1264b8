pub mod config;
pub mod energy;
pub mod reschedule;
pub mod stats;
pub mod task;
pub mod timer;

use std::cell::RefCell;
use std::error::Error;
use std::rc::Rc;

use focusloop_core::storage::{data_dir, Config};
use focusloop_core::sync::{Persister, SyncQueue, SyncQueueEntry};
use focusloop_core::{Coordinator, StateStore};

/// Persister handle that lets the CLI keep a reference to the queue after
/// boxing it into the coordinator.
pub struct SharedQueue(Rc<RefCell<SyncQueue>>);

impl Persister for SharedQueue {
    fn enqueue_mutation(&mut self, entry: SyncQueueEntry) {
        self.0.borrow_mut().enqueue_mutation(entry);
    }
}

/// A coordinator wired to the on-disk state plus the sync queue behind it.
pub struct Session {
    pub coordinator: Coordinator,
    store: StateStore,
    queue: Rc<RefCell<SyncQueue>>,
}

impl Session {
    /// Load configuration, snapshots and the pending sync queue.
    pub fn open() -> Result<Self, Box<dyn Error>> {
        let config = Config::load_or_default();
        let store = StateStore::open()?;

        let mut queue = SyncQueue::with_path(data_dir()?.join("sync-queue.json"));
        queue.load()?;
        let queue = Rc::new(RefCell::new(queue));

        let mut coordinator = Coordinator::new(config, Box::new(SharedQueue(queue.clone())));
        coordinator.load_from(&store);

        Ok(Self {
            coordinator,
            store,
            queue,
        })
    }

    /// Write snapshots and the pending queue back to disk.
    pub fn save(&self) -> Result<(), Box<dyn Error>> {
        self.coordinator.save_to(&self.store)?;
        self.queue.borrow().persist()?;
        Ok(())
    }
}

/// Render seconds as M:SS.
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
