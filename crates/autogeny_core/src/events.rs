//! Outbound event queue for external loggers and analysis.
//!
//! The core never consumes its own events. Birth fires synchronously
//! inside replication and death inside replacement, so the queue order
//! always matches the order of population mutation.

use crate::snapshot::PopulationSnapshot;
use crate::tasks::TaskId;
use autogeny_data::OrganismId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Birth {
        parent: OrganismId,
        offspring: OrganismId,
    },
    Death {
        organism: OrganismId,
    },
    TaskPerformed {
        organism: OrganismId,
        task: TaskId,
        amount: f64,
    },
    EndOfUpdate {
        snapshot: PopulationSnapshot,
    },
}

/// FIFO queue, drained once per update by external collaborators.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    queue: VecDeque<Event>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    /// Hands over all pending events in emission order.
    pub fn drain(&mut self) -> Vec<Event> {
        self.queue.drain(..).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.queue.iter()
    }
}
