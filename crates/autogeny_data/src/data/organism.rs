use super::genome::Genome;
use super::hardware::Hardware;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

/// Inbox depth; older messages are dropped first.
pub const INBOX_DEPTH: usize = 8;

/// Stable arena handle for an organism. `slot` indexes the arena; `epoch`
/// distinguishes successive occupants of the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrganismId {
    pub slot: u32,
    pub epoch: u32,
}

/// Index of a location in the environment's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationId(pub usize);

/// A register-pair payload delivered to another organism's inbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub from: OrganismId,
    pub data: (u32, u32),
}

/// The unit of scheduling: one genome, one virtual CPU, one location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organism {
    /// Birth genome, kept as the heritable record; execution runs on
    /// `hardware.memory`, which starts as a copy of it.
    pub genome: Genome,
    pub hardware: Hardware,
    pub alive: bool,
    /// Scheduling priority (merit). Non-negative; raised by task rewards,
    /// halved or reset on successful replication.
    pub merit: f64,
    pub birth_update: u64,
    pub generation: u32,
    pub lineage: Uuid,
    pub parent: Option<OrganismId>,
    pub location: Option<LocationId>,
    /// Neighbor index currently faced (spatial topologies).
    pub facing: usize,
    pub inbox: VecDeque<Message>,
    /// Completions per registered task, indexed by `TaskId`.
    pub task_counts: Vec<u32>,
    pub cycles_executed: u64,
}

impl Organism {
    #[must_use]
    pub fn new(
        genome: Genome,
        merit: f64,
        birth_update: u64,
        generation: u32,
        lineage: Uuid,
        parent: Option<OrganismId>,
        inputs: Vec<u32>,
    ) -> Self {
        let hardware = Hardware::new(&genome, inputs);
        Self {
            genome,
            hardware,
            alive: true,
            merit,
            birth_update,
            generation,
            lineage,
            parent,
            location: None,
            facing: 0,
            inbox: VecDeque::with_capacity(INBOX_DEPTH),
            task_counts: Vec::new(),
            cycles_executed: 0,
        }
    }

    /// Delivers a message, dropping the oldest when the inbox is full.
    pub fn deliver(&mut self, message: Message) {
        if self.inbox.len() == INBOX_DEPTH {
            self.inbox.pop_front();
        }
        self.inbox.push_back(message);
    }
}
