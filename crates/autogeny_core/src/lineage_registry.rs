//! Registry of every ancestral line that has existed in a run.
//!
//! Replication preserves causal ancestry: offspring inherit the parent's
//! lineage id, and the registry tracks demographics per line from the
//! birth and death call sites.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// High-level metrics for one ancestral line.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LineageRecord {
    pub id: Uuid,
    pub total_organisms_produced: usize,
    pub current_population: usize,
    pub peak_population: usize,
    pub max_generation: u32,
    pub first_appearance_update: u64,
    pub is_extinct: bool,
}

impl LineageRecord {
    fn new(id: Uuid, update: u64) -> Self {
        Self {
            id,
            total_organisms_produced: 0,
            current_population: 0,
            peak_population: 0,
            max_generation: 0,
            first_appearance_update: update,
            is_extinct: false,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct LineageRegistry {
    pub lineages: HashMap<Uuid, LineageRecord>,
}

impl LineageRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_birth(&mut self, id: Uuid, generation: u32, update: u64) {
        let entry = self
            .lineages
            .entry(id)
            .or_insert_with(|| LineageRecord::new(id, update));
        entry.total_organisms_produced += 1;
        entry.current_population += 1;
        if entry.current_population > entry.peak_population {
            entry.peak_population = entry.current_population;
        }
        if generation > entry.max_generation {
            entry.max_generation = generation;
        }
        entry.is_extinct = false;
    }

    pub fn record_death(&mut self, id: Uuid) {
        if let Some(record) = self.lineages.get_mut(&id) {
            record.current_population = record.current_population.saturating_sub(1);
            if record.current_population == 0 {
                record.is_extinct = true;
            }
        }
    }

    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&LineageRecord> {
        self.lineages.get(&id)
    }

    #[must_use]
    pub fn extinct_count(&self) -> usize {
        self.lineages.values().filter(|r| r.is_extinct).count()
    }
}
