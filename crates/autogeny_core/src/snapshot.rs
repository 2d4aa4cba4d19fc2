//! Per-update population snapshots for external consumers.

use crate::arena::Arena;
use serde::{Deserialize, Serialize};
use autogeny_data::OrganismId;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganismSummary {
    pub id: OrganismId,
    pub merit: f64,
    pub genome_len: usize,
    pub birth_update: u64,
    pub generation: u32,
    pub lineage: Uuid,
}

/// Lightweight view of the population at the end of an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationSnapshot {
    pub update: u64,
    pub population: usize,
    pub organisms: Vec<OrganismSummary>,
}

impl PopulationSnapshot {
    #[must_use]
    pub fn capture(update: u64, arena: &Arena) -> Self {
        let organisms: Vec<OrganismSummary> = arena
            .iter()
            .map(|(id, org)| OrganismSummary {
                id,
                merit: org.merit,
                genome_len: org.genome.len(),
                birth_update: org.birth_update,
                generation: org.generation,
                lineage: org.lineage,
            })
            .collect();
        Self {
            update,
            population: organisms.len(),
            organisms,
        }
    }

    /// JSON export for datafile loggers.
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
