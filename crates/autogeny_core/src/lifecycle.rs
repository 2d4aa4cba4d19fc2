//! Organism construction and the merit bookkeeping around a divide.

use crate::config::{MeritPolicy, SimConfig};
use crate::isa::Isa;
use autogeny_data::{Genome, Organism, OrganismId};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

/// Builds a generation-zero founder with a fresh lineage id drawn from
/// the world RNG, so seeded runs assign identical lineages.
#[must_use]
pub fn create_ancestor_with_rng(
    genome: Genome,
    config: &SimConfig,
    update: u64,
    rng: &mut ChaCha8Rng,
) -> Organism {
    Organism::new(
        genome,
        config.world.initial_merit,
        update,
        0,
        Uuid::from_u128(rng.gen()),
        None,
        config.world.inputs.clone(),
    )
}

/// Builds an offspring from an extracted (already mutated) genome.
/// Offspring start at the configured initial merit and inherit the
/// parent's lineage unchanged.
#[must_use]
pub fn create_offspring(
    parent: &Organism,
    parent_id: OrganismId,
    genome: Genome,
    config: &SimConfig,
    update: u64,
) -> Organism {
    Organism::new(
        genome,
        config.world.initial_merit,
        update,
        parent.generation.saturating_add(1),
        parent.lineage,
        Some(parent_id),
        config.world.inputs.clone(),
    )
}

/// Settles the parent's merit after a successful divide.
pub fn apply_divide_merit(parent: &mut Organism, policy: MeritPolicy, initial_merit: f64) {
    match policy {
        MeritPolicy::Halve => parent.merit /= 2.0,
        MeritPolicy::Reset => parent.merit = initial_merit,
    }
}

/// The hand-written founder: a nop body followed by the four-instruction
/// copy loop. Gestates in 25 cycles under the canonical instruction set.
#[must_use]
pub fn default_ancestor(isa: &Isa) -> Option<Genome> {
    let mut names = vec!["nop_a"; 9];
    names.extend(["h_alloc", "h_search", "h_copy", "h_divide"]);
    let codons = names
        .into_iter()
        .map(|name| isa.opcode_of(name))
        .collect::<Option<Vec<_>>>()?;
    Genome::new(codons)
}
