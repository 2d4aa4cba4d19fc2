//! Priority-weighted round-robin scheduling.
//!
//! Each update grants a fixed cycle budget to the population. Merit
//! buys order entries: `trunc(merit)` per organism, so merit below one
//! earns nothing unless a floor is configured. The world cycles over
//! the shuffled order one ISA cycle at a time, so an organism's cycle
//! share is exactly proportional to its entry count and the shuffle
//! only randomizes who runs first.

use crate::arena::Arena;
use crate::config::{SchedulerConfig, SchedulerMode};
use autogeny_data::OrganismId;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// Total cycles granted to the population this update:
/// `time_slice * min(live, target_population)`.
#[must_use]
pub fn cycle_budget(config: &SchedulerConfig, live: usize) -> u64 {
    config.time_slice * live.min(config.target_population) as u64
}

/// Builds the shuffled execution order for one update. Entries repeat
/// per organism according to the scheduling mode; the world cycles
/// over the order until the budget runs out.
#[must_use]
pub fn build_order(config: &SchedulerConfig, arena: &Arena, rng: &mut ChaCha8Rng) -> Vec<OrganismId> {
    let mut order = Vec::new();
    for (id, organism) in arena.iter() {
        let turns = match config.mode {
            SchedulerMode::RoundRobin => 1,
            SchedulerMode::MeritWeighted => {
                let earned = organism.merit.max(0.0).trunc() as usize;
                earned.max(config.merit_floor_turns)
            }
        };
        for _ in 0..turns {
            order.push(id);
        }
    }
    order.shuffle(rng);
    order
}
