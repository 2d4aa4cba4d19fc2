//! The replication pipeline: heritable variation and offspring placement.
//!
//! Mutation happens once per divide, on the extracted child genome only;
//! the parent's tape is never touched. Placement is a pure policy over
//! the environment; a `None` target means no birth this divide, which is
//! a quiet outcome rather than an error.

use crate::config::{MutationConfig, PlacementStrategy};
use crate::environment::{Environment, Topology};
use autogeny_data::{Codon, Genome, LocationId};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Applies the configured mutation operators to a child genome:
/// per-codon substitution, then at most one insertion burst and one
/// deletion burst. Substituted and inserted codons are drawn uniformly
/// from the opcode range.
pub fn mutate(genome: &mut Genome, config: &MutationConfig, isa_len: usize, rng: &mut ChaCha8Rng) {
    let opcode_range = isa_len.max(1) as Codon;
    if config.point_mut_prob > 0.0 {
        for i in 0..genome.len() {
            if rng.gen_bool(config.point_mut_prob) {
                genome.set(i, rng.gen_range(0..opcode_range));
            }
        }
    }
    if config.insertion_prob > 0.0 && rng.gen_bool(config.insertion_prob) {
        let burst = rng.gen_range(1..=config.indel_max.max(1));
        for _ in 0..burst {
            let at = rng.gen_range(0..=genome.len());
            genome.insert(at, rng.gen_range(0..opcode_range));
        }
    }
    if config.deletion_prob > 0.0 && rng.gen_bool(config.deletion_prob) {
        let burst = rng.gen_range(1..=config.indel_max.max(1));
        for _ in 0..burst {
            let at = rng.gen_range(0..genome.len());
            genome.remove(at);
        }
    }
}

/// Picks the offspring's location relative to the parent, or `None`
/// when the strategy yields no legal site this divide.
#[must_use]
pub fn choose_location(
    env: &Environment,
    parent_at: LocationId,
    facing: usize,
    strategy: PlacementStrategy,
    rng: &mut ChaCha8Rng,
) -> Option<LocationId> {
    match strategy {
        PlacementStrategy::FirstNeighbor => env.neighborhood(parent_at).first().copied(),
        PlacementStrategy::RandomNeighbor => match env.topology {
            Topology::Grid { .. } => {
                let neighbors = env.neighborhood(parent_at);
                if neighbors.is_empty() {
                    None
                } else {
                    Some(neighbors[rng.gen_range(0..neighbors.len())])
                }
            }
            Topology::WellMixed { .. } => Some(env.neighbor(parent_at, 0, rng)),
        },
        PlacementStrategy::EmptyNeighbor => env
            .neighborhood(parent_at)
            .into_iter()
            .find(|&id| env.occupant(id).is_none()),
        PlacementStrategy::EmptyFacingNeighbor => {
            let target = env.neighbor(parent_at, facing, rng);
            if env.occupant(target).is_none() {
                Some(target)
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EnvironmentConfig, TopologyKind};
    use autogeny_data::OrganismId;
    use rand::SeedableRng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(11)
    }

    #[test]
    fn test_zero_rates_leave_genome_unchanged() {
        let mut genome = Genome::new(vec![1, 2, 3, 4]).unwrap();
        let config = MutationConfig {
            point_mut_prob: 0.0,
            insertion_prob: 0.0,
            deletion_prob: 0.0,
            indel_max: 1,
        };
        mutate(&mut genome, &config, 27, &mut rng());
        assert_eq!(genome.as_slice(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_certain_point_mutation_stays_in_opcode_range() {
        let mut genome = Genome::filled(99, 50);
        let config = MutationConfig {
            point_mut_prob: 1.0,
            insertion_prob: 0.0,
            deletion_prob: 0.0,
            indel_max: 1,
        };
        mutate(&mut genome, &config, 27, &mut rng());
        assert!(genome.iter().all(|&c| c < 27));
        assert_eq!(genome.len(), 50);
    }

    #[test]
    fn test_indel_bursts_bound_length_change() {
        for seed in 0..20 {
            let mut genome = Genome::filled(0, 10);
            let config = MutationConfig {
                point_mut_prob: 0.0,
                insertion_prob: 1.0,
                deletion_prob: 1.0,
                indel_max: 3,
            };
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            mutate(&mut genome, &config, 27, &mut rng);
            assert!(genome.len() >= 7 && genome.len() <= 13);
        }
    }

    #[test]
    fn test_deletion_respects_length_floor() {
        let mut genome = Genome::filled(0, 1);
        let config = MutationConfig {
            point_mut_prob: 0.0,
            insertion_prob: 0.0,
            deletion_prob: 1.0,
            indel_max: 5,
        };
        mutate(&mut genome, &config, 27, &mut rng());
        assert_eq!(genome.len(), 1);
    }

    #[test]
    fn test_empty_neighbor_fails_when_saturated() {
        let config = EnvironmentConfig {
            topology: TopologyKind::Grid,
            width: 3,
            height: 3,
            ..Default::default()
        };
        let mut env = Environment::new(&config).unwrap();
        for i in 0..9 {
            env.place(
                LocationId(i),
                OrganismId {
                    slot: i as u32,
                    epoch: 0,
                },
            );
        }
        let target = choose_location(
            &env,
            LocationId(4),
            0,
            PlacementStrategy::EmptyNeighbor,
            &mut rng(),
        );
        assert_eq!(target, None);

        env.clear(LocationId(0));
        let target = choose_location(
            &env,
            LocationId(4),
            0,
            PlacementStrategy::EmptyNeighbor,
            &mut rng(),
        );
        assert_eq!(target, Some(LocationId(0)));
    }

    #[test]
    fn test_facing_neighbor_is_deterministic_on_grid() {
        let config = EnvironmentConfig {
            topology: TopologyKind::Grid,
            width: 4,
            height: 4,
            ..Default::default()
        };
        let env = Environment::new(&config).unwrap();
        let a = choose_location(
            &env,
            LocationId(5),
            3,
            PlacementStrategy::EmptyFacingNeighbor,
            &mut rng(),
        );
        let b = choose_location(
            &env,
            LocationId(5),
            3,
            PlacementStrategy::EmptyFacingNeighbor,
            &mut rng(),
        );
        assert_eq!(a, b);
        assert!(a.is_some());
    }
}
