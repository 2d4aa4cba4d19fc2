//! Property tests over the genome, mutation, and resource invariants.

use autogeny_core::config::MutationConfig;
use autogeny_core::replication::mutate;
use autogeny_core::resources::ResourcePool;
use autogeny_data::Genome;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

proptest! {
    #[test]
    fn prop_circular_indexing_wraps(
        codons in prop::collection::vec(any::<u32>(), 1..64),
        index in 0usize..10_000,
    ) {
        let genome = Genome::new(codons).unwrap();
        prop_assert_eq!(genome.get(index), genome.get(index + genome.len()));
        prop_assert_eq!(genome.get(index), genome.get(index % genome.len()));
    }

    #[test]
    fn prop_insert_then_remove_restores_length(
        codons in prop::collection::vec(any::<u32>(), 2..32),
        at in 0usize..1000,
    ) {
        let mut genome = Genome::new(codons).unwrap();
        let before = genome.len();
        genome.insert(at, 7);
        prop_assert_eq!(genome.len(), before + 1);
        genome.remove(at % (before + 1));
        prop_assert_eq!(genome.len(), before);
    }

    #[test]
    fn prop_mutation_bounds_length_change(
        len in 1usize..128,
        point in 0.0f64..=1.0,
        insertion in 0.0f64..=1.0,
        deletion in 0.0f64..=1.0,
        indel_max in 1usize..6,
        seed in any::<u64>(),
    ) {
        let mut genome = Genome::filled(0, len);
        let config = MutationConfig {
            point_mut_prob: point,
            insertion_prob: insertion,
            deletion_prob: deletion,
            indel_max,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        mutate(&mut genome, &config, 27, &mut rng);
        prop_assert!(genome.len() >= 1);
        prop_assert!(genome.len() >= len.saturating_sub(indel_max).max(1));
        prop_assert!(genome.len() <= len + indel_max);
    }

    #[test]
    fn prop_mutation_keeps_codons_decodable(
        len in 1usize..64,
        seed in any::<u64>(),
    ) {
        let mut genome = Genome::filled(0, len);
        let config = MutationConfig {
            point_mut_prob: 1.0,
            insertion_prob: 1.0,
            deletion_prob: 1.0,
            indel_max: 3,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        mutate(&mut genome, &config, 27, &mut rng);
        prop_assert!(genome.iter().all(|&c| c < 27));
    }

    #[test]
    fn prop_resource_level_never_negative(
        initial in 0.0f64..100.0,
        inflow in 0.0f64..50.0,
        outflow in 0.0f64..10.0,
        draws in prop::collection::vec(-20.0f64..120.0, 0..32),
    ) {
        let mut pool = ResourcePool::new();
        let id = pool.register("substrate", initial, inflow, outflow);
        for draw in draws {
            pool.consume(id, draw);
            pool.update(0.25);
            prop_assert!(pool.level(id) >= 0.0);
        }
    }

    #[test]
    fn prop_consume_returns_what_was_drawn(
        initial in 0.0f64..100.0,
        amount in 0.0f64..200.0,
    ) {
        let mut pool = ResourcePool::new();
        let id = pool.register("substrate", initial, 0.0, 0.0);
        let before = pool.level(id);
        let drawn = pool.consume(id, amount);
        prop_assert!(drawn >= 0.0);
        prop_assert!(drawn <= amount + 1e-12);
        prop_assert!((before - drawn - pool.level(id)).abs() < 1e-9);
    }
}
