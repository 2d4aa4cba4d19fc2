use autogeny_core::arena::Arena;
use autogeny_core::config::{
    EnvironmentConfig, MutationConfig, PlacementStrategy, SchedulerConfig, SimConfig, TopologyKind,
    WorldConfig,
};
use autogeny_core::lifecycle::default_ancestor;
use autogeny_core::scheduler::build_order;
use autogeny_core::world::World;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use autogeny_data::{Genome, Organism};

/// Benchmark building the shuffled order over a large population.
fn bench_build_order(c: &mut Criterion) {
    let mut arena = Arena::new();
    for i in 0..1000u32 {
        arena.insert(Organism::new(
            Genome::filled(0, 13),
            1.0 + f64::from(i % 7),
            0,
            0,
            Uuid::nil(),
            None,
            Vec::new(),
        ));
    }
    let config = SchedulerConfig::default();

    c.bench_function("build_order_1000", |b| {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        b.iter(|| {
            let order = build_order(black_box(&config), black_box(&arena), &mut rng);
            black_box(order)
        })
    });
}

/// Benchmark a full world update while the population is growing.
fn bench_world_update(c: &mut Criterion) {
    let config = SimConfig {
        world: WorldConfig {
            seed: Some(42),
            ..Default::default()
        },
        mutation: MutationConfig {
            point_mut_prob: 0.0075,
            insertion_prob: 0.05,
            deletion_prob: 0.05,
            indel_max: 1,
        },
        environment: EnvironmentConfig {
            topology: TopologyKind::Grid,
            width: 32,
            height: 32,
            placement: PlacementStrategy::EmptyNeighbor,
            ..Default::default()
        },
        ..Default::default()
    };

    c.bench_function("world_update_growing", |b| {
        b.iter_batched(
            || {
                let mut world = World::new(config.clone()).unwrap();
                let genome = default_ancestor(&world.isa).unwrap();
                world.seed_ancestor(genome).unwrap();
                for _ in 0..10 {
                    world.update();
                }
                world
            },
            |mut world| {
                world.update();
                black_box(world)
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_build_order, bench_world_update);
criterion_main!(benches);
