use anyhow::{Context, Result};
use autogeny_core::config::SimConfig;
use autogeny_core::lifecycle::default_ancestor;
use autogeny_core::metrics::init_logging;
use autogeny_core::tasks::{constant_catalyst, nand_predicate, not_predicate};
use autogeny_core::world::World;
use autogeny_core::Event;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Number of updates to run
    #[arg(short, long, default_value_t = 1000)]
    updates: u64,

    /// Override the world seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print a JSON population snapshot every N updates
    #[arg(long)]
    snapshot_every: Option<u64>,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let mut config = match std::fs::read_to_string(&args.config) {
        Ok(content) => SimConfig::from_toml(&content)
            .with_context(|| format!("Invalid config file {}", args.config))?,
        Err(_) => {
            tracing::warn!(path = %args.config, "Config file not found, using defaults");
            SimConfig::default()
        }
    };
    if let Some(seed) = args.seed {
        config.world.seed = Some(seed);
    }

    let mut world = World::new(config)?;

    // The canonical single-resource economy: both builtin tasks draw
    // from one replenishing substrate.
    let substrate = world.make_resource("substrate", 100.0, 10.0, 0.01);
    let not = world.make_task("not", not_predicate(), constant_catalyst(2.0));
    let nand = world.make_task("nand", nand_predicate(), constant_catalyst(4.0));
    world.task_consumes(not, substrate);
    world.task_consumes(nand, substrate);

    let genome = default_ancestor(&world.isa)
        .ok_or_else(|| anyhow::anyhow!("Instruction set is missing a replication op"))?;
    world.seed_ancestor(genome)?;

    for _ in 0..args.updates {
        world.update();
        let events = world.drain_events();
        if let Some(every) = args.snapshot_every {
            if every > 0 && world.update % every == 0 {
                for event in &events {
                    if let Event::EndOfUpdate { snapshot } = event {
                        println!("{}", snapshot.to_json()?);
                    }
                }
            }
        }
        if world.population() == 0 {
            tracing::warn!(update = world.update, "Population extinct");
            break;
        }
    }

    tracing::info!(
        updates = world.update,
        population = world.population(),
        lineages = world.lineages.lineages.len(),
        extinct_lineages = world.lineages.extinct_count(),
        elapsed_ms = world.metrics.elapsed().as_millis() as u64,
        "Run complete"
    );
    Ok(())
}
