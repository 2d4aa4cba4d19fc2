//! # Autogeny Core
//!
//! The simulation engine for Autogeny - a digital-evolution system of
//! self-replicating programs.
//!
//! This crate contains the deterministic evolution logic, including:
//! - The virtual CPU and its append-only instruction set
//! - Priority-weighted round-robin scheduling over a cycle budget
//! - Spatial and well-mixed environments with replacement
//! - The replication pipeline (allocation, copy, divide, mutation)
//! - A resource economy coupled to task rewards
//! - Lineage tracking, snapshots, and structured logging
//!
//! ## Architecture
//!
//! The engine follows a single-writer design:
//! - **One world, one RNG**: every stochastic decision flows through a
//!   seeded `ChaCha8Rng`, so equal seeds give equal runs
//! - **Tolerant execution**: evolved programs cannot crash the
//!   interpreter; malformed states degrade to no-ops
//! - **Synchronous resolution**: divides and deaths mutate the
//!   population the moment they happen, in schedule order
//!
//! ## Example
//!
//! ```
//! use autogeny_core::config::SimConfig;
//! use autogeny_core::lifecycle::default_ancestor;
//! use autogeny_core::world::World;
//!
//! let mut config = SimConfig::default();
//! config.world.seed = Some(42);
//! let mut world = World::new(config).unwrap();
//! let genome = default_ancestor(&world.isa).unwrap();
//! world.seed_ancestor(genome).unwrap();
//! world.update();
//! assert!(world.population() >= 1);
//! ```

/// Generational slot arena holding the population
pub mod arena;
/// Configuration management for simulation parameters
pub mod config;
/// Locations, topology, and the replacement policy
pub mod environment;
/// Outbound event queue for external consumers
pub mod events;
/// The virtual CPU execution engine
pub mod hardware;
/// The instruction set architecture
pub mod isa;
/// Organism construction and divide-time merit bookkeeping
pub mod lifecycle;
/// Lineage tracking and registry for ancestry demographics
pub mod lineage_registry;
/// Metrics collection and structured logging
pub mod metrics;
/// Heritable variation and offspring placement
pub mod replication;
/// The shared resource economy
pub mod resources;
/// Priority-weighted round-robin scheduling
pub mod scheduler;
/// Per-update population snapshots
pub mod snapshot;
/// Task detection over organism I/O
pub mod tasks;
/// The world and its update loop
pub mod world;

pub use arena::Arena;
pub use config::SimConfig;
pub use environment::Environment;
pub use events::{Event, EventLog};
pub use hardware::{CpuLogic, ExecOutcome, StepCtx, StepEffect};
pub use isa::{default_isa, Isa, Op};
pub use lineage_registry::LineageRegistry;
pub use metrics::Metrics;
pub use resources::{ResourceId, ResourcePool};
pub use snapshot::PopulationSnapshot;
pub use tasks::{TaskId, TaskLibrary};
pub use world::World;
