//! Autogeny: digital evolution of self-replicating programs.
//!
//! Facade over the engine crates for library consumers; the `autogeny`
//! binary is a headless runner over the same surface.

pub use autogeny_core::config::SimConfig;
pub use autogeny_core::lifecycle::default_ancestor;
pub use autogeny_core::world::World;
pub use autogeny_core::{Event, Isa, Metrics, PopulationSnapshot};
pub use autogeny_data::{Genome, Organism, OrganismId};
