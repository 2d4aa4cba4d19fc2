//! Configuration management for simulation parameters.
//!
//! Strongly-typed configuration structures that map to a `config.toml`
//! file. One explicit struct is passed by reference into the scheduler,
//! environment, and replication machinery; there is no global metadata.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! seed = 42
//! initial_merit = 1.0
//!
//! [scheduler]
//! time_slice = 30
//! target_population = 1024
//!
//! [environment]
//! topology = "Grid"
//! width = 60
//! height = 60
//!
//! [mutation]
//! point_mut_prob = 0.0075
//! ```

use serde::{Deserialize, Serialize};

/// How organisms are replicated into the per-update execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SchedulerMode {
    /// One slot per live organism, merit ignored.
    RoundRobin,
    /// `trunc(merit)` slots per organism.
    #[default]
    MeritWeighted,
}

/// What happens to the parent's merit after a successful divide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MeritPolicy {
    #[default]
    Halve,
    Reset,
}

/// How the replication pipeline picks the offspring's location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlacementStrategy {
    FirstNeighbor,
    #[default]
    RandomNeighbor,
    /// First unoccupied neighbor; no offspring when all are full.
    EmptyNeighbor,
    /// The faced neighbor, only if unoccupied.
    EmptyFacingNeighbor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TopologyKind {
    /// 8-connected torus of `width * height` cells.
    #[default]
    Grid,
    /// Unordered pool; neighbors are uniform random draws.
    WellMixed,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WorldConfig {
    pub seed: Option<u64>,
    pub initial_merit: f64,
    pub merit_policy: MeritPolicy,
    /// Environment input stream handed to every organism at birth.
    pub inputs: Vec<u32>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: None,
            initial_merit: 1.0,
            merit_policy: MeritPolicy::Halve,
            inputs: Vec::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Cycles granted per organism-equivalent each update.
    pub time_slice: u64,
    /// Budget cap: `B = time_slice * min(live, target_population)`.
    pub target_population: usize,
    pub mode: SchedulerMode,
    /// Minimum order entries per live organism. Zero preserves the
    /// truncation behavior where merit below 1.0 earns no turns.
    pub merit_floor_turns: usize,
    /// Periods the budget is divided into; the resource pool advances by
    /// `dt = 1 / periods` at each boundary.
    pub resource_periods: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            time_slice: 30,
            target_population: 1024,
            mode: SchedulerMode::MeritWeighted,
            merit_floor_turns: 0,
            resource_periods: 1,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MutationConfig {
    /// Per-codon substitution probability applied to the child genome.
    pub point_mut_prob: f64,
    /// Per-divide probability of one insertion burst.
    pub insertion_prob: f64,
    /// Per-divide probability of one deletion burst.
    pub deletion_prob: f64,
    /// Largest indel burst, in codons.
    pub indel_max: usize,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            point_mut_prob: 0.0075,
            insertion_prob: 0.05,
            deletion_prob: 0.05,
            indel_max: 1,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct GenomeConfig {
    /// Smallest viable child genome; shorter divides abort.
    pub min_size: usize,
    /// Largest viable child genome; longer divides abort.
    pub max_size: usize,
}

impl Default for GenomeConfig {
    fn default() -> Self {
        Self {
            min_size: 4,
            max_size: 2048,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub topology: TopologyKind,
    pub width: u16,
    pub height: u16,
    /// Cell count for the well-mixed pool; ignored for grids.
    pub capacity: usize,
    pub placement: PlacementStrategy,
    /// When set, replacement spares occupants with higher merit than the
    /// incoming offspring.
    pub replace_veto: bool,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            topology: TopologyKind::Grid,
            width: 60,
            height: 60,
            capacity: 1024,
            placement: PlacementStrategy::RandomNeighbor,
            replace_veto: false,
        }
    }
}

/// Top-level simulation configuration.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub scheduler: SchedulerConfig,
    pub mutation: MutationConfig,
    pub genome: GenomeConfig,
    pub environment: EnvironmentConfig,
}

impl SimConfig {
    /// Validates all configuration parameters.
    ///
    /// Configuration errors are the only fatal class in this engine:
    /// they indicate a run that was never meant to execute, as opposed to
    /// an evolved state, which is always tolerated.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.scheduler.time_slice > 0, "Time slice must be positive");
        anyhow::ensure!(
            self.scheduler.target_population > 0,
            "Target population must be positive"
        );
        anyhow::ensure!(
            self.scheduler.resource_periods > 0,
            "Resource periods must be positive"
        );
        anyhow::ensure!(
            self.world.initial_merit > 0.0,
            "Initial merit must be positive"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.mutation.point_mut_prob),
            "Point mutation probability must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.mutation.insertion_prob),
            "Insertion probability must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.mutation.deletion_prob),
            "Deletion probability must be in [0.0, 1.0]"
        );
        anyhow::ensure!(self.mutation.indel_max >= 1, "Indel bound must be at least 1");
        anyhow::ensure!(self.genome.min_size >= 1, "Minimum genome size must be at least 1");
        anyhow::ensure!(
            self.genome.min_size <= self.genome.max_size,
            "Minimum genome size exceeds maximum"
        );
        match self.environment.topology {
            TopologyKind::Grid => {
                anyhow::ensure!(self.environment.width > 0, "Grid width must be positive");
                anyhow::ensure!(self.environment.height > 0, "Grid height must be positive");
            }
            TopologyKind::WellMixed => {
                anyhow::ensure!(
                    self.environment.capacity > 0,
                    "Well-mixed capacity must be positive"
                );
            }
        }
        Ok(())
    }

    /// Loads and validates configuration from TOML content.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Digest of the evolution-relevant sections, for tagging runs.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.scheduler).as_bytes());
        hasher.update(format!("{:?}", self.mutation).as_bytes());
        hasher.update(format!("{:?}", self.genome).as_bytes());
        hasher.update(format!("{:?}", self.environment).as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_time_slice_rejected() {
        let config = SimConfig {
            scheduler: SchedulerConfig {
                time_slice: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_mutation_rate() {
        let config = SimConfig {
            mutation: MutationConfig {
                point_mut_prob: 1.5,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_genome_bounds_ordering() {
        let config = SimConfig {
            genome: GenomeConfig {
                min_size: 100,
                max_size: 10,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_capacity_well_mixed_rejected() {
        let config = SimConfig {
            environment: EnvironmentConfig {
                topology: TopologyKind::WellMixed,
                capacity: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_roundtrip() {
        let toml = r#"
            [scheduler]
            time_slice = 10
            target_population = 16
            mode = "RoundRobin"
            merit_floor_turns = 1
            resource_periods = 5
        "#;
        let config = SimConfig::from_toml(toml).unwrap();
        assert_eq!(config.scheduler.time_slice, 10);
        assert_eq!(config.scheduler.mode, SchedulerMode::RoundRobin);
        assert_eq!(config.environment.width, 60);
    }

    #[test]
    fn test_fingerprint_consistency() {
        assert_eq!(
            SimConfig::default().fingerprint(),
            SimConfig::default().fingerprint()
        );
    }
}
