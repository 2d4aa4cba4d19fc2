//! Locations, topology, and the replacement policy.
//!
//! Two interchangeable topologies: an 8-connected toroidal grid with
//! precomputed neighbor lists, and a well-mixed pool where every neighbor
//! query is a uniform random draw. Each location holds at most one live
//! occupant; replacement through this module is the only competitive path
//! to death.

use crate::config::{EnvironmentConfig, TopologyKind};
use autogeny_data::{LocationId, OrganismId};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Offsets of the 8-connected neighborhood, row by row.
const GRID_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

#[derive(Debug, Clone)]
pub struct Location {
    pub occupant: Option<OrganismId>,
    /// Fixed neighbor list (grid); empty for the well-mixed pool.
    pub neighbors: Vec<LocationId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Grid { width: usize, height: usize },
    WellMixed { capacity: usize },
}

#[derive(Debug)]
pub struct Environment {
    pub topology: Topology,
    locations: Vec<Location>,
}

impl Environment {
    pub fn new(config: &EnvironmentConfig) -> anyhow::Result<Self> {
        match config.topology {
            TopologyKind::Grid => {
                let width = config.width as usize;
                let height = config.height as usize;
                anyhow::ensure!(width > 0 && height > 0, "Grid dimensions must be positive");
                let mut locations = Vec::with_capacity(width * height);
                for y in 0..height {
                    for x in 0..width {
                        let neighbors = GRID_OFFSETS
                            .iter()
                            .map(|&(dx, dy)| {
                                let nx = (x as i64 + dx).rem_euclid(width as i64) as usize;
                                let ny = (y as i64 + dy).rem_euclid(height as i64) as usize;
                                LocationId(ny * width + nx)
                            })
                            .collect();
                        locations.push(Location {
                            occupant: None,
                            neighbors,
                        });
                    }
                }
                Ok(Self {
                    topology: Topology::Grid { width, height },
                    locations,
                })
            }
            TopologyKind::WellMixed => {
                anyhow::ensure!(config.capacity > 0, "Well-mixed capacity must be positive");
                let locations = (0..config.capacity)
                    .map(|_| Location {
                        occupant: None,
                        neighbors: Vec::new(),
                    })
                    .collect();
                Ok(Self {
                    topology: Topology::WellMixed {
                        capacity: config.capacity,
                    },
                    locations,
                })
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    #[must_use]
    pub fn location(&self, id: LocationId) -> &Location {
        &self.locations[id.0 % self.locations.len()]
    }

    #[must_use]
    pub fn occupant(&self, id: LocationId) -> Option<OrganismId> {
        self.location(id).occupant
    }

    pub fn set_occupant(&mut self, id: LocationId, occupant: Option<OrganismId>) {
        let len = self.locations.len();
        self.locations[id.0 % len].occupant = occupant;
    }

    pub fn clear(&mut self, id: LocationId) {
        self.set_occupant(id, None);
    }

    /// Neighbor degree for facing assignment. The well-mixed pool has no
    /// fixed adjacency.
    #[must_use]
    pub fn degree(&self) -> usize {
        match self.topology {
            Topology::Grid { .. } => GRID_OFFSETS.len(),
            Topology::WellMixed { .. } => 0,
        }
    }

    /// All locations adjacent to `at`. For the well-mixed pool this is
    /// every other cell (mass-action mixing).
    #[must_use]
    pub fn neighborhood(&self, at: LocationId) -> Vec<LocationId> {
        match self.topology {
            Topology::Grid { .. } => self.location(at).neighbors.clone(),
            Topology::WellMixed { .. } => (0..self.locations.len())
                .map(LocationId)
                .filter(|&id| id != at)
                .collect(),
        }
    }

    /// The faced neighbor (grid) or a uniform random draw with
    /// replacement (well-mixed).
    #[must_use]
    pub fn neighbor(&self, at: LocationId, facing: usize, rng: &mut ChaCha8Rng) -> LocationId {
        match self.topology {
            Topology::Grid { .. } => {
                let neighbors = &self.location(at).neighbors;
                neighbors[facing % neighbors.len()]
            }
            Topology::WellMixed { capacity } => {
                if capacity == 1 {
                    return at;
                }
                // Draw over the other cells; shift past `at` to exclude it.
                let raw = rng.gen_range(0..capacity - 1);
                let idx = if raw >= at.0 % capacity { raw + 1 } else { raw };
                LocationId(idx)
            }
        }
    }

    /// First unoccupied location, scanning in table order.
    #[must_use]
    pub fn first_empty(&self) -> Option<LocationId> {
        self.locations
            .iter()
            .position(|loc| loc.occupant.is_none())
            .map(LocationId)
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.locations
            .iter()
            .filter(|loc| loc.occupant.is_some())
            .count()
    }

    /// Installs `incoming` at `id`, returning the displaced occupant.
    /// Whether the displaced organism dies is the caller's policy call.
    pub fn place(&mut self, id: LocationId, incoming: OrganismId) -> Option<OrganismId> {
        let len = self.locations.len();
        let slot = &mut self.locations[id.0 % len];
        slot.occupant.replace(incoming)
    }
}
