//! Named metabolic resources shared across the population.
//!
//! Each resource follows a discretized ODE per scheduler period:
//! `level += dt * (inflow - outflow * level)`, clipped at zero. Task
//! rewards consume immediately, also clipped: a draw can be partial but
//! never negative and never an error.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId(pub usize);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub level: f64,
    pub inflow: f64,
    /// Fractional decay rate per unit time.
    pub outflow: f64,
}

/// Registry and state of all resources. Registered at setup, never
/// destroyed during a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourcePool {
    resources: Vec<Resource>,
    by_name: HashMap<String, ResourceId>,
}

impl ResourcePool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        initial: f64,
        inflow: f64,
        outflow: f64,
    ) -> ResourceId {
        let name = name.into();
        let id = ResourceId(self.resources.len());
        self.resources.push(Resource {
            name: name.clone(),
            level: initial.max(0.0),
            inflow,
            outflow,
        });
        self.by_name.insert(name, id);
        id
    }

    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<ResourceId> {
        self.by_name.get(name).copied()
    }

    #[must_use]
    pub fn level(&self, id: ResourceId) -> f64 {
        self.resources.get(id.0).map_or(0.0, |r| r.level)
    }

    #[must_use]
    pub fn get(&self, id: ResourceId) -> Option<&Resource> {
        self.resources.get(id.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Draws up to `amount`, returning what was actually drawn.
    pub fn consume(&mut self, id: ResourceId, amount: f64) -> f64 {
        let Some(resource) = self.resources.get_mut(id.0) else {
            return 0.0;
        };
        let drawn = amount.max(0.0).min(resource.level);
        resource.level -= drawn;
        drawn
    }

    /// Advances every resource by `dt`.
    pub fn update(&mut self, dt: f64) {
        for resource in &mut self.resources {
            let delta = resource.inflow - resource.outflow * resource.level;
            resource.level = (resource.level + dt * delta).max(0.0);
        }
    }
}
