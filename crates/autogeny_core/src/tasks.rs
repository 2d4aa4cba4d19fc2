//! Detection of computed Boolean functions over organism I/O.
//!
//! Tasks are stateless predicates over the recent-input window and a
//! claimed output, checked in registration order after every `output`
//! instruction; the first match wins. A match draws from the linked
//! resource (clipped to availability) and the drawn amount becomes a
//! merit increment for the organism.

use crate::resources::ResourceId;
use serde::{Deserialize, Serialize};

pub type Predicate = Box<dyn Fn(&[u32], u32) -> bool + Send + Sync>;
pub type Catalyst = Box<dyn Fn(u32) -> f64 + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub usize);

pub struct Task {
    pub name: String,
    predicate: Predicate,
    catalyst: Catalyst,
    pub consumes: Option<ResourceId>,
}

impl Task {
    #[must_use]
    pub fn matches(&self, inputs: &[u32], output: u32) -> bool {
        (self.predicate)(inputs, output)
    }

    /// Resource amount for the `n`th completion by one organism.
    #[must_use]
    pub fn reward(&self, n_completions: u32) -> f64 {
        (self.catalyst)(n_completions)
    }
}

/// The ordered task registry, shared read-only across organisms.
#[derive(Default)]
pub struct TaskLibrary {
    tasks: Vec<Task>,
}

impl TaskLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn make_task(
        &mut self,
        name: impl Into<String>,
        predicate: Predicate,
        catalyst: Catalyst,
    ) -> TaskId {
        let id = TaskId(self.tasks.len());
        self.tasks.push(Task {
            name: name.into(),
            predicate,
            catalyst,
            consumes: None,
        });
        id
    }

    /// Links a task to the resource it consumes.
    pub fn consumes(&mut self, task: TaskId, resource: ResourceId) {
        if let Some(task) = self.tasks.get_mut(task.0) {
            task.consumes = Some(resource);
        }
    }

    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(id.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// First task whose predicate accepts this I/O pair, in registration
    /// order. Canonical configurations design predicates to be mutually
    /// exclusive per pair.
    #[must_use]
    pub fn first_match(&self, inputs: &[u32], output: u32) -> Option<TaskId> {
        self.tasks
            .iter()
            .position(|task| task.matches(inputs, output))
            .map(TaskId)
    }
}

/// Bitwise NOT of any recent input.
#[must_use]
pub fn not_predicate() -> Predicate {
    Box::new(|inputs, output| inputs.iter().any(|&i| output == !i))
}

/// Bitwise NAND of any adjacent recent-input pair.
#[must_use]
pub fn nand_predicate() -> Predicate {
    Box::new(|inputs, output| inputs.windows(2).any(|w| output == !(w[0] & w[1])))
}

/// Fixed reward regardless of completion count.
#[must_use]
pub fn constant_catalyst(amount: f64) -> Catalyst {
    Box::new(move |_| amount)
}

/// Reward halving with each completion by the same organism.
#[must_use]
pub fn diminishing_catalyst(base: f64) -> Catalyst {
    Box::new(move |n| base / f64::from(2u32.saturating_pow(n.min(62))))
}
