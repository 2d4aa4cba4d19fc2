//! Slot arena for organisms with stable generational ids.
//!
//! The population list and the environment's locations both need to name
//! organisms while births and deaths churn the collection. Locations hold
//! `OrganismId`s, never references; a stale id simply resolves to `None`
//! once the slot's epoch has moved on.

use autogeny_data::{Organism, OrganismId};

#[derive(Debug, Default)]
struct Slot {
    epoch: u32,
    organism: Option<Organism>,
}

/// Generational slot map keyed by [`OrganismId`].
#[derive(Debug, Default)]
pub struct Arena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl Arena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of organisms currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, organism: Organism) -> OrganismId {
        self.len += 1;
        if let Some(slot_idx) = self.free.pop() {
            let slot = &mut self.slots[slot_idx as usize];
            slot.organism = Some(organism);
            OrganismId {
                slot: slot_idx,
                epoch: slot.epoch,
            }
        } else {
            self.slots.push(Slot {
                epoch: 0,
                organism: Some(organism),
            });
            OrganismId {
                slot: (self.slots.len() - 1) as u32,
                epoch: 0,
            }
        }
    }

    #[must_use]
    pub fn get(&self, id: OrganismId) -> Option<&Organism> {
        let slot = self.slots.get(id.slot as usize)?;
        if slot.epoch != id.epoch {
            return None;
        }
        slot.organism.as_ref()
    }

    pub fn get_mut(&mut self, id: OrganismId) -> Option<&mut Organism> {
        let slot = self.slots.get_mut(id.slot as usize)?;
        if slot.epoch != id.epoch {
            return None;
        }
        slot.organism.as_mut()
    }

    /// Frees the slot; the id becomes permanently stale.
    pub fn remove(&mut self, id: OrganismId) -> Option<Organism> {
        let slot = self.slots.get_mut(id.slot as usize)?;
        if slot.epoch != id.epoch {
            return None;
        }
        let organism = slot.organism.take()?;
        slot.epoch = slot.epoch.wrapping_add(1);
        self.free.push(id.slot);
        self.len -= 1;
        Some(organism)
    }

    /// Ids of all stored organisms, in slot order.
    #[must_use]
    pub fn ids(&self) -> Vec<OrganismId> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.organism.is_some())
            .map(|(i, slot)| OrganismId {
                slot: i as u32,
                epoch: slot.epoch,
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (OrganismId, &Organism)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.organism.as_ref().map(|org| {
                (
                    OrganismId {
                        slot: i as u32,
                        epoch: slot.epoch,
                    },
                    org,
                )
            })
        })
    }
}
