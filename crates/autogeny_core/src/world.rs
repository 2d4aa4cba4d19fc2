//! The world: population, environment, economy, and the update loop.
//!
//! One `update` is the unit of simulated time: the world cycles over
//! the scheduler's shuffled order, one ISA cycle per slot, until the
//! budget runs out. Divides, deaths, and messages are resolved
//! synchronously at the cycle that produced them, and the resource
//! pool advances at period boundaries. All randomness flows through a
//! single seeded RNG, so equal seeds give equal runs.

use crate::arena::Arena;
use crate::config::SimConfig;
use crate::environment::Environment;
use crate::events::{Event, EventLog};
use crate::hardware::{CpuLogic, StepCtx, StepEffect};
use crate::isa::{default_isa, Isa};
use crate::lifecycle::{apply_divide_merit, create_ancestor_with_rng, create_offspring};
use crate::lineage_registry::LineageRegistry;
use crate::metrics::Metrics;
use crate::replication::{choose_location, mutate};
use crate::resources::{ResourceId, ResourcePool};
use crate::scheduler::{build_order, cycle_budget};
use crate::snapshot::PopulationSnapshot;
use crate::tasks::{Catalyst, Predicate, TaskId, TaskLibrary};
use autogeny_data::{Genome, LocationId, Message, OrganismId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Instant;

pub struct World {
    pub config: SimConfig,
    pub isa: Isa,
    pub arena: Arena,
    pub environment: Environment,
    pub resources: ResourcePool,
    pub tasks: TaskLibrary,
    pub events: EventLog,
    pub lineages: LineageRegistry,
    pub metrics: Metrics,
    /// Completed updates; the current update while the loop runs.
    pub update: u64,
    pub seed: u64,
    rng: ChaCha8Rng,
}

impl World {
    /// Builds a world running the canonical instruction set.
    pub fn new(config: SimConfig) -> anyhow::Result<Self> {
        Self::with_isa(config, default_isa())
    }

    /// Builds a world running a caller-supplied instruction set.
    pub fn with_isa(config: SimConfig, isa: Isa) -> anyhow::Result<Self> {
        config.validate()?;
        anyhow::ensure!(!isa.is_empty(), "Instruction set must not be empty");
        let environment = Environment::new(&config.environment)?;
        let seed = config.world.seed.unwrap_or_else(rand::random);
        tracing::info!(
            seed,
            locations = environment.len(),
            fingerprint = %config.fingerprint(),
            "World initialized"
        );
        Ok(Self {
            config,
            isa,
            arena: Arena::new(),
            environment,
            resources: ResourcePool::new(),
            tasks: TaskLibrary::new(),
            events: EventLog::new(),
            lineages: LineageRegistry::new(),
            metrics: Metrics::new(),
            update: 0,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    #[must_use]
    pub fn population(&self) -> usize {
        self.arena.len()
    }

    pub fn make_resource(
        &mut self,
        name: impl Into<String>,
        initial: f64,
        inflow: f64,
        outflow: f64,
    ) -> ResourceId {
        self.resources.register(name, initial, inflow, outflow)
    }

    pub fn make_task(
        &mut self,
        name: impl Into<String>,
        predicate: Predicate,
        catalyst: Catalyst,
    ) -> TaskId {
        self.tasks.make_task(name, predicate, catalyst)
    }

    pub fn task_consumes(&mut self, task: TaskId, resource: ResourceId) {
        self.tasks.consumes(task, resource);
    }

    /// Injects a founder at the first empty location.
    pub fn seed_ancestor(&mut self, genome: Genome) -> anyhow::Result<OrganismId> {
        let at = self
            .environment
            .first_empty()
            .ok_or_else(|| anyhow::anyhow!("No empty location for ancestor"))?;
        let mut organism = create_ancestor_with_rng(genome, &self.config, self.update, &mut self.rng);
        organism.location = Some(at);
        organism.facing = self.random_facing();
        let lineage = organism.lineage;
        let id = self.arena.insert(organism);
        self.environment.place(at, id);
        self.lineages.record_birth(lineage, 0, self.update);
        Ok(id)
    }

    /// Runs one full update of the simulation.
    pub fn update(&mut self) {
        let started = Instant::now();
        self.update += 1;
        let budget = cycle_budget(&self.config.scheduler, self.arena.len());
        let order = build_order(&self.config.scheduler, &self.arena, &mut self.rng);
        let periods = u64::from(self.config.scheduler.resource_periods);
        let dt = 1.0 / periods as f64;

        let mut consumed: u64 = 0;
        let mut periods_applied: u64 = 0;
        let mut cursor = 0usize;
        let mut stale = 0usize;

        while consumed < budget && !order.is_empty() {
            // A full lap of stale entries means nothing in the order is
            // left alive; newborns wait for the next update.
            if stale >= order.len() {
                break;
            }
            let id = order[cursor % order.len()];
            cursor += 1;

            let (effect, at, facing) = {
                let Some(organism) = self.arena.get_mut(id) else {
                    stale += 1;
                    continue;
                };
                let mut ctx = StepCtx {
                    resources: &mut self.resources,
                    tasks: &self.tasks,
                    events: &mut self.events,
                    config: &self.config,
                    organism_id: id,
                };
                let effect = organism.step_cycle(&self.isa, &mut ctx);
                (effect, organism.location, organism.facing)
            };
            stale = 0;
            consumed += 1;

            match effect {
                StepEffect::None => {}
                StepEffect::Message(payload) => self.deliver_message(id, at, facing, payload),
                StepEffect::Divide(genome) => self.process_divide(id, genome),
                StepEffect::Died => self.kill(id),
            }

            while periods_applied < periods && consumed * periods >= (periods_applied + 1) * budget
            {
                self.resources.update(dt);
                periods_applied += 1;
            }
        }

        // An update always advances the economy by one unit of time,
        // even when the population went extinct mid-update.
        while periods_applied < periods {
            self.resources.update(dt);
            periods_applied += 1;
        }

        let snapshot = PopulationSnapshot::capture(self.update, &self.arena);
        self.events.push(Event::EndOfUpdate { snapshot });
        self.metrics
            .record_update(started.elapsed(), self.arena.len(), consumed);
    }

    /// Hands over all events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }

    fn random_facing(&mut self) -> usize {
        let degree = self.environment.degree();
        if degree > 0 {
            self.rng.gen_range(0..degree)
        } else {
            0
        }
    }

    /// Resolves a successful divide: mutate the child genome, pick a
    /// site, install the offspring, and settle the parent's merit. Any
    /// failure to place is a quiet no-birth that leaves the parent's
    /// merit untouched.
    fn process_divide(&mut self, parent_id: OrganismId, mut genome: Genome) {
        mutate(&mut genome, &self.config.mutation, self.isa.len(), &mut self.rng);

        let (at, facing, offspring) = {
            let Some(parent) = self.arena.get(parent_id) else {
                return;
            };
            let Some(at) = parent.location else {
                return;
            };
            let offspring = create_offspring(parent, parent_id, genome, &self.config, self.update);
            (at, parent.facing, offspring)
        };

        let strategy = self.config.environment.placement;
        let Some(target) = choose_location(&self.environment, at, facing, strategy, &mut self.rng)
        else {
            return;
        };

        if let Some(victim_id) = self.environment.occupant(target) {
            if self.config.environment.replace_veto {
                let spared = self
                    .arena
                    .get(victim_id)
                    .is_some_and(|victim| victim.merit > offspring.merit);
                if spared {
                    return;
                }
            }
            // Death precedes birth at a contested site.
            self.kill(victim_id);
        }

        // The parent pays the merit price only once the birth is certain.
        if let Some(parent) = self.arena.get_mut(parent_id) {
            apply_divide_merit(
                parent,
                self.config.world.merit_policy,
                self.config.world.initial_merit,
            );
        }

        let lineage = offspring.lineage;
        let generation = offspring.generation;
        let child_id = self.arena.insert(offspring);
        self.environment.place(target, child_id);
        let facing = self.random_facing();
        if let Some(child) = self.arena.get_mut(child_id) {
            child.location = Some(target);
            child.facing = facing;
        }
        self.lineages.record_birth(lineage, generation, self.update);
        self.events.push(Event::Birth {
            parent: parent_id,
            offspring: child_id,
        });
        self.metrics.increment_counter("births");
    }

    fn kill(&mut self, id: OrganismId) {
        let Some(organism) = self.arena.remove(id) else {
            return;
        };
        if let Some(at) = organism.location {
            if self.environment.occupant(at) == Some(id) {
                self.environment.clear(at);
            }
        }
        self.lineages.record_death(organism.lineage);
        self.events.push(Event::Death { organism: id });
        self.metrics.increment_counter("deaths");
    }

    fn deliver_message(
        &mut self,
        from: OrganismId,
        at: Option<LocationId>,
        facing: usize,
        payload: (u32, u32),
    ) {
        let Some(at) = at else {
            return;
        };
        let target = self.environment.neighbor(at, facing, &mut self.rng);
        let Some(receiver_id) = self.environment.occupant(target) else {
            return;
        };
        if receiver_id == from {
            return;
        }
        if let Some(receiver) = self.arena.get_mut(receiver_id) {
            receiver.deliver(Message {
                from,
                data: payload,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EnvironmentConfig, MutationConfig, PlacementStrategy, TopologyKind};
    use crate::lifecycle::default_ancestor;
    use autogeny_data::Organism;

    fn quiet_config() -> SimConfig {
        SimConfig {
            world: crate::config::WorldConfig {
                seed: Some(7),
                ..Default::default()
            },
            mutation: MutationConfig {
                point_mut_prob: 0.0,
                insertion_prob: 0.0,
                deletion_prob: 0.0,
                indel_max: 1,
            },
            environment: EnvironmentConfig {
                topology: TopologyKind::Grid,
                width: 5,
                height: 5,
                placement: PlacementStrategy::EmptyNeighbor,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn plain_organism(genome: Genome) -> Organism {
        Organism::new(genome, 1.0, 0, 0, uuid::Uuid::nil(), None, Vec::new())
    }

    #[test]
    fn test_empty_isa_is_rejected() {
        assert!(World::with_isa(quiet_config(), crate::isa::Isa::new()).is_err());
    }

    #[test]
    fn test_seed_ancestor_occupies_first_empty() {
        let mut world = World::new(quiet_config()).unwrap();
        let id = world.seed_ancestor(Genome::filled(0, 8)).unwrap();
        assert_eq!(world.population(), 1);
        assert_eq!(world.environment.occupant(LocationId(0)), Some(id));
        assert_eq!(world.arena.get(id).unwrap().location, Some(LocationId(0)));
    }

    #[test]
    fn test_replicator_produces_one_birth_per_gestation() {
        let mut world = World::new(quiet_config()).unwrap();
        let genome = default_ancestor(&world.isa).unwrap();
        world.seed_ancestor(genome).unwrap();
        world.update();
        assert_eq!(world.population(), 2);
        let events = world.drain_events();
        let births = events
            .iter()
            .filter(|e| matches!(e, Event::Birth { .. }))
            .count();
        assert_eq!(births, 1);
        assert!(matches!(events.last(), Some(Event::EndOfUpdate { .. })));
    }

    #[test]
    fn test_die_removes_organism_and_clears_location() {
        let mut world = World::new(quiet_config()).unwrap();
        let die = world.isa.opcode_of("die").unwrap();
        let id = world.seed_ancestor(Genome::filled(die, 4)).unwrap();
        world.update();
        assert_eq!(world.population(), 0);
        assert_eq!(world.environment.occupant(LocationId(0)), None);
        let events = world.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::Death { organism } if *organism == id)));
        assert_eq!(world.lineages.extinct_count(), 1);
    }

    #[test]
    fn test_failed_placement_leaves_parent_merit_intact() {
        let mut config = quiet_config();
        config.environment = EnvironmentConfig {
            topology: TopologyKind::WellMixed,
            capacity: 1,
            placement: PlacementStrategy::EmptyNeighbor,
            ..Default::default()
        };
        let mut world = World::new(config).unwrap();
        let genome = default_ancestor(&world.isa).unwrap();
        let id = world.seed_ancestor(genome).unwrap();

        // Gestation completes but the only cell is the parent's own.
        world.update();
        assert_eq!(world.population(), 1);
        assert_eq!(world.arena.get(id).unwrap().merit, 1.0);
        let events = world.drain_events();
        assert!(!events.iter().any(|e| matches!(e, Event::Birth { .. })));
    }

    /// Fills every grid cell except the ancestor's with an inert occupant.
    fn saturate_grid(world: &mut World, merit: f64) {
        for cell in 1..world.environment.len() {
            let mut occupant = plain_organism(Genome::filled(0, 8));
            occupant.merit = merit;
            occupant.location = Some(LocationId(cell));
            let id = world.arena.insert(occupant);
            world.environment.place(LocationId(cell), id);
        }
    }

    #[test]
    fn test_replacement_death_precedes_birth() {
        let mut config = quiet_config();
        config.environment.width = 3;
        config.environment.height = 3;
        config.environment.placement = PlacementStrategy::RandomNeighbor;
        config.scheduler.target_population = 1;
        let mut world = World::new(config).unwrap();
        let genome = default_ancestor(&world.isa).unwrap();
        world.seed_ancestor(genome).unwrap();
        // Sub-unit merit keeps the occupants out of the order.
        saturate_grid(&mut world, 0.5);

        world.update();
        // One divide: the displaced occupant dies, the newborn takes over.
        assert_eq!(world.population(), 9);
        let events = world.drain_events();
        let deaths: Vec<usize> = events
            .iter()
            .enumerate()
            .filter(|(_, e)| matches!(e, Event::Death { .. }))
            .map(|(i, _)| i)
            .collect();
        let births: Vec<usize> = events
            .iter()
            .enumerate()
            .filter(|(_, e)| matches!(e, Event::Birth { .. }))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(deaths.len(), 1);
        assert_eq!(births.len(), 1);
        assert!(deaths[0] < births[0]);
    }

    #[test]
    fn test_replace_veto_spares_higher_merit_occupant() {
        let mut config = quiet_config();
        config.environment.width = 3;
        config.environment.height = 3;
        config.environment.placement = PlacementStrategy::RandomNeighbor;
        config.environment.replace_veto = true;
        config.scheduler.time_slice = 1350;
        config.scheduler.target_population = 1;
        let mut world = World::new(config).unwrap();
        let genome = default_ancestor(&world.isa).unwrap();
        let parent_id = world.seed_ancestor(genome).unwrap();
        saturate_grid(&mut world, 5.0);

        world.update();
        assert_eq!(world.population(), 9);
        // The vetoed divide costs the parent nothing.
        assert_eq!(world.arena.get(parent_id).unwrap().merit, 1.0);
        let events = world.drain_events();
        assert!(!events
            .iter()
            .any(|e| matches!(e, Event::Birth { .. } | Event::Death { .. })));
    }

    #[test]
    fn test_message_delivery_to_faced_neighbor() {
        let mut config = quiet_config();
        config.scheduler.time_slice = 4;
        let mut world = World::new(config).unwrap();

        let send = world.isa.opcode_of("send_msg").unwrap();
        let mut sender = plain_organism(Genome::new(vec![send, 0, 0, 0]).unwrap());
        sender.hardware.regs = [0, 7, 9];
        sender.location = Some(LocationId(6));
        // Neighbor index 1 of (1, 1) is (1, 0).
        sender.facing = 1;
        let sender_id = world.arena.insert(sender);
        world.environment.place(LocationId(6), sender_id);

        let mut receiver = plain_organism(Genome::filled(0, 4));
        receiver.location = Some(LocationId(1));
        let receiver_id = world.arena.insert(receiver);
        world.environment.place(LocationId(1), receiver_id);

        world.update();
        let receiver = world.arena.get(receiver_id).unwrap();
        assert_eq!(receiver.inbox.len(), 1);
        assert_eq!(receiver.inbox[0].data, (7, 9));
        assert_eq!(receiver.inbox[0].from, sender_id);
    }

    #[test]
    fn test_resources_advance_every_update() {
        let mut config = quiet_config();
        config.scheduler.resource_periods = 4;
        let mut world = World::new(config).unwrap();
        let id = world.make_resource("substrate", 0.0, 8.0, 0.0);
        world.update();
        assert!((world.resources.level(id) - 8.0).abs() < 1e-9);
    }
}
