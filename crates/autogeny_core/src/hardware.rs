//! The virtual CPU execution engine.
//!
//! Decodes `memory[ip] mod isa.len()` and dispatches one behavior per
//! cycle. The interpreter tolerates every evolved state: register and
//! head indices wrap, stack underflow is a silent no-op, and malformed
//! divides abort without touching the parent. Only two behaviors end a
//! cycle batch early: a successful `h_divide` and `die`.

use crate::config::SimConfig;
use crate::events::{Event, EventLog};
use crate::isa::{Isa, Op};
use crate::resources::ResourcePool;
use crate::tasks::TaskLibrary;
use autogeny_data::{Genome, Organism, OrganismId};

/// Side effect of one executed cycle that the world must resolve.
#[derive(Debug, Clone, PartialEq)]
pub enum StepEffect {
    None,
    /// A viable child genome was extracted; the parent has been reset.
    Divide(Genome),
    /// A register-pair payload for a neighbor's inbox.
    Message((u32, u32)),
    /// The organism terminated itself.
    Died,
}

/// Mutable world context threaded through instruction side effects.
pub struct StepCtx<'a> {
    pub resources: &'a mut ResourcePool,
    pub tasks: &'a TaskLibrary,
    pub events: &'a mut EventLog,
    pub config: &'a SimConfig,
    pub organism_id: OrganismId,
}

/// Result of an `execute` batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecOutcome {
    pub cycles: u64,
    pub effects: Vec<StepEffect>,
}

/// Execution logic over an organism's hardware state.
pub trait CpuLogic {
    /// Runs exactly one instruction cycle.
    fn step_cycle(&mut self, isa: &Isa, ctx: &mut StepCtx<'_>) -> StepEffect;

    /// Runs up to `n_cycles`, stopping early on divide or death.
    fn execute(&mut self, n_cycles: u64, isa: &Isa, ctx: &mut StepCtx<'_>) -> ExecOutcome;
}

impl CpuLogic for Organism {
    fn step_cycle(&mut self, isa: &Isa, ctx: &mut StepCtx<'_>) -> StepEffect {
        self.cycles_executed += 1;
        let codon = self.hardware.memory.get(self.hardware.heads.ip);
        let op = isa.decode(codon).op;

        match op {
            Op::Nop => self.hardware.advance_ip(),
            Op::IfNEqu => {
                let hw = &mut self.hardware;
                hw.advance_ip();
                if hw.reg(1) == hw.reg(2) {
                    hw.advance_ip();
                }
            }
            Op::IfLess => {
                let hw = &mut self.hardware;
                hw.advance_ip();
                if hw.reg(1) >= hw.reg(2) {
                    hw.advance_ip();
                }
            }
            Op::Push(r) => {
                let hw = &mut self.hardware;
                let value = hw.reg(r.index());
                hw.push(value);
                hw.advance_ip();
            }
            Op::Pop(r) => {
                let hw = &mut self.hardware;
                if let Some(value) = hw.pop() {
                    *hw.reg_mut(r.index()) = value;
                }
                hw.advance_ip();
            }
            Op::SwapStk => {
                self.hardware.active_stack ^= 1;
                self.hardware.advance_ip();
            }
            Op::Swap => {
                self.hardware.regs.swap(1, 2);
                self.hardware.advance_ip();
            }
            Op::Add => {
                let hw = &mut self.hardware;
                *hw.reg_mut(1) = hw.reg(1).wrapping_add(hw.reg(2));
                hw.advance_ip();
            }
            Op::Sub => {
                let hw = &mut self.hardware;
                *hw.reg_mut(1) = hw.reg(1).wrapping_sub(hw.reg(2));
                hw.advance_ip();
            }
            Op::Nand => {
                let hw = &mut self.hardware;
                *hw.reg_mut(1) = !(hw.reg(1) & hw.reg(2));
                hw.advance_ip();
            }
            Op::Inc(r) => {
                let hw = &mut self.hardware;
                *hw.reg_mut(r.index()) = hw.reg(r.index()).wrapping_add(1);
                hw.advance_ip();
            }
            Op::Dec(r) => {
                let hw = &mut self.hardware;
                *hw.reg_mut(r.index()) = hw.reg(r.index()).wrapping_sub(1);
                hw.advance_ip();
            }
            Op::Input(r) => {
                let hw = &mut self.hardware;
                if let Some(value) = hw.next_input() {
                    *hw.reg_mut(r.index()) = value;
                }
                hw.advance_ip();
            }
            Op::Output(r) => {
                let output = self.hardware.reg(r.index());
                self.hardware.advance_ip();
                perform_output(self, output, ctx);
            }
            Op::SendMsg => {
                let payload = (self.hardware.reg(1), self.hardware.reg(2));
                self.hardware.advance_ip();
                return StepEffect::Message(payload);
            }
            Op::RetrieveMsg => {
                self.hardware.advance_ip();
                if let Some(message) = self.inbox.pop_front() {
                    let hw = &mut self.hardware;
                    *hw.reg_mut(1) = message.data.0;
                    *hw.reg_mut(2) = message.data.1;
                }
            }
            Op::HAlloc => {
                self.hardware.allocate();
                self.hardware.advance_ip();
            }
            Op::HCopy => {
                let hw = &mut self.hardware;
                if hw.allocated() && hw.heads.read < hw.base_len {
                    let codon = hw.memory.get(hw.heads.read);
                    let write = hw.heads.write;
                    hw.memory.set(write, codon);
                    hw.heads.read += 1;
                    hw.heads.write = hw.wrap(hw.heads.write + 1);
                    // The IP holds until the parent region is consumed.
                    if hw.heads.read >= hw.base_len {
                        hw.advance_ip();
                    }
                } else {
                    hw.advance_ip();
                }
            }
            Op::HSearch => {
                let hw = &mut self.hardware;
                hw.heads.read = 0;
                hw.heads.flow = hw.heads.ip;
                hw.advance_ip();
            }
            Op::HDivide => return attempt_divide(self, ctx),
            Op::MovHead => {
                let hw = &mut self.hardware;
                hw.heads.ip = hw.wrap(hw.heads.flow);
            }
            Op::JmpHead => {
                let hw = &mut self.hardware;
                hw.heads.ip = hw.wrap(hw.heads.ip + hw.reg(2) as usize);
            }
            Op::GetHead => {
                let hw = &mut self.hardware;
                *hw.reg_mut(2) = hw.heads.ip as u32;
                hw.advance_ip();
            }
            Op::SetFlow => {
                let hw = &mut self.hardware;
                hw.heads.flow = hw.wrap(hw.reg(2) as usize);
                hw.advance_ip();
            }
            Op::Die => {
                self.alive = false;
                return StepEffect::Died;
            }
        }
        StepEffect::None
    }

    fn execute(&mut self, n_cycles: u64, isa: &Isa, ctx: &mut StepCtx<'_>) -> ExecOutcome {
        let mut outcome = ExecOutcome {
            cycles: 0,
            effects: Vec::new(),
        };
        while outcome.cycles < n_cycles {
            let effect = self.step_cycle(isa, ctx);
            outcome.cycles += 1;
            match effect {
                StepEffect::None => {}
                StepEffect::Message(_) => outcome.effects.push(effect),
                // Terminal for the batch: the turn ends here.
                StepEffect::Divide(_) | StepEffect::Died => {
                    outcome.effects.push(effect);
                    break;
                }
            }
        }
        outcome
    }
}

/// Task check after an `output` instruction. A match draws from the
/// linked resource (clipped) and credits the organism's merit.
fn perform_output(organism: &mut Organism, output: u32, ctx: &mut StepCtx<'_>) {
    let inputs: Vec<u32> = organism.hardware.recent_inputs.iter().copied().collect();
    let Some(task_id) = ctx.tasks.first_match(&inputs, output) else {
        return;
    };
    let Some(task) = ctx.tasks.get(task_id) else {
        return;
    };
    if organism.task_counts.len() < ctx.tasks.len() {
        organism.task_counts.resize(ctx.tasks.len(), 0);
    }
    let amount = task.reward(organism.task_counts[task_id.0]);
    let drawn = match task.consumes {
        Some(resource) => ctx.resources.consume(resource, amount),
        None => amount.max(0.0),
    };
    organism.merit += drawn;
    organism.task_counts[task_id.0] += 1;
    ctx.events.push(Event::TaskPerformed {
        organism: ctx.organism_id,
        task: task_id,
        amount: drawn,
    });
}

/// `h_divide`: extract `[read, write)` circularly, reject non-viable
/// lengths without touching the parent, otherwise reset the parent and
/// hand the child genome up to the replication pipeline.
fn attempt_divide(organism: &mut Organism, ctx: &mut StepCtx<'_>) -> StepEffect {
    let hw = &mut organism.hardware;
    if !hw.allocated() {
        hw.advance_ip();
        return StepEffect::None;
    }
    let codons = hw.memory.circular_range(hw.heads.read, hw.heads.write);
    let len = codons.len();
    if len < ctx.config.genome.min_size || len > ctx.config.genome.max_size {
        hw.advance_ip();
        return StepEffect::None;
    }
    let Some(genome) = Genome::new(codons) else {
        hw.advance_ip();
        return StepEffect::None;
    };
    hw.divide_reset();
    StepEffect::Divide(genome)
}
