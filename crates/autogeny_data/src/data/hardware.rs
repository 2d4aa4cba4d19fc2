use super::genome::{Codon, Genome};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Register file size. Register operands wrap modulo this.
pub const NUM_REGS: usize = 3;
/// Stack depth bound; pushes beyond it are dropped.
pub const STACK_DEPTH: usize = 16;
/// How many recent inputs the task predicates get to see.
pub const INPUT_WINDOW: usize = 3;

/// The four heads, each an index into the active memory image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heads {
    pub ip: usize,
    pub read: usize,
    pub write: usize,
    pub flow: usize,
}

/// Per-organism virtual CPU state.
///
/// `memory` is the active image: the genome itself, extended in place by
/// `h_alloc` during self-copy. `base_len` marks the parent region; the
/// image never exceeds twice that length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hardware {
    pub regs: [u32; NUM_REGS],
    pub heads: Heads,
    pub stacks: [Vec<u32>; 2],
    pub active_stack: usize,
    pub memory: Genome,
    pub base_len: usize,
    pub inputs: Vec<u32>,
    pub input_cursor: usize,
    pub recent_inputs: VecDeque<u32>,
}

impl Hardware {
    #[must_use]
    pub fn new(genome: &Genome, inputs: Vec<u32>) -> Self {
        Self {
            regs: [0; NUM_REGS],
            heads: Heads::default(),
            stacks: [
                Vec::with_capacity(STACK_DEPTH),
                Vec::with_capacity(STACK_DEPTH),
            ],
            active_stack: 0,
            memory: genome.clone(),
            base_len: genome.len(),
            inputs,
            input_cursor: 0,
            recent_inputs: VecDeque::with_capacity(INPUT_WINDOW),
        }
    }

    #[must_use]
    pub fn reg(&self, r: usize) -> u32 {
        self.regs[r % NUM_REGS]
    }

    pub fn reg_mut(&mut self, r: usize) -> &mut u32 {
        &mut self.regs[r % NUM_REGS]
    }

    /// Push to the active stack; silently dropped when full.
    pub fn push(&mut self, value: u32) {
        let stack = &mut self.stacks[self.active_stack % 2];
        if stack.len() < STACK_DEPTH {
            stack.push(value);
        }
    }

    /// Pop from the active stack; `None` on underflow.
    pub fn pop(&mut self) -> Option<u32> {
        self.stacks[self.active_stack % 2].pop()
    }

    /// Wraps a head position into the current memory image.
    #[must_use]
    pub fn wrap(&self, pos: usize) -> usize {
        pos % self.memory.len()
    }

    pub fn advance_ip(&mut self) {
        self.heads.ip = self.wrap(self.heads.ip + 1);
    }

    /// Next value from the input stream, cycling, recorded in the
    /// recent-input window. `None` when no inputs were configured.
    pub fn next_input(&mut self) -> Option<u32> {
        if self.inputs.is_empty() {
            return None;
        }
        let value = self.inputs[self.input_cursor % self.inputs.len()];
        self.input_cursor = self.input_cursor.wrapping_add(1);
        self.record_input(value);
        Some(value)
    }

    /// Records an input into the window, newest first.
    pub fn record_input(&mut self, value: u32) {
        if self.recent_inputs.len() == INPUT_WINDOW {
            self.recent_inputs.pop_back();
        }
        self.recent_inputs.push_front(value);
    }

    /// Whether `h_alloc` has already extended the image.
    #[must_use]
    pub fn allocated(&self) -> bool {
        self.memory.len() > self.base_len
    }

    /// Extends the image by the parent length (the 2x ceiling) and parks
    /// the write head at the start of the extension. No-op when already
    /// allocated.
    pub fn allocate(&mut self) {
        if !self.allocated() {
            self.memory.extend_with(0, self.base_len);
            self.heads.write = self.base_len;
        }
    }

    /// Post-divide reset: the parent keeps its base region and starts its
    /// next gestation from a clean state.
    pub fn divide_reset(&mut self) {
        self.memory.truncate(self.base_len);
        self.regs = [0; NUM_REGS];
        self.stacks[0].clear();
        self.stacks[1].clear();
        self.active_stack = 0;
        self.heads = Heads::default();
    }
}
