//! The instruction set architecture: an ordered, append-only table
//! mapping opcode to behavior.
//!
//! The table is resolved once per run and shared read-only across all
//! organisms. Codons decode modulo the table length, so every codon value
//! names some instruction and random genomes are always executable.

use autogeny_data::Codon;

/// Register operand. Wraps modulo the register file size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg {
    A,
    B,
    C,
}

impl Reg {
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Reg::A => 0,
            Reg::B => 1,
            Reg::C => 2,
        }
    }
}

/// Instruction behavior, dispatched once per cycle with a uniform
/// signature. Variants carry their register operands so experiment
/// configurations can assemble tables with different targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Inert padding. Consumes a cycle, no side effects.
    Nop,
    /// Skip the next instruction when BX == CX.
    IfNEqu,
    /// Skip the next instruction unless BX < CX.
    IfLess,
    Push(Reg),
    Pop(Reg),
    /// Toggle the active stack.
    SwapStk,
    /// Swap BX and CX.
    Swap,
    /// BX += CX, wrapping.
    Add,
    /// BX -= CX, wrapping.
    Sub,
    /// BX = !(BX & CX).
    Nand,
    Inc(Reg),
    Dec(Reg),
    /// Next environment input into the register, recorded in the
    /// recent-input window.
    Input(Reg),
    /// Emit the register value and run the task check.
    Output(Reg),
    /// Send (BX, CX) to a neighbor's inbox.
    SendMsg,
    /// Pop the oldest inbox message into (BX, CX).
    RetrieveMsg,
    /// Extend the memory image for self-copy.
    HAlloc,
    /// Copy one codon from the read head to the write head. The IP holds
    /// until the parent region has been consumed.
    HCopy,
    /// Read head to origin, flow head anchored at the IP.
    HSearch,
    /// Offer `[read, write)` of the image to the replication pipeline.
    /// Ends the cycle batch on success.
    HDivide,
    /// IP jumps to the flow head.
    MovHead,
    /// IP advances by CX.
    JmpHead,
    /// CX = IP.
    GetHead,
    /// Flow head = CX.
    SetFlow,
    /// Self-termination.
    Die,
}

/// A named table entry.
#[derive(Debug, Clone)]
pub struct Instruction {
    pub name: String,
    pub op: Op,
}

/// The opcode table. Append-only; opcode value equals table position.
#[derive(Debug, Clone, Default)]
pub struct Isa {
    table: Vec<Instruction>,
}

impl Isa {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a behavior, returning its opcode.
    pub fn append(&mut self, name: impl Into<String>, op: Op) -> Codon {
        self.table.push(Instruction {
            name: name.into(),
            op,
        });
        (self.table.len() - 1) as Codon
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Decodes a codon to its instruction, wrapping modulo the table.
    #[must_use]
    pub fn decode(&self, codon: Codon) -> &Instruction {
        &self.table[codon as usize % self.table.len()]
    }

    #[must_use]
    pub fn get(&self, opcode: usize) -> Option<&Instruction> {
        self.table.get(opcode)
    }

    /// Opcode of a named instruction, for assembling genomes by hand.
    #[must_use]
    pub fn opcode_of(&self, name: &str) -> Option<Codon> {
        self.table
            .iter()
            .position(|inst| inst.name == name)
            .map(|i| i as Codon)
    }
}

/// The canonical instruction set.
#[must_use]
pub fn default_isa() -> Isa {
    let mut isa = Isa::new();
    isa.append("nop_a", Op::Nop);
    isa.append("nop_b", Op::Nop);
    isa.append("nop_c", Op::Nop);
    isa.append("if_n_equ", Op::IfNEqu);
    isa.append("if_less", Op::IfLess);
    isa.append("push", Op::Push(Reg::B));
    isa.append("pop", Op::Pop(Reg::B));
    isa.append("swap_stk", Op::SwapStk);
    isa.append("swap", Op::Swap);
    isa.append("add", Op::Add);
    isa.append("sub", Op::Sub);
    isa.append("nand", Op::Nand);
    isa.append("inc", Op::Inc(Reg::B));
    isa.append("dec", Op::Dec(Reg::B));
    isa.append("input", Op::Input(Reg::B));
    isa.append("output", Op::Output(Reg::B));
    isa.append("send_msg", Op::SendMsg);
    isa.append("retrieve_msg", Op::RetrieveMsg);
    isa.append("h_alloc", Op::HAlloc);
    isa.append("h_copy", Op::HCopy);
    isa.append("h_search", Op::HSearch);
    isa.append("h_divide", Op::HDivide);
    isa.append("mov_head", Op::MovHead);
    isa.append("jmp_head", Op::JmpHead);
    isa.append("get_head", Op::GetHead);
    isa.append("set_flow", Op::SetFlow);
    isa.append("die", Op::Die);
    isa
}
