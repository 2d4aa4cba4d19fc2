//! Core data structures for the Autogeny digital-evolution engine.

pub mod data;

pub use data::genome::{Codon, Genome};
pub use data::hardware::{Hardware, Heads, INPUT_WINDOW, NUM_REGS, STACK_DEPTH};
pub use data::organism::{LocationId, Message, Organism, OrganismId};
