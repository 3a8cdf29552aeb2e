//! This crate provides a deterministic multi-tape Turing Machine execution engine.
//! It includes modules for describing transition functions, simulating computations step by
//! step (forward and backward), measuring the space they use, and a few built-in machines.

pub mod configuration;
pub mod delta;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod tape;
pub mod types;

/// Re-exports the `Configuration` snapshot type.
pub use configuration::Configuration;
/// Re-exports the `DeltaProgram` transition function.
pub use delta::DeltaProgram;
/// Re-exports the `TuringMachine` and `Computation` structs from the machine module.
pub use machine::{Computation, TuringMachine};
/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use parser::Rule;
/// Re-exports the `Instruction` struct from the parser module.
pub use parser::Instruction;
/// Re-exports `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports the vocabulary types and constants from the types module.
pub use types::{
    Direction, Move, Outcome, StateAndSymbols, TerminalState, Transition, TuringMachineError,
    BLANK_SYMBOL, MAX_EXECUTION_STEPS, START_SYMBOL, WILDCARD_SYMBOL,
};
