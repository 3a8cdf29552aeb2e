//! Built-in sample machines and a read-only catalog to look them up by name.

use crate::delta::DeltaProgram;
use crate::machine::TuringMachine;
use crate::parser::Instruction;
use crate::types::{
    Direction, Move, StateAndSymbols, Transition, TuringMachineError, WILDCARD_SYMBOL,
};

/// Two tapes: copies the input, then compares it with the copy read backwards.
const PALINDROME: [(&str, &str); 13] = [
    ("s, >, >", "s  , >, ->, >, ->"),
    ("s, 1, _", "s  , 1, ->, 1, ->"),
    ("s, 0, _", "s  , 0, ->, 0, ->"),
    ("s, _, _", "q  , _, <-, _, - "),
    ("q, 0, _", "q  , 0, <-, _, - "),
    ("q, 1, _", "q  , 1, <-, _, - "),
    ("q, >, _", "p  , >, ->, _, <-"),
    ("q, _, >", "yes, >, ->, _, <-"),
    ("p, 0, 0", "p  , 0, ->, 0, <-"),
    ("p, 1, 1", "p  , 1, ->, 1, <-"),
    ("p, 0, 1", "no , 0, - , 1, - "),
    ("p, 1, 0", "no , 1, - , 0, - "),
    ("p, _, >", "yes, _, - , >, ->"),
];

/// Three tapes: adds the two binary numbers of `x;y` and halts with the sum on the output tape.
const BINARY_SUM: [(&str, &str); 43] = [
    ("s, >, >, >", "s, >, ->, >, ->, >, ->"),
    ("s, 0, _, _", "s, 0, ->, _, -, 0, ->"),
    ("s, 1, _, _", "s, 1, ->, _, -, 0, ->"),
    ("s, ;, _, _", "c, ;, ->, _, -, 0, ->"),
    ("c, 0, _, _", "c, 0, ->, 0, ->, 0, ->"),
    ("c, 1, _, _", "c, 1, ->, 1, ->, 0, ->"),
    ("c, _, _, _", "b, _, <-, _, -, _, -"),
    ("b, 0, _, _", "b, 0, <-, _, -, _, -"),
    ("b, 1, _, _", "b, 1, <-, _, -, _, -"),
    ("b, ;, _, _", "q0, ;, <-, _, <-, _, <-"),
    ("q0, 0, 0, 0", "q0, 0, <-, 0, <-, 0, <-"),
    ("q0, 0, 1, 0", "q0, 0, <-, 1, <-, 1, <-"),
    ("q0, 1, 0, 0", "q0, 1, <-, 0, <-, 1, <-"),
    ("q0, 1, 1, 0", "q1, 1, <-, 1, <-, 0, <-"),
    ("q1, 0, 0, 0", "q0, 0, <-, 0, <-, 1, <-"),
    ("q1, 0, 1, 0", "q1, 0, <-, 1, <-, 0, <-"),
    ("q1, 1, 0, 0", "q1, 1, <-, 0, <-, 0, <-"),
    ("q1, 1, 1, 0", "q1, 1, <-, 1, <-, 1, <-"),
    ("q0, >, >, 0", "h, >, ->, >, ->, 0, -"),
    ("q0, >, 0, 0", "c2, >, ->, 0, <-, 0, <-"),
    ("q0, >, 1, 0", "c2, >, ->, 1, <-, 1, <-"),
    ("q0, 0, >, 0", "c1, 0, <-, >, ->, 0, <-"),
    ("q0, 1, >, 0", "c1, 1, <-, >, ->, 1, <-"),
    ("c2, 0, 0, 0", "c2, 0, -, 0, <-, 0, <-"),
    ("c2, 1, 0, 0", "c2, 0, -, 0, <-, 0, <-"),
    ("c2, >, 0, 0", "c2, 0, -, 0, <-, 0, <-"),
    ("c2, _, 0, 0", "c2, 0, -, 0, <-, 0, <-"),
    ("c2, ;, 0, 0", "c2, 0, -, 0, <-, 0, <-"),
    ("c2, 0, 1, 0", "c2, 0, -, 1, <-, 1, <-"),
    ("c2, 1, 1, 0", "c2, 0, -, 1, <-, 1, <-"),
    ("c2, >, 1, 0", "c2, 0, -, 1, <-, 1, <-"),
    ("c2, _, 1, 0", "c2, 0, -, 1, <-, 1, <-"),
    ("c2, ;, 1, 0", "c2, 0, -, 1, <-, 1, <-"),
    ("c2, 0, >, 0", "h, 0, -, >, ->, 0, <-"),
    ("c2, 1, >, 0", "h, 1, -, >, ->, 0, <-"),
    ("c2, >, >, 0", "h, >, -, >, ->, 0, <-"),
    ("c2, _, >, 0", "h, _, -, >, ->, 0, <-"),
    ("c1, 0, 0, 0", "c1, 0, <-, 0, -, 0, <-"),
    ("c1, 0, 1, 0", "c1, 0, <-, 1, -, 0, <-"),
    ("c1, 1, 0, 0", "c1, 1, <-, 0, -, 1, <-"),
    ("c1, 1, 1, 0", "c1, 1, <-, 1, -, 1, <-"),
    ("c1, >, 0, 0", "h, >, ->, 0, -, 0, <-"),
    ("c1, >, 1, 0", "h, >, ->, 1, -, 0, <-"),
];

/// One tape: walks to the end of a binary number, keeps the lowest `1` and flips every bit
/// above it.
const TWOS_COMPLEMENT: [(&str, &str); 8] = [
    ("s, >", "s, >, ->"),
    ("s, _", "l, _, <-"),
    ("l, 0", "l, 0, <-"),
    ("l, 1", "f, 1, <-"),
    ("l, >", "h, >, ->"),
    ("f, *", "f, 1, <-"),
    ("f, 1", "f, 0, <-"),
    ("f, >", "h, >, ->"),
];

fn parse_all(table: &[(&str, &str)]) -> Result<Vec<Instruction>, TuringMachineError> {
    table
        .iter()
        .map(|(left, right)| Instruction::parse(left, right))
        .collect()
}

/// A two-tape machine deciding `{ x in {0,1}* | x is a palindrome }`.
pub fn palindrome_two_tapes() -> Result<TuringMachine, TuringMachineError> {
    Ok(TuringMachine::from_instructions(2, "s", parse_all(&PALINDROME)?)?
        .with_name("Palindrome")
        .with_description("Accepts binary strings that read the same in both directions"))
}

/// A three-tape machine computing the sum of two binary numbers written as `x;y`.
pub fn binary_sum_three_tapes() -> Result<TuringMachine, TuringMachineError> {
    Ok(TuringMachine::from_instructions(3, "s", parse_all(&BINARY_SUM)?)?
        .with_name("Binary sum")
        .with_description("Halts with the sum of the two binary numbers x;y on the output tape"))
}

/// A single-tape machine computing the two's complement of a binary number in place.
///
/// While scanning right every symbol is written back through a wildcard write, which the
/// textual notation cannot express, so that rule is added directly. When flipping, the
/// exact `f, 1` and `f, >` rules take precedence over the `f, *` pattern.
pub fn twos_complement() -> Result<TuringMachine, TuringMachineError> {
    let mut program = DeltaProgram::new(1)?;
    for instruction in parse_all(&TWOS_COMPLEMENT)? {
        program.add_instruction(instruction)?;
    }

    program.add(
        StateAndSymbols::new("s", vec![WILDCARD_SYMBOL]),
        Transition::new("s", vec![Move::new(WILDCARD_SYMBOL, Direction::Right)]),
    )?;

    Ok(TuringMachine::new("s", program)?
        .with_name("Two's complement")
        .with_description("Halts with the two's complement of the binary input"))
}

type Builder = fn() -> Result<TuringMachine, TuringMachineError>;

const BUILDERS: [Builder; 3] = [palindrome_two_tapes, binary_sum_three_tapes, twos_complement];

lazy_static::lazy_static! {
    /// The built-in machines, assembled once. Machines that fail to build are left out.
    pub static ref PROGRAMS: Vec<TuringMachine> = BUILDERS
        .iter()
        .filter_map(|build| match build() {
            Ok(machine) => Some(machine),
            Err(e) => {
                tracing::warn!(error = %e, "failed to build a built-in program");
                None
            }
        })
        .collect();
}

pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        PROGRAMS.len()
    }

    /// List all program names
    pub fn list_program_names() -> Vec<String> {
        PROGRAMS
            .iter()
            .filter_map(|machine| machine.name().map(str::to_string))
            .collect()
    }

    /// Get a program by its index
    pub fn get_program_by_index(index: usize) -> Result<TuringMachine, TuringMachineError> {
        PROGRAMS.get(index).cloned().ok_or_else(|| {
            TuringMachineError::InvalidArgument(format!("Program index {} out of range", index))
        })
    }

    /// Get a program by its name, ignoring case
    pub fn get_program_by_name(name: &str) -> Result<TuringMachine, TuringMachineError> {
        PROGRAMS
            .iter()
            .find(|machine| {
                machine
                    .name()
                    .is_some_and(|n| n.eq_ignore_ascii_case(name))
            })
            .cloned()
            .ok_or_else(|| {
                TuringMachineError::InvalidArgument(format!("Program '{}' not found", name))
            })
    }

    /// Get information about a program by its index
    pub fn get_program_info(index: usize) -> Result<ProgramInfo, TuringMachineError> {
        let machine = Self::get_program_by_index(index)?;

        Ok(ProgramInfo {
            index,
            name: machine.name().unwrap_or_default().to_string(),
            description: machine.description().unwrap_or_default().to_string(),
            initial_state: machine.initial_state().to_string(),
            total_tapes: machine.total_tapes(),
            transition_count: machine.program().len(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: String,
    pub description: String,
    pub initial_state: String,
    pub total_tapes: usize,
    pub transition_count: usize,
}
