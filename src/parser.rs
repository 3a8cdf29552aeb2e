//! This module provides `Instruction`, one entry of a transition table, together with a parser
//! for its compact textual notation, utilizing the `pest` crate.
//!
//! An instruction is written as two comma-separated lists:
//!
//! ```text
//! s, 0, _          (state, then one symbol per tape; '*' matches any symbol)
//! q, 0, ->, _, -   (next state, then a write symbol and a direction per tape)
//! ```
//!
//! Directions are `->`, `<-` and `-` (`R`, `L` and `S` are accepted too).

use pest::{
    iterators::{Pair, Pairs},
    Parser as PestParser,
};
use pest_derive::Parser as PestParser;

use crate::types::{
    Direction, Move, StateAndSymbols, Transition, TuringMachineError, WILDCARD_SYMBOL,
};

/// Derives a `PestParser` for the instruction grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct InstructionParser;

/// A `(state, symbols) -> (next state, moves)` pair, ready to be added to a `DeltaProgram`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub key: StateAndSymbols,
    pub transition: Transition,
}

impl Instruction {
    pub fn new(key: StateAndSymbols, transition: Transition) -> Self {
        Self { key, transition }
    }

    /// Parses an instruction from its pattern (`left`) and action (`right`) notation.
    ///
    /// # Returns
    ///
    /// * `Err(TuringMachineError::ParseError)` if either side is not well-formed.
    /// * `Err(TuringMachineError::MalformedInstruction)` if the action writes the wildcard,
    ///   or if the number of moves differs from the number of symbols.
    pub fn parse(left: &str, right: &str) -> Result<Self, TuringMachineError> {
        let key = parse_pattern(left)?;
        let transition = parse_action(right)?;

        if key.total_symbols() != transition.total_tapes() {
            return Err(TuringMachineError::MalformedInstruction(format!(
                "pattern '{}' reads {} tapes but action '{}' moves {}",
                left.trim(),
                key.total_symbols(),
                right.trim(),
                transition.total_tapes()
            )));
        }

        Ok(Self { key, transition })
    }
}

/// Parses the `state, symbol, ...` side of an instruction.
pub fn parse_pattern(input: &str) -> Result<StateAndSymbols, TuringMachineError> {
    let root = parse_rule(Rule::pattern, input)?;
    let mut state = String::new();
    let mut symbols = Vec::new();

    for p in root {
        match p.as_rule() {
            Rule::state => state = p.as_str().to_string(),
            Rule::symbol => symbols.push(parse_symbol(&p)?),
            _ => {} // EOI
        }
    }

    Ok(StateAndSymbols::new(state, symbols))
}

/// Parses the `next_state, write, direction, ...` side of an instruction.
pub fn parse_action(input: &str) -> Result<Transition, TuringMachineError> {
    let root = parse_rule(Rule::action, input)?;
    let mut next_state = String::new();
    let mut moves = Vec::new();

    for p in root {
        match p.as_rule() {
            Rule::state => next_state = p.as_str().to_string(),
            Rule::move_pair => moves.push(parse_move(p)?),
            _ => {} // EOI
        }
    }

    Ok(Transition::new(next_state, moves))
}

/// Runs the grammar on `input` and returns the children of the top-level pair.
fn parse_rule(rule: Rule, input: &str) -> Result<Pairs<'_, Rule>, TuringMachineError> {
    let mut pairs = InstructionParser::parse(rule, input)
        .map_err(|e| TuringMachineError::ParseError(e.into()))?;

    pairs
        .next()
        .map(Pair::into_inner)
        .ok_or_else(|| TuringMachineError::MalformedInstruction(format!("empty input: {input:?}")))
}

/// Parses a `write, direction` pair, refusing literal wildcard writes.
fn parse_move(pair: Pair<Rule>) -> Result<Move, TuringMachineError> {
    let mut symbol = None;
    let mut direction = None;

    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::symbol => symbol = Some(parse_symbol(&p)?),
            Rule::direction => direction = Some(p.as_str().parse::<Direction>()?),
            _ => {}
        }
    }

    match (symbol, direction) {
        (Some(WILDCARD_SYMBOL), _) => Err(TuringMachineError::MalformedInstruction(format!(
            "it is not possible to write the special symbol '{WILDCARD_SYMBOL}'"
        ))),
        (Some(symbol), Some(direction)) => Ok(Move::new(symbol, direction)),
        _ => Err(TuringMachineError::MalformedInstruction(
            "a move needs a symbol and a direction".to_string(),
        )),
    }
}

fn parse_symbol(pair: &Pair<Rule>) -> Result<char, TuringMachineError> {
    pair.as_str().chars().next().ok_or_else(|| {
        TuringMachineError::MalformedInstruction("missing symbol".to_string())
    })
}
