//! This module defines `DeltaProgram`, the transition function of a multi-tape machine.
//!
//! Lookup first tries the exact `(state, symbols)` key. When that misses, every stored
//! pattern containing wildcards for the same state is tested, and when several patterns
//! match, the most specific one wins:
//!
//! 1. Candidates are ordered by ascending wildcard count, then by insertion order.
//! 2. Tape positions are scanned from left to right. At the first position where some
//!    surviving candidate holds a literal symbol, the first candidate (in the order above)
//!    holding a literal there wins.
//!
//! When nothing matches, the machine moves to the rejecting state without touching its
//! tapes (see `Transition::rejecting`).

use std::collections::HashMap;

use tracing::trace;

use crate::parser::Instruction;
use crate::types::{StateAndSymbols, Transition, TuringMachineError, WILDCARD_SYMBOL};

/// A stored pattern and the order in which it was added.
#[derive(Debug, Clone)]
struct Pattern {
    key: StateAndSymbols,
    wildcards: usize,
    order: usize,
}

/// The transition table of a machine with a fixed number of tapes.
///
/// A `DeltaProgram` is only mutated while the program is being assembled. Once wrapped in a
/// `TuringMachine` it is shared read-only between computations.
#[derive(Debug, Clone)]
pub struct DeltaProgram {
    total_tapes: usize,
    rules: HashMap<StateAndSymbols, Transition>,
    /// Wildcard keys grouped by state, in insertion order.
    patterns: HashMap<String, Vec<Pattern>>,
}

impl DeltaProgram {
    /// Creates an empty program for `total_tapes` tapes.
    ///
    /// # Returns
    ///
    /// * `Err(TuringMachineError::InvalidArgument)` if `total_tapes` is zero.
    pub fn new(total_tapes: usize) -> Result<Self, TuringMachineError> {
        if total_tapes == 0 {
            return Err(TuringMachineError::InvalidArgument(
                "The number of tapes must be greater than or equal to one".to_string(),
            ));
        }

        Ok(Self {
            total_tapes,
            rules: HashMap::new(),
            patterns: HashMap::new(),
        })
    }

    pub fn total_tapes(&self) -> usize {
        self.total_tapes
    }

    /// The number of stored transitions.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Adds a parsed instruction. See `DeltaProgram::add`.
    pub fn add_instruction(&mut self, instruction: Instruction) -> Result<usize, TuringMachineError> {
        let Instruction { key, transition } = instruction;
        self.add(key, transition)
    }

    /// Adds the transition taken from `key`, returning the number of stored transitions.
    ///
    /// Overlapping patterns are accepted here; ambiguity is resolved at lookup time.
    ///
    /// # Returns
    ///
    /// * `Err(TuringMachineError::MalformedInstruction)` if the key or the transition does
    ///   not hold exactly one entry per tape.
    /// * `Err(TuringMachineError::DuplicateTransition)` if `key` is already present.
    pub fn add(
        &mut self,
        key: StateAndSymbols,
        transition: Transition,
    ) -> Result<usize, TuringMachineError> {
        if key.total_symbols() != self.total_tapes {
            return Err(TuringMachineError::MalformedInstruction(format!(
                "expected {} symbols, one per tape, found {}",
                self.total_tapes,
                key.total_symbols()
            )));
        }

        if transition.total_tapes() != self.total_tapes {
            return Err(TuringMachineError::MalformedInstruction(format!(
                "expected {} moves, one per tape, found {}",
                self.total_tapes,
                transition.total_tapes()
            )));
        }

        if self.rules.contains_key(&key) {
            return Err(TuringMachineError::DuplicateTransition {
                state: key.state,
                symbols: key.symbols,
            });
        }

        if key.contains_wildcards() {
            let order = self.rules.len();
            self.patterns
                .entry(key.state.clone())
                .or_default()
                .push(Pattern {
                    wildcards: key.wildcard_count(),
                    key: key.clone(),
                    order,
                });
        }

        self.rules.insert(key, transition);

        Ok(self.rules.len())
    }

    /// Returns the stored transition for an exact key, without pattern resolution.
    pub fn get(&self, key: &StateAndSymbols) -> Option<&Transition> {
        self.rules.get(key)
    }

    /// Resolves the transition for the current state and symbols under the heads.
    ///
    /// Always succeeds: unmatched inputs resolve to the rejecting transition. Wildcard
    /// writes in the resolved transition are replaced by the symbols actually read.
    pub fn apply(&self, current: &StateAndSymbols) -> Transition {
        if let Some(transition) = self.rules.get(current) {
            trace!(key = %current, "exact transition");
            return Self::write_back(transition, current);
        }

        match self.find_pattern(current) {
            Some(pattern) => {
                trace!(key = %current, pattern = %pattern, "wildcard transition");
                match self.rules.get(pattern) {
                    Some(transition) => Self::write_back(transition, current),
                    None => Transition::rejecting(current),
                }
            }
            None => {
                trace!(key = %current, "no transition, rejecting");
                Transition::rejecting(current)
            }
        }
    }

    fn write_back(transition: &Transition, current: &StateAndSymbols) -> Transition {
        if transition.contains_wildcards() {
            transition.substitute_wildcards(&current.symbols)
        } else {
            transition.clone()
        }
    }

    /// Picks the most specific stored pattern covering `current`.
    fn find_pattern(&self, current: &StateAndSymbols) -> Option<&StateAndSymbols> {
        let mut survivors: Vec<&Pattern> = self
            .patterns
            .get(&current.state)?
            .iter()
            .filter(|p| p.key.matches(current))
            .collect();

        if survivors.len() > 1 {
            survivors.sort_by_key(|p| (p.wildcards, p.order));
        }

        let winner: Option<&Pattern> = (0..self.total_tapes)
            .find_map(|i| {
                survivors
                    .iter()
                    .copied()
                    .find(|p| p.key.symbols[i] != WILDCARD_SYMBOL)
            })
            .or_else(|| survivors.first().copied());

        winner.map(|p| &p.key)
    }
}
