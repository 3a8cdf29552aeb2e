//! This module defines the vocabulary shared by the whole engine: reserved tape symbols,
//! head directions, terminal states, the key and value types of the transition function,
//! execution outcomes and the error type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::Rule;

/// Marker stored in cell 0 of every tape. No move may leave it except to the right.
pub const START_SYMBOL: char = '>';
/// Symbol of a cell that has never been written.
pub const BLANK_SYMBOL: char = '_';
/// Pattern marker: matches any symbol when read, writes back the read symbol when written.
/// It never appears as tape content.
pub const WILDCARD_SYMBOL: char = '*';
/// The default number of steps `Computation::run_to_completion` executes before giving up.
pub const MAX_EXECUTION_STEPS: usize = 10000;

/// Represents the possible directions a Turing Machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Keep the head in the same position.
    Stay,
    /// Move the head one position to the right.
    Right,
    /// Move the head one position to the left.
    Left,
}

impl Direction {
    /// The signed offset applied to a cursor.
    pub fn value(self) -> isize {
        match self {
            Direction::Stay => 0,
            Direction::Right => 1,
            Direction::Left => -1,
        }
    }

    /// The direction that undoes this one. `Stay` is its own inverse.
    pub fn inverse(self) -> Self {
        match self {
            Direction::Stay => Direction::Stay,
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
        }
    }

    /// The arrow notation used by the textual instruction format.
    pub fn symbol(self) -> &'static str {
        match self {
            Direction::Stay => "-",
            Direction::Right => "->",
            Direction::Left => "<-",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Direction {
    type Err = TuringMachineError;

    /// Supports `-`/`S` for Stay, `->`/`R` for Right and `<-`/`L` for Left.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "-" | "S" => Ok(Direction::Stay),
            "->" | "R" => Ok(Direction::Right),
            "<-" | "L" => Ok(Direction::Left),
            other => Err(TuringMachineError::MalformedInstruction(format!(
                "Unsupported direction: {other}"
            ))),
        }
    }
}

/// The three reserved states in which a computation stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminalState {
    Accepting,
    Rejecting,
    Halting,
}

impl TerminalState {
    pub const ALL: [TerminalState; 3] = [
        TerminalState::Accepting,
        TerminalState::Rejecting,
        TerminalState::Halting,
    ];

    /// The state label reserved for this terminal state.
    pub fn symbol(self) -> &'static str {
        match self {
            TerminalState::Accepting => "yes",
            TerminalState::Rejecting => "no",
            TerminalState::Halting => "h",
        }
    }

    /// Classifies a state label, returning `None` for non-terminal states.
    pub fn of(state: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.symbol() == state)
    }

    pub fn is_terminal(state: &str) -> bool {
        Self::of(state).is_some()
    }
}

/// A single-tape action: the symbol to write under the head, then the head motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub symbol: char,
    pub direction: Direction,
}

impl Move {
    /// Leaves the start marker in place and steps off the origin.
    pub const START: Move = Move {
        symbol: START_SYMBOL,
        direction: Direction::Right,
    };

    pub fn new(symbol: char, direction: Direction) -> Self {
        Self { symbol, direction }
    }

    pub fn is_wildcard(&self) -> bool {
        self.symbol == WILDCARD_SYMBOL
    }

    /// Returns this move writing `symbol` instead of a wildcard. Literal moves are kept as is.
    pub fn substitute_wildcard(self, symbol: char) -> Self {
        if self.is_wildcard() {
            Self::new(symbol, self.direction)
        } else {
            self
        }
    }

    /// Same written symbol, opposite head motion.
    pub fn inverse(self) -> Self {
        Self::new(self.symbol, self.direction.inverse())
    }
}

/// The lookup key of the transition function: a state label and one symbol per tape.
///
/// When at least one symbol is the wildcard the key is also a pattern. Equality is
/// structural, so two patterns with wildcards in different positions are distinct keys
/// even if they cover overlapping inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateAndSymbols {
    pub state: String,
    pub symbols: Vec<char>,
}

impl StateAndSymbols {
    pub fn new(state: impl Into<String>, symbols: Vec<char>) -> Self {
        Self {
            state: state.into(),
            symbols,
        }
    }

    pub fn total_symbols(&self) -> usize {
        self.symbols.len()
    }

    pub fn contains_wildcards(&self) -> bool {
        self.symbols.contains(&WILDCARD_SYMBOL)
    }

    pub fn wildcard_count(&self) -> usize {
        self.symbols
            .iter()
            .filter(|&&s| s == WILDCARD_SYMBOL)
            .count()
    }

    /// Checks whether this pattern covers `other`: same state, and every position is either
    /// the wildcard or the exact symbol of `other`.
    pub fn matches(&self, other: &StateAndSymbols) -> bool {
        self.state == other.state
            && self.symbols.len() == other.symbols.len()
            && self
                .symbols
                .iter()
                .zip(&other.symbols)
                .all(|(&pattern, &symbol)| pattern == WILDCARD_SYMBOL || pattern == symbol)
    }
}

impl fmt::Display for StateAndSymbols {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.state)?;
        for symbol in &self.symbols {
            write!(f, ", {symbol}")?;
        }
        Ok(())
    }
}

/// The value of the transition function: the next state and one move per tape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    pub next_state: String,
    pub moves: Vec<Move>,
}

impl Transition {
    pub fn new(next_state: impl Into<String>, moves: Vec<Move>) -> Self {
        Self {
            next_state: next_state.into(),
            moves,
        }
    }

    /// The no-op self-loop into the rejecting state used when no rule matches.
    ///
    /// Every head stays and rewrites what it reads, except heads reading the start
    /// marker, which step right so the start-marker rule is never violated.
    pub fn rejecting(current: &StateAndSymbols) -> Self {
        let moves = current
            .symbols
            .iter()
            .map(|&symbol| {
                if symbol == START_SYMBOL {
                    Move::START
                } else {
                    Move::new(symbol, Direction::Stay)
                }
            })
            .collect();

        Self::new(TerminalState::Rejecting.symbol(), moves)
    }

    pub fn total_tapes(&self) -> usize {
        self.moves.len()
    }

    pub fn contains_wildcards(&self) -> bool {
        self.moves.iter().any(Move::is_wildcard)
    }

    /// Replaces each wildcard write with the symbol read at the same position.
    pub fn substitute_wildcards(&self, read: &[char]) -> Self {
        let moves = self
            .moves
            .iter()
            .zip(read)
            .map(|(m, &symbol)| m.substitute_wildcard(symbol))
            .collect();

        Self::new(self.next_state.clone(), moves)
    }

    /// The head motions that reverse this transition, one per tape.
    pub fn inverse_directions(&self) -> Vec<Direction> {
        self.moves.iter().map(|m| m.direction.inverse()).collect()
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.next_state)?;
        for m in &self.moves {
            write!(f, ", {}, {}", m.symbol, m.direction)?;
        }
        Ok(())
    }
}

/// How a computation ended when driven by `Computation::run`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Reached the accepting state.
    Accepted,
    /// Reached the rejecting state.
    Rejected,
    /// Reached the halting state; carries the output tape contents.
    Halted(String),
    /// Still running after the allowed number of steps.
    Exhausted { steps: usize },
}

/// Represents the errors the engine reports. None of them are transient: each one is a
/// contract violation by the program loader or the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// An instruction does not fit the program (wrong arity, literal wildcard write, ...).
    #[error("Malformed instruction: {0}")]
    MalformedInstruction(String),
    /// A second transition was added under an exact key that is already present.
    #[error("Duplicate transition for state {state} and symbols {symbols:?}")]
    DuplicateTransition { state: String, symbols: Vec<char> },
    /// A tape does not hold the start marker in cell 0.
    #[error("Start symbol not found in the first cell of the tape")]
    StartSymbolNotFound,
    /// A tape cursor lies outside the tape.
    #[error("Tape boundary exceeded: cursor {cursor} on a tape of length {length}")]
    TapeBoundary { cursor: isize, length: usize },
    /// A move would leave the start marker in a direction other than right.
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
    /// Stepping was requested in a terminal state.
    #[error("No next configuration: the computation is in terminal state {0}")]
    NoNextConfiguration(String),
    /// Undo was requested on the initial configuration.
    #[error("No previous configuration: the computation is at its initial configuration")]
    NoPreviousConfiguration,
    /// A constructor received a value it cannot accept.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Indicates an error while parsing the textual instruction notation.
    #[error("Instruction parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serialization() {
        let left = Direction::Left;
        let right = Direction::Right;

        let left_json = serde_json::to_string(&left).unwrap();
        let right_json = serde_json::to_string(&right).unwrap();

        assert_eq!(left_json, "\"Left\"");
        assert_eq!(right_json, "\"Right\"");

        let left_deserialized: Direction = serde_json::from_str(&left_json).unwrap();
        assert_eq!(left, left_deserialized);
    }

    #[test]
    fn test_direction_inverse() {
        assert_eq!(Direction::Right.inverse(), Direction::Left);
        assert_eq!(Direction::Left.inverse(), Direction::Right);
        assert_eq!(Direction::Stay.inverse(), Direction::Stay);

        for d in [Direction::Stay, Direction::Right, Direction::Left] {
            assert_eq!(d.inverse().inverse(), d);
            assert_eq!(d.inverse().value(), -d.value());
        }
    }

    #[test]
    fn test_direction_from_str() {
        assert_eq!("->".parse::<Direction>().unwrap(), Direction::Right);
        assert_eq!(" <- ".parse::<Direction>().unwrap(), Direction::Left);
        assert_eq!("-".parse::<Direction>().unwrap(), Direction::Stay);
        assert_eq!("L".parse::<Direction>().unwrap(), Direction::Left);
        assert!(matches!(
            "=>".parse::<Direction>(),
            Err(TuringMachineError::MalformedInstruction(_))
        ));
    }

    #[test]
    fn test_terminal_state_classification() {
        assert_eq!(TerminalState::of("yes"), Some(TerminalState::Accepting));
        assert_eq!(TerminalState::of("no"), Some(TerminalState::Rejecting));
        assert_eq!(TerminalState::of("h"), Some(TerminalState::Halting));
        assert_eq!(TerminalState::of("q0"), None);
        assert!(!TerminalState::is_terminal("halt"));
    }

    #[test]
    fn test_pattern_matching() {
        let pattern = StateAndSymbols::new("q", vec!['*', '1']);

        assert!(pattern.contains_wildcards());
        assert_eq!(pattern.wildcard_count(), 1);
        assert!(pattern.matches(&StateAndSymbols::new("q", vec!['0', '1'])));
        assert!(pattern.matches(&StateAndSymbols::new("q", vec![BLANK_SYMBOL, '1'])));
        assert!(!pattern.matches(&StateAndSymbols::new("q", vec!['0', '0'])));
        assert!(!pattern.matches(&StateAndSymbols::new("p", vec!['0', '1'])));
    }

    #[test]
    fn test_rejecting_transition() {
        let current = StateAndSymbols::new("q", vec![START_SYMBOL, '1', BLANK_SYMBOL]);
        let transition = Transition::rejecting(&current);

        assert_eq!(transition.next_state, "no");
        assert_eq!(
            transition.moves,
            vec![
                Move::new(START_SYMBOL, Direction::Right),
                Move::new('1', Direction::Stay),
                Move::new(BLANK_SYMBOL, Direction::Stay),
            ]
        );
    }

    #[test]
    fn test_transition_substitution_and_inverse() {
        let transition = Transition::new(
            "q1",
            vec![
                Move::new(WILDCARD_SYMBOL, Direction::Right),
                Move::new('x', Direction::Left),
            ],
        );

        assert!(transition.contains_wildcards());
        let substituted = transition.substitute_wildcards(&['c', 'd']);
        assert_eq!(substituted.moves[0], Move::new('c', Direction::Right));
        assert_eq!(substituted.moves[1], Move::new('x', Direction::Left));
        assert!(!substituted.contains_wildcards());

        assert_eq!(
            transition.inverse_directions(),
            vec![Direction::Left, Direction::Right]
        );
        assert_eq!(
            Move::new('x', Direction::Left).inverse(),
            Move::new('x', Direction::Right)
        );
    }

    #[test]
    fn test_error_display() {
        let error = TuringMachineError::NoNextConfiguration("yes".to_string());

        let error_msg = format!("{}", error);
        assert!(error_msg.contains("No next configuration"));
        assert!(error_msg.contains("yes"));
    }
}
