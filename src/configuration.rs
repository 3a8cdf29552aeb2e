//! This module defines `Configuration`, an immutable snapshot of a machine: its state and
//! every tape, plus the space metrics derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tape::Tape;
use crate::types::{StateAndSymbols, TuringMachineError};

/// A complete machine snapshot at one point of a computation.
///
/// Tape 0 is the input tape, the last tape is the output tape and the tapes in between are
/// work tapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawConfiguration")]
pub struct Configuration {
    state: String,
    tapes: Vec<Tape>,
    #[serde(skip_serializing)]
    current: StateAndSymbols,
    space: usize,
    space_input_output: usize,
}

#[derive(Deserialize)]
struct RawConfiguration {
    state: String,
    tapes: Vec<Tape>,
}

impl TryFrom<RawConfiguration> for Configuration {
    type Error = TuringMachineError;

    fn try_from(raw: RawConfiguration) -> Result<Self, Self::Error> {
        Configuration::new(raw.state, raw.tapes)
    }
}

impl Configuration {
    /// Creates a configuration, caching the symbols under the heads and the space metrics.
    ///
    /// # Returns
    ///
    /// * `Err(TuringMachineError::InvalidArgument)` if the state label is blank or there are
    ///   no tapes.
    pub fn new(state: impl Into<String>, tapes: Vec<Tape>) -> Result<Self, TuringMachineError> {
        let state = state.into();
        if state.trim().is_empty() {
            return Err(TuringMachineError::InvalidArgument(
                "The state cannot be empty".to_string(),
            ));
        }

        if tapes.is_empty() {
            return Err(TuringMachineError::InvalidArgument(
                "A configuration needs at least one tape".to_string(),
            ));
        }

        let symbols = tapes.iter().map(Tape::current_symbol).collect();
        let (space, space_input_output) = Self::measure(&tapes);

        Ok(Self {
            current: StateAndSymbols::new(state.clone(), symbols),
            state,
            tapes,
            space,
            space_input_output,
        })
    }

    /// Builds the starting configuration: the input tape holds the start marker followed by
    /// `input`, every other tape holds the start marker alone.
    pub fn initial(
        initial_state: &str,
        input: &str,
        total_tapes: usize,
    ) -> Result<Self, TuringMachineError> {
        if total_tapes == 0 {
            return Err(TuringMachineError::InvalidArgument(
                "The number of tapes must be greater than or equal to one".to_string(),
            ));
        }

        let tapes = std::iter::once(Tape::with_input(input))
            .chain(std::iter::repeat_with(Tape::empty).take(total_tapes - 1))
            .collect();

        Self::new(initial_state, tapes)
    }

    /// Returns `(space, space_input_output)`.
    ///
    /// With one or two tapes both metrics count every tape. With three or more, `space`
    /// counts every tape while `space_input_output` only counts the work tapes.
    fn measure(tapes: &[Tape]) -> (usize, usize) {
        match tapes {
            [only] => (only.space(), only.space()),
            [input, output] => {
                let total = input.space() + output.space();
                (total, total)
            }
            [input, work @ .., output] => {
                let work: usize = work.iter().map(Tape::space).sum();
                (input.space() + work + output.space(), work)
            }
            [] => (0, 0),
        }
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn tapes(&self) -> &[Tape] {
        &self.tapes
    }

    /// The symbols under each head, in tape order.
    pub fn current_symbols(&self) -> &[char] {
        &self.current.symbols
    }

    /// The key used to look up the next transition.
    pub fn state_and_symbols(&self) -> &StateAndSymbols {
        &self.current
    }

    pub fn space(&self) -> usize {
        self.space
    }

    pub fn space_input_output(&self) -> usize {
        self.space_input_output
    }

    pub fn input_tape(&self) -> &Tape {
        &self.tapes[0]
    }

    pub fn output_tape(&self) -> &Tape {
        &self.tapes[self.tapes.len() - 1]
    }
}

impl fmt::Display for Configuration {
    /// Formats as `(state,tape0,tape1,...)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.state)?;
        for tape in &self.tapes {
            write!(f, ",{tape}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::START_SYMBOL;

    fn tape(content: &str) -> Tape {
        Tape::new(content.chars().collect(), 0).unwrap()
    }

    #[test]
    fn test_initial_configuration() {
        let configuration = Configuration::initial("s", "01", 3).unwrap();

        assert_eq!(configuration.state(), "s");
        assert_eq!(configuration.tapes().len(), 3);
        assert_eq!(configuration.input_tape().contents(), ">01");
        assert_eq!(configuration.output_tape().contents(), ">");
        assert_eq!(configuration.current_symbols(), &[START_SYMBOL; 3]);
        assert_eq!(configuration.state_and_symbols().state, "s");
    }

    #[test]
    fn test_space_single_tape() {
        let configuration = Configuration::new("s", vec![tape(">abc")]).unwrap();
        assert_eq!(configuration.space(), 4);
        assert_eq!(configuration.space_input_output(), 4);
    }

    #[test]
    fn test_space_two_tapes() {
        let configuration = Configuration::new("s", vec![tape(">abc"), tape(">d")]).unwrap();
        assert_eq!(configuration.space(), 6);
        assert_eq!(configuration.space_input_output(), 6);
    }

    #[test]
    fn test_space_three_or_more_tapes() {
        let configuration =
            Configuration::new("s", vec![tape(">abc"), tape(">de"), tape(">f")]).unwrap();
        assert_eq!(configuration.space(), 9);
        assert_eq!(configuration.space_input_output(), 3);

        let configuration = Configuration::new(
            "s",
            vec![tape(">a"), tape(">bb"), tape(">ccc"), tape(">dddd")],
        )
        .unwrap();
        assert_eq!(configuration.space(), 2 + 3 + 4 + 5);
        assert_eq!(configuration.space_input_output(), 3 + 4);
    }

    #[test]
    fn test_blank_state_is_rejected() {
        for state in ["", "   "] {
            let result = Configuration::new(state, vec![Tape::empty()]);
            assert!(matches!(
                result,
                Err(TuringMachineError::InvalidArgument(_))
            ));
        }

        let result = Configuration::new("s", Vec::new());
        assert!(matches!(
            result,
            Err(TuringMachineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_configuration_display() {
        let configuration = Configuration::initial("s", "01", 2).unwrap();
        assert_eq!(configuration.to_string(), "(s,>,01,>,_)");
    }
}
