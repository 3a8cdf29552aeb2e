//! This module defines `Tape`, a single rightward-growing tape with a read/write head.
//!
//! Tapes are values: `Tape::move_head` never mutates, it returns the tape that results from
//! the move. Configurations kept in a computation's history therefore never share mutable
//! state.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Direction, Move, TuringMachineError, BLANK_SYMBOL, START_SYMBOL};

/// A tape whose cell 0 always holds the start marker and whose cursor always lies on a cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTape")]
pub struct Tape {
    cells: Vec<char>,
    cursor: usize,
}

/// Unchecked form used to validate deserialized tapes.
#[derive(Deserialize)]
struct RawTape {
    cells: Vec<char>,
    cursor: usize,
}

impl TryFrom<RawTape> for Tape {
    type Error = TuringMachineError;

    fn try_from(raw: RawTape) -> Result<Self, Self::Error> {
        Tape::new(raw.cells, raw.cursor)
    }
}

impl Tape {
    /// Creates a tape, checking the start marker and the cursor bounds.
    ///
    /// # Returns
    ///
    /// * `Err(TuringMachineError::InvalidArgument)` if `cells` is empty.
    /// * `Err(TuringMachineError::StartSymbolNotFound)` if cell 0 is not the start marker.
    /// * `Err(TuringMachineError::TapeBoundary)` if `cursor` is not a valid cell index.
    pub fn new(cells: Vec<char>, cursor: usize) -> Result<Self, TuringMachineError> {
        if cells.is_empty() {
            return Err(TuringMachineError::InvalidArgument(
                "The tape cannot be empty".to_string(),
            ));
        }

        if cells[0] != START_SYMBOL {
            return Err(TuringMachineError::StartSymbolNotFound);
        }

        if cursor >= cells.len() {
            return Err(TuringMachineError::TapeBoundary {
                cursor: cursor as isize,
                length: cells.len(),
            });
        }

        Ok(Self { cells, cursor })
    }

    /// A tape holding only the start marker.
    pub fn empty() -> Self {
        Self {
            cells: vec![START_SYMBOL],
            cursor: 0,
        }
    }

    /// A tape holding the start marker followed by `input`, with the head on the marker.
    pub fn with_input(input: &str) -> Self {
        let mut cells = Vec::with_capacity(input.len() + 1);
        cells.push(START_SYMBOL);
        cells.extend(input.chars());

        Self { cells, cursor: 0 }
    }

    /// Returns the symbol under the head.
    pub fn current_symbol(&self) -> char {
        self.cells[self.cursor]
    }

    /// Writes `m.symbol` under the head, then moves the head by `m.direction`.
    ///
    /// Walking off the right edge appends exactly one blank cell. The tape never grows
    /// to the left: a head reading the start marker may only move right.
    pub fn move_head(&self, m: &Move) -> Result<Tape, TuringMachineError> {
        if self.current_symbol() == START_SYMBOL && m.direction != Direction::Right {
            return Err(TuringMachineError::InvalidTransition(format!(
                "the head reading '{START_SYMBOL}' must move right, not {}",
                m.direction
            )));
        }

        let new_cursor = self
            .cursor
            .checked_add_signed(m.direction.value())
            .ok_or(TuringMachineError::TapeBoundary {
                cursor: self.cursor as isize + m.direction.value(),
                length: self.cells.len(),
            })?;

        let mut cells = self.cells.clone();
        cells[self.cursor] = m.symbol;
        if new_cursor == cells.len() {
            cells.push(BLANK_SYMBOL);
        }

        Tape::new(cells, new_cursor)
    }

    /// The number of cells in use, counted towards the machine's space.
    pub fn space(&self) -> usize {
        self.cells.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cells(&self) -> &[char] {
        &self.cells
    }

    /// The tape contents as a string, start marker included.
    pub fn contents(&self) -> String {
        self.cells.iter().collect()
    }
}

impl fmt::Display for Tape {
    /// Formats as `<cells up to the head>,<remaining cells>`. A head on the last cell is
    /// followed by a blank so the next cell it would reach is visible.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (head, rest) = self.cells.split_at(self.cursor + 1);
        let head: String = head.iter().collect();
        let rest: String = rest.iter().collect();

        write!(f, "{head},{rest}")?;
        if rest.is_empty() {
            write!(f, "{BLANK_SYMBOL}")?;
        }

        Ok(())
    }
}
