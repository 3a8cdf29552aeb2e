//! This module defines the `TuringMachine` struct, the immutable description of a multi-tape
//! machine, and `Computation`, one run of that machine on a given input.
//!
//! A computation keeps every configuration it has gone through, so it can be stepped forward
//! and backward. Stepping back restores the previous snapshot rather than inverting moves.

use std::sync::Arc;

use tracing::debug;

use crate::configuration::Configuration;
use crate::delta::DeltaProgram;
use crate::parser::Instruction;
use crate::types::{
    Outcome, StateAndSymbols, TerminalState, Transition, TuringMachineError, BLANK_SYMBOL,
    MAX_EXECUTION_STEPS, START_SYMBOL,
};

/// Represents a multi-tape Turing Machine: an initial state and a transition function.
///
/// The transition function is shared behind an `Arc`, so cloning a machine or starting
/// computations from it never copies the table, and computations may run on other threads.
#[derive(Debug, Clone)]
pub struct TuringMachine {
    initial_state: String,
    program: Arc<DeltaProgram>,
    name: Option<String>,
    description: Option<String>,
}

impl TuringMachine {
    /// Creates a new `TuringMachine` from an initial state label and a complete program.
    ///
    /// # Returns
    ///
    /// * `Err(TuringMachineError::InvalidArgument)` if `initial_state` is blank.
    pub fn new(
        initial_state: impl Into<String>,
        program: DeltaProgram,
    ) -> Result<Self, TuringMachineError> {
        let initial_state = initial_state.into();
        if initial_state.trim().is_empty() {
            return Err(TuringMachineError::InvalidArgument(
                "The initial state cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            initial_state,
            program: Arc::new(program),
            name: None,
            description: None,
        })
    }

    /// Builds the program from `instructions` and wraps it in a machine.
    pub fn from_instructions<I>(
        total_tapes: usize,
        initial_state: impl Into<String>,
        instructions: I,
    ) -> Result<Self, TuringMachineError>
    where
        I: IntoIterator<Item = Instruction>,
    {
        let mut program = DeltaProgram::new(total_tapes)?;
        for instruction in instructions {
            program.add_instruction(instruction)?;
        }

        Self::new(initial_state, program)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the initial state of the Turing Machine.
    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    pub fn total_tapes(&self) -> usize {
        self.program.total_tapes()
    }

    pub fn program(&self) -> &DeltaProgram {
        &self.program
    }

    /// Starts an independent computation on `input`. An empty input is valid.
    pub fn start_computation(&self, input: &str) -> Result<Computation, TuringMachineError> {
        Computation::new(Arc::clone(&self.program), &self.initial_state, input)
    }
}

/// One run of a `TuringMachine` on an input.
///
/// The current configuration is always the last entry of the history. A computation has a
/// single writer; independent computations over the same machine share nothing mutable.
#[derive(Debug, Clone)]
pub struct Computation {
    program: Arc<DeltaProgram>,
    input: String,
    history: Vec<Configuration>,
    transitions: Vec<Transition>,
    steps: usize,
    output: Option<String>,
}

impl Computation {
    fn new(
        program: Arc<DeltaProgram>,
        initial_state: &str,
        input: &str,
    ) -> Result<Self, TuringMachineError> {
        let initial = Configuration::initial(initial_state, input, program.total_tapes())?;

        Ok(Self {
            program,
            input: input.to_string(),
            history: vec![initial],
            transitions: Vec::new(),
            steps: 0,
            output: None,
        })
    }

    /// Resolves the transition the next step would take.
    ///
    /// # Returns
    ///
    /// * `Err(TuringMachineError::NoNextConfiguration)` if the current state is terminal;
    ///   no lookup is attempted in that case.
    pub fn next_transition(&self) -> Result<Transition, TuringMachineError> {
        let current = self.current_state_and_symbols();
        if TerminalState::is_terminal(&current.state) {
            return Err(TuringMachineError::NoNextConfiguration(
                current.state.clone(),
            ));
        }

        Ok(self.program.apply(current))
    }

    /// Executes a single step and returns the new current configuration.
    ///
    /// Each tape applies its move from the resolved transition. Entering the halting state
    /// extracts the output from the last tape.
    pub fn step(&mut self) -> Result<&Configuration, TuringMachineError> {
        let transition = self.next_transition()?;

        let tapes = self
            .current_configuration()
            .tapes()
            .iter()
            .zip(&transition.moves)
            .map(|(tape, m)| tape.move_head(m))
            .collect::<Result<Vec<_>, _>>()?;

        let configuration = Configuration::new(transition.next_state.clone(), tapes)?;

        self.steps += 1;
        if TerminalState::of(configuration.state()) == Some(TerminalState::Halting) {
            self.output = Some(Self::extract_output(&configuration));
        }

        debug!(
            step = self.steps,
            state = configuration.state(),
            space = configuration.space(),
            "step"
        );

        self.history.push(configuration);
        self.transitions.push(transition);

        Ok(self.current_configuration())
    }

    /// Undoes the last step and returns the restored configuration.
    ///
    /// # Returns
    ///
    /// * `Err(TuringMachineError::NoPreviousConfiguration)` on the initial configuration.
    pub fn step_back(&mut self) -> Result<&Configuration, TuringMachineError> {
        if !self.has_previous_configuration() {
            return Err(TuringMachineError::NoPreviousConfiguration);
        }

        self.history.pop();
        self.transitions.pop();
        self.steps -= 1;
        // Only a terminal configuration can be halting, and it is always the last one.
        self.output = None;

        debug!(step = self.steps, state = self.current_state(), "step back");

        Ok(self.current_configuration())
    }

    /// Steps until a terminal state is reached or `max_steps` more steps have been taken.
    pub fn run(&mut self, max_steps: usize) -> Result<Outcome, TuringMachineError> {
        for _ in 0..max_steps {
            if let Some(outcome) = self.outcome() {
                return Ok(outcome);
            }
            self.step()?;
        }

        Ok(self.outcome().unwrap_or(Outcome::Exhausted { steps: self.steps }))
    }

    /// Runs for at most `MAX_EXECUTION_STEPS` steps.
    pub fn run_to_completion(&mut self) -> Result<Outcome, TuringMachineError> {
        self.run(MAX_EXECUTION_STEPS)
    }

    /// The output tape without its start marker and trailing blanks.
    fn extract_output(configuration: &Configuration) -> String {
        let contents = configuration.output_tape().contents();
        let trimmed = contents.trim_end_matches(BLANK_SYMBOL);

        trimmed
            .strip_prefix(START_SYMBOL)
            .unwrap_or(trimmed)
            .to_string()
    }

    /// Classifies the current configuration, or `None` while the computation is running.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.terminal_state()? {
            TerminalState::Accepting => Some(Outcome::Accepted),
            TerminalState::Rejecting => Some(Outcome::Rejected),
            TerminalState::Halting => Some(Outcome::Halted(
                self.output
                    .clone()
                    .unwrap_or_else(|| Self::extract_output(self.current_configuration())),
            )),
        }
    }

    pub fn current_configuration(&self) -> &Configuration {
        // The history is never empty: it starts with the initial configuration and
        // `step_back` refuses to remove it.
        &self.history[self.history.len() - 1]
    }

    pub fn current_state(&self) -> &str {
        self.current_configuration().state()
    }

    pub fn current_state_and_symbols(&self) -> &StateAndSymbols {
        self.current_configuration().state_and_symbols()
    }

    /// Every configuration so far, starting with the initial one.
    pub fn configurations(&self) -> &[Configuration] {
        &self.history
    }

    /// The transitions taken so far; entry `i` led from configuration `i` to `i + 1`.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn last_transition(&self) -> Option<&Transition> {
        self.transitions.last()
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn space(&self) -> usize {
        self.current_configuration().space()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// The output of a halted computation. `None` unless the current state is halting.
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn has_next_configuration(&self) -> bool {
        !TerminalState::is_terminal(self.current_state())
    }

    pub fn has_previous_configuration(&self) -> bool {
        self.history.len() > 1
    }

    pub fn terminal_state(&self) -> Option<TerminalState> {
        TerminalState::of(self.current_state())
    }

    pub fn is_accepting_state(&self) -> bool {
        self.terminal_state() == Some(TerminalState::Accepting)
    }

    pub fn is_rejecting_state(&self) -> bool {
        self.terminal_state() == Some(TerminalState::Rejecting)
    }

    pub fn is_halting_state(&self) -> bool {
        self.terminal_state() == Some(TerminalState::Halting)
    }

    /// Checks if the computation has reached any terminal state.
    pub fn is_halted(&self) -> bool {
        self.terminal_state().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, Move, WILDCARD_SYMBOL};

    /// Replaces every `a` with `b` on a single tape, then halts on the first blank.
    fn create_rewrite_machine() -> TuringMachine {
        let instructions = [
            ("s, >", "s, >, ->"),
            ("s, a", "s, b, ->"),
            ("s, b", "s, b, ->"),
            ("s, _", "h, _, -"),
        ]
        .into_iter()
        .map(|(left, right)| Instruction::parse(left, right).unwrap());

        TuringMachine::from_instructions(1, "s", instructions).unwrap()
    }

    #[test]
    fn test_machine_creation() {
        let machine = create_rewrite_machine()
            .with_name("Rewrite")
            .with_description("a -> b");

        assert_eq!(machine.initial_state(), "s");
        assert_eq!(machine.total_tapes(), 1);
        assert_eq!(machine.program().len(), 4);
        assert_eq!(machine.name(), Some("Rewrite"));
        assert_eq!(machine.description(), Some("a -> b"));
    }

    #[test]
    fn test_blank_initial_state_rejected() {
        let program = DeltaProgram::new(1).unwrap();
        assert!(matches!(
            TuringMachine::new(" ", program),
            Err(TuringMachineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_computation_start() {
        let machine = create_rewrite_machine();
        let computation = machine.start_computation("ab").unwrap();

        assert_eq!(computation.steps(), 0);
        assert_eq!(computation.input(), "ab");
        assert_eq!(computation.current_state(), "s");
        assert_eq!(computation.configurations().len(), 1);
        assert_eq!(
            computation.current_configuration().input_tape().contents(),
            ">ab"
        );
        assert!(computation.has_next_configuration());
        assert!(!computation.has_previous_configuration());
        assert!(computation.outcome().is_none());
        assert_eq!(computation.output(), None);
    }

    #[test]
    fn test_step_and_output() {
        let machine = create_rewrite_machine();
        let mut computation = machine.start_computation("aba").unwrap();

        let configuration = computation.step().unwrap();
        assert_eq!(configuration.input_tape().cursor(), 1);

        while computation.has_next_configuration() {
            computation.step().unwrap();
        }

        assert!(computation.is_halting_state());
        assert!(computation.is_halted());
        assert!(!computation.is_accepting_state());
        assert_eq!(computation.steps(), 5);
        assert_eq!(computation.output(), Some("bbb"));
        assert_eq!(computation.transitions().len(), 5);
        assert_eq!(
            computation.last_transition().unwrap().moves,
            vec![Move::new('_', Direction::Stay)]
        );
    }

    #[test]
    fn test_step_back_restores_previous_configuration() {
        let machine = create_rewrite_machine();
        let mut computation = machine.start_computation("a").unwrap();

        let before = computation.current_configuration().clone();
        computation.step().unwrap();
        computation.step().unwrap();
        let middle = computation.configurations()[1].clone();

        assert_eq!(computation.step_back().unwrap(), &middle);
        assert_eq!(computation.step_back().unwrap(), &before);
        assert_eq!(computation.steps(), 0);
        assert!(computation.transitions().is_empty());
    }

    #[test]
    fn test_step_back_clears_output() {
        let machine = create_rewrite_machine();
        let mut computation = machine.start_computation("").unwrap();

        computation.run_to_completion().unwrap();
        assert_eq!(computation.output(), Some(""));

        computation.step_back().unwrap();
        assert_eq!(computation.output(), None);
        assert!(computation.has_next_configuration());
    }

    #[test]
    fn test_step_back_on_initial_configuration_fails() {
        let machine = create_rewrite_machine();
        let mut computation = machine.start_computation("a").unwrap();

        assert_eq!(
            computation.step_back().unwrap_err(),
            TuringMachineError::NoPreviousConfiguration
        );
    }

    #[test]
    fn test_step_in_terminal_state_fails() {
        let machine = create_rewrite_machine();
        let mut computation = machine.start_computation("a").unwrap();
        computation.run_to_completion().unwrap();

        let expected = TuringMachineError::NoNextConfiguration("h".to_string());
        assert_eq!(computation.next_transition().unwrap_err(), expected);
        assert_eq!(computation.step().unwrap_err(), expected);
    }

    #[test]
    fn test_unknown_symbol_rejects() {
        let machine = create_rewrite_machine();
        let mut computation = machine.start_computation("ax").unwrap();

        let outcome = computation.run_to_completion().unwrap();
        assert_eq!(outcome, Outcome::Rejected);
        assert!(computation.is_rejecting_state());
        assert_eq!(computation.output(), None);
        // The rejecting step leaves the tape untouched.
        assert_eq!(
            computation.current_configuration().input_tape().contents(),
            ">bx"
        );
    }

    #[test]
    fn test_run_with_step_limit() {
        let machine = create_rewrite_machine();
        let mut computation = machine.start_computation("aaaa").unwrap();

        assert_eq!(
            computation.run(2).unwrap(),
            Outcome::Exhausted { steps: 2 }
        );
        assert_eq!(
            computation.run(10).unwrap(),
            Outcome::Halted("bbbb".to_string())
        );
        assert_eq!(computation.steps(), 6);
    }

    #[test]
    fn test_illegal_move_from_start_symbol_is_reported() {
        let mut program = DeltaProgram::new(1).unwrap();
        program
            .add(
                StateAndSymbols::new("s", vec![START_SYMBOL]),
                Transition::new("s", vec![Move::new(START_SYMBOL, Direction::Left)]),
            )
            .unwrap();
        let machine = TuringMachine::new("s", program).unwrap();
        let mut computation = machine.start_computation("").unwrap();

        assert!(matches!(
            computation.step(),
            Err(TuringMachineError::InvalidTransition(_))
        ));
        // A failed step leaves the computation untouched.
        assert_eq!(computation.steps(), 0);
        assert_eq!(computation.configurations().len(), 1);
    }

    #[test]
    fn test_computations_are_independent() {
        let machine = create_rewrite_machine();
        let mut first = machine.start_computation("aa").unwrap();
        let second = machine.start_computation("aa").unwrap();

        first.run_to_completion().unwrap();

        assert_eq!(second.steps(), 0);
        assert_eq!(second.current_state(), "s");
        assert_eq!(
            second.current_configuration().input_tape().contents(),
            ">aa"
        );
    }

    #[test]
    fn test_wildcard_write_back_on_tape() {
        let mut program = DeltaProgram::new(2).unwrap();
        program
            .add_instruction(Instruction::parse("s, >, >", "s, >, ->, >, ->").unwrap())
            .unwrap();
        // Copy whatever is read on tape 0 onto tape 1.
        program
            .add(
                StateAndSymbols::new("s", vec![WILDCARD_SYMBOL, '_']),
                Transition::new(
                    "c",
                    vec![
                        Move::new(WILDCARD_SYMBOL, Direction::Stay),
                        Move::new('x', Direction::Stay),
                    ],
                ),
            )
            .unwrap();

        let machine = TuringMachine::new("s", program).unwrap();
        let mut computation = machine.start_computation("7").unwrap();
        computation.step().unwrap();
        let configuration = computation.step().unwrap();

        assert_eq!(configuration.state(), "c");
        assert_eq!(configuration.tapes()[0].contents(), ">7");
        assert_eq!(configuration.tapes()[1].contents(), ">x");
    }
}
