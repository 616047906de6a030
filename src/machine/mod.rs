//! The Intcode machine: a resumable execution loop over a private word memory.
//!
//! A machine runs until it needs something from its host. `resume` returns an `Event` at each
//! suspension point: when an input instruction finds no queued input, after every output
//! instruction, and when the program halts or faults. The host answers `NeedInput` with
//! `provide_input` and accepts an `Output` simply by resuming.

mod operand;

pub use operand::{destination_address, operand_value, raw_operand, resolve_operands};

use std::collections::VecDeque;
use std::fmt::{Display, Formatter};

use prettytable::{format as TableFormat, Table};

use crate::bytecode::{try_decode_instruction, Instruction, Opcode};
use crate::error::{Fault, SENTINEL};
use crate::memory::{Address, Memory, Word, DEFAULT_MEMORY_LIMIT};

/// Run-time settings of a machine.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MachineConfig {
  /// Largest number of words memory may grow to on either side of address zero.
  pub memory_limit: usize,
}

impl Default for MachineConfig {
  fn default() -> Self {
    MachineConfig {
      memory_limit: DEFAULT_MEMORY_LIMIT
    }
  }
}

/// How a run ended.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Outcome {
  /// Reached `Halt`; holds the word at address zero.
  Halted(Word),
  Faulted(Fault),
}

impl Outcome {
  /// The run result: the word at address zero, or `SENTINEL` if the run faulted.
  pub fn result(&self) -> Word {
    match self {
      Outcome::Halted(value) => *value,
      Outcome::Faulted(_)    => SENTINEL,
    }
  }

  pub fn is_fault(&self) -> bool {
    matches!(self, Outcome::Faulted(_))
  }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum State {
  Running,
  /// Stopped on an input instruction with nothing queued.
  AwaitingInput,
  Halted(Outcome),
}

/// The effect of executing a single instruction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Step {
  Continue,
  NeedInput,
  Output(Word),
  Halted(Outcome),
}

/// A suspension point reported by `Machine::resume`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Event {
  NeedInput,
  Output(Word),
  Halted(Outcome),
}

pub struct Machine {
  // Memory Store
  memory        : Memory,

  // Registers //
  pointer       : Address, // The next instruction word
  relative_base : Word,    // Offset for `Mode::Relative` operands

  // Values provided by the host and not yet consumed.
  input         : VecDeque<Word>,
  state         : State,
}

impl Machine {

  // region Construction and accessors

  /// Creates a machine whose memory is a copy of `program`.
  pub fn new(program: &[Word]) -> Machine {
    Machine::with_config(program, MachineConfig::default())
  }

  pub fn with_config(program: &[Word], config: MachineConfig) -> Machine {
    Machine {
      memory        : Memory::with_limit(program, config.memory_limit),
      pointer       : 0,
      relative_base : 0,
      input         : VecDeque::new(),
      state         : State::Running,
    }
  }

  pub fn memory(&self) -> &Memory {
    &self.memory
  }

  pub fn pointer(&self) -> Address {
    self.pointer
  }

  pub fn relative_base(&self) -> Word {
    self.relative_base
  }

  pub fn state(&self) -> &State {
    &self.state
  }

  /// The outcome of the run, once it has ended.
  pub fn outcome(&self) -> Option<&Outcome> {
    match &self.state {
      State::Halted(outcome) => Some(outcome),
      _                      => None
    }
  }

  // endregion

  // region Host interaction

  /// Queues a value for the next input instruction.
  pub fn provide_input(&mut self, value: Word) {
    self.input.push_back(value);
    if self.state == State::AwaitingInput {
      self.state = State::Running;
    }
  }

  /**
    Ends the run with `fault`. Hosts use this when a peer goes away; the machine itself uses
    it for every fault it detects. Has no effect on a machine that has already halted.
  */
  pub fn abort(&mut self, fault: Fault) -> Outcome {
    if let State::Halted(outcome) = &self.state {
      return outcome.clone();
    }
    #[cfg(feature = "trace_computation")]
      println!("Fault at {}: {}\n{}", self.pointer, fault, self);

    let outcome = Outcome::Faulted(fault);
    self.state  = State::Halted(outcome.clone());
    outcome
  }

  /// Runs until the next suspension point.
  pub fn resume(&mut self) -> Event {
    loop {
      match self.step() {
        Step::Continue         => continue,
        Step::NeedInput        => return Event::NeedInput,
        Step::Output(value)    => return Event::Output(value),
        Step::Halted(outcome)  => return Event::Halted(outcome),
      }
    }
  }

  /**
    Runs to completion against a fixed list of inputs, collecting every output. Running out of
    inputs is a fault.
  */
  pub fn run_with<I>(&mut self, inputs: I) -> (Outcome, Vec<Word>)
    where I: IntoIterator<Item = Word>
  {
    self.input.extend(inputs);
    let mut outputs = vec![];

    loop {
      match self.resume() {
        Event::Output(value)   => outputs.push(value),
        Event::NeedInput       => {
          let outcome = self.abort(Fault::InputExhausted);
          return (outcome, outputs);
        }
        Event::Halted(outcome) => return (outcome, outputs),
      }
    }
  }

  // endregion

  // region Execution

  /// Decodes and executes the instruction at the pointer.
  pub fn step(&mut self) -> Step {
    if let State::Halted(outcome) = &self.state {
      return Step::Halted(outcome.clone());
    }

    let word   = self.memory.read(self.pointer);
    let result =
      try_decode_instruction(word, self.pointer)
        .and_then(|instruction| self.execute(instruction));

    match result {
      Ok(step)   => step,
      Err(fault) => Step::Halted(self.abort(fault)),
    }
  }

  fn execute(&mut self, instruction: Instruction) -> Result<Step, Fault> {
    #[cfg(feature = "trace_computation")]
      println!("{:>5}: {}", self.pointer, self.disassemble_current(&instruction));

    let [a, b, c] =
      resolve_operands(&self.memory, self.pointer, self.relative_base, &instruction);
    let next      = self.pointer.wrapping_add(instruction.opcode.stride());

    let step = match instruction.opcode {

      Opcode::Add => {
        self.memory.write(c, a.wrapping_add(b))?;
        self.pointer = next;
        Step::Continue
      }

      Opcode::Multiply => {
        self.memory.write(c, a.wrapping_mul(b))?;
        self.pointer = next;
        Step::Continue
      }

      Opcode::Input => {
        match self.input.pop_front() {
          Some(value) => {
            self.memory.write(a, value)?;
            self.pointer = next;
            self.state   = State::Running;
            Step::Continue
          }
          None => {
            // The pointer stays on the input instruction so it runs again on resume.
            self.state = State::AwaitingInput;
            Step::NeedInput
          }
        }
      }

      Opcode::Output => {
        self.pointer = next;
        Step::Output(a)
      }

      Opcode::JumpIfTrue => {
        self.pointer = if a != 0 { b } else { next };
        Step::Continue
      }

      Opcode::JumpIfFalse => {
        self.pointer = if a == 0 { b } else { next };
        Step::Continue
      }

      Opcode::LessThan => {
        self.memory.write(c, (a < b) as Word)?;
        self.pointer = next;
        Step::Continue
      }

      Opcode::Equals => {
        self.memory.write(c, (a == b) as Word)?;
        self.pointer = next;
        Step::Continue
      }

      Opcode::AdjustBase => {
        self.relative_base = self.relative_base.wrapping_add(a);
        self.pointer       = next;
        Step::Continue
      }

      Opcode::Halt => {
        let outcome = Outcome::Halted(self.memory.read(0));
        self.state  = State::Halted(outcome.clone());
        #[cfg(feature = "trace_computation")] println!("{}", self);
        Step::Halted(outcome)
      }

    };

    Ok(step)
  }

  #[cfg(feature = "trace_computation")]
  fn disassemble_current(&self, instruction: &Instruction) -> String {
    let words: Vec<Word> =
      (0..instruction.opcode.arity())
        .map(|position| raw_operand(&self.memory, self.pointer, position))
        .collect();
    instruction.disassemble(&words)
  }

  // endregion

  // region Display methods

  fn make_memory_table(memory: &[Word], highlight: Option<usize>) -> Table {
    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"Address", ubl->"Contents"]);

    for (i, word) in memory.iter().enumerate() {
      match Some(i) == highlight {

        true  => {
          table.add_row(row![r->format!("* --> M[{}] =", i), format!("{}", word)]);
        }

        false => {
          table.add_row(row![r->format!("M[{}] =", i), format!("{}", word)]);
        }

      } // end match on highlight
    } // end for
    table
  }

  // endregion

}

lazy_static! {
  static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

impl Display for State {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      State::Running                           => write!(f, "Running"),
      State::AwaitingInput                     => write!(f, "Awaiting input"),
      State::Halted(Outcome::Halted(value))    => write!(f, "Halted with {}", value),
      State::Halted(Outcome::Faulted(fault))   => write!(f, "Faulted: {}", fault),
    }
  }
}

impl Display for Machine {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let highlight = usize::try_from(self.pointer).ok();
    let m_table   = Machine::make_memory_table(self.memory.as_slice(), highlight);

    write!(
      f,
      "State: {}\tPointer: {}\tRelative base: {}\n{}",
      self.state, self.pointer, self.relative_base, m_table
    )
  }
}
