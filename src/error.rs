//! Faults that end a run, and errors raised while reading a program image.

use thiserror::Error;

use crate::memory::{Address, Word};

/// The result reported by a run that ends in a fault.
pub const SENTINEL: Word = -1;

/**
  A fatal condition encountered by the execution loop. Any fault ends the run immediately;
  there is no recovery and no partial result beyond the machine's state at the moment
  of the fault.
*/
#[derive(Error, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Fault {
  /// The command code of the word at `pointer` has no handler.
  #[error("unknown opcode {word} at address {pointer}")]
  UnknownOpcode { pointer: Address, word: Word },

  /// The word at `pointer` carries a mode digit outside {0, 1, 2}.
  #[error("invalid addressing mode in {word} at address {pointer}")]
  InvalidMode { pointer: Address, word: Word },

  /// A write would grow memory past the configured limit.
  #[error("write to address {address} exceeds memory limit of {limit} words")]
  MemoryLimit { address: Address, limit: usize },

  /// An input instruction ran with no queued value and no way to get one.
  #[error("input exhausted")]
  InputExhausted,

  /// The input provider hung up.
  #[error("input provider closed")]
  InputClosed,

  /// The output sink hung up.
  #[error("output sink closed")]
  OutputClosed,
}

/// Malformed program text.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
  #[error("program is empty")]
  Empty,

  #[error("unexpected input at line {line}, column {column}: `{fragment}`")]
  Unexpected {
    line     : usize,
    column   : usize,
    fragment : String
  },
}
