//! A virtual machine for Intcode programs.
//!
//! A program is a sequence of signed words that the machine executes in place. Instructions
//! address their operands directly, indirectly through memory, or relative to an adjustable
//! base, and memory grows on demand. Input and output instructions suspend the machine so
//! that a host can feed it, drain it, or wire several machines together.

#[macro_use] extern crate prettytable;
#[macro_use] extern crate lazy_static;

pub mod bytecode;
pub mod error;
pub mod host;
pub mod machine;
pub mod memory;
pub mod pipeline;

pub use error::{Fault, ParseError, SENTINEL};
pub use host::{run, run_outcome, InputProvider, OutputSink};
pub use machine::{Event, Machine, MachineConfig, Outcome};
pub use memory::Word;
