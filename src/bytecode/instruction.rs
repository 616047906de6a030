use std::fmt::{Display, Formatter};

use strum_macros::{Display as StrumDisplay, IntoStaticStr, EnumString};
use num_enum::{TryFromPrimitive, IntoPrimitive};

use crate::memory::Word;

/// Largest number of operands any instruction takes.
pub const MAX_OPERANDS: usize = 3;

/**
  Command codes of the virtual machine. The discriminant of each variant is the command
  code as it appears in the low two decimal digits of an instruction word.
*/
#[derive(
  StrumDisplay, IntoStaticStr, EnumString, TryFromPrimitive, IntoPrimitive,
  Clone,        Copy,          Eq,         PartialEq,        Debug,          Hash
)]
#[repr(u8)]
pub enum Opcode {
  Add          =  1, // add( a, b, ->dest )
  Multiply     =  2, // multiply( a, b, ->dest )
  Input        =  3, // input( ->dest )
  Output       =  4, // output( a )
  JumpIfTrue   =  5, // jump_if_true( a, target )
  JumpIfFalse  =  6, // jump_if_false( a, target )
  LessThan     =  7, // less_than( a, b, ->dest )
  Equals       =  8, // equals( a, b, ->dest )
  AdjustBase   =  9, // adjust_base( a )
  Halt         = 99, // halt
}

impl Opcode {
  /// Total number of operands, including the destination operand if there is one.
  pub fn arity(&self) -> usize {
    match self {
      | Opcode::Add
      | Opcode::Multiply
      | Opcode::LessThan
      | Opcode::Equals      => 3,

      | Opcode::JumpIfTrue
      | Opcode::JumpIfFalse => 2,

      | Opcode::Input
      | Opcode::Output
      | Opcode::AdjustBase  => 1,

      Opcode::Halt          => 0,
    }
  }

  /// Whether the last operand is a write destination rather than a value.
  pub fn has_destination(&self) -> bool {
    match self {
      | Opcode::Add
      | Opcode::Multiply
      | Opcode::Input
      | Opcode::LessThan
      | Opcode::Equals => true,
      _                => false
    }
  }

  /// How far the pointer moves when the instruction does not jump.
  pub fn stride(&self) -> Word {
    1 + self.arity() as Word
  }
}

/// Per-operand interpretation rule, one decimal digit of the instruction word.
#[derive(
  TryFromPrimitive, IntoPrimitive,
  Clone,            Copy,          Eq, PartialEq, Debug, Hash
)]
#[repr(u8)]
pub enum Mode {
  /// The operand is an address to dereference.
  Pointer   = 0,
  /// The operand is the value itself.
  Immediate = 1,
  /// The operand is an address offset by the relative base.
  Relative  = 2,
}

impl Mode {
  pub fn is_relative(&self) -> bool {
    *self == Mode::Relative
  }
}

/// A decoded instruction word: what to do, and how to read each operand.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Instruction {
  pub opcode : Opcode,
  pub modes  : [Mode; MAX_OPERANDS],
}

/// An operand word together with its addressing mode, for display.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Operand {
  pub mode : Mode,
  pub raw  : Word,
}

impl Display for Operand {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self.mode {
      Mode::Pointer   => write!(f, "[{}]", self.raw),
      Mode::Immediate => write!(f, "#{}", self.raw),
      Mode::Relative  => write!(f, "rb[{}]", self.raw),
    }
  }
}

impl Instruction {

  /// Pairs each of this instruction's operand words with its mode. `words` are the memory
  /// words immediately following the instruction word.
  pub fn operands(&self, words: &[Word]) -> Vec<Operand> {
    self.modes
        .iter()
        .zip(words.iter())
        .take(self.opcode.arity())
        .map(|(mode, raw)| Operand{ mode: *mode, raw: *raw })
        .collect()
  }

  /// Text form of the instruction, e.g. `Add([9], #10, rb[3])`.
  pub fn disassemble(&self, words: &[Word]) -> String {
    let operands = self.operands(words);
    match operands.is_empty() {
      true  => format!("{}", self.opcode),
      false => {
        format!(
          "{}({})",
          self.opcode,
          operands
            .iter()
            .map(Operand::to_string)
            .collect::<Vec<String>>()
            .join(", ")
        )
      }
    }
  }

}

impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let modes: Vec<String> =
      self.modes
          .iter()
          .take(self.opcode.arity())
          .map(|mode| format!("{:?}", mode))
          .collect();
    write!(f, "{}<{}>", self.opcode, modes.join(", "))
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use std::str::FromStr;

  #[test]
  fn opcode_from_code(){
    assert_eq!(Opcode::try_from(1u8).ok(), Some(Opcode::Add));
    assert_eq!(Opcode::try_from(9u8).ok(), Some(Opcode::AdjustBase));
    assert_eq!(Opcode::try_from(99u8).ok(), Some(Opcode::Halt));
    assert!(Opcode::try_from(0u8).is_err());
    assert!(Opcode::try_from(10u8).is_err());
    assert!(Opcode::try_from(98u8).is_err());
  }

  #[test]
  fn opcode_names(){
    assert_eq!(Opcode::JumpIfFalse.to_string(), "JumpIfFalse");
    assert_eq!(Opcode::from_str("Equals").ok(), Some(Opcode::Equals));
    let name: &'static str = Opcode::Halt.into();
    assert_eq!(name, "Halt");
  }

  #[test]
  fn strides(){
    assert_eq!(Opcode::Add.stride(), 4);
    assert_eq!(Opcode::Multiply.stride(), 4);
    assert_eq!(Opcode::Input.stride(), 2);
    assert_eq!(Opcode::Output.stride(), 2);
    assert_eq!(Opcode::JumpIfTrue.stride(), 3);
    assert_eq!(Opcode::JumpIfFalse.stride(), 3);
    assert_eq!(Opcode::LessThan.stride(), 4);
    assert_eq!(Opcode::Equals.stride(), 4);
    assert_eq!(Opcode::AdjustBase.stride(), 2);
  }

  #[test]
  fn destinations(){
    assert!(Opcode::Input.has_destination());
    assert!(Opcode::Equals.has_destination());
    assert!(!Opcode::Output.has_destination());
    assert!(!Opcode::JumpIfTrue.has_destination());
    assert!(!Opcode::AdjustBase.has_destination());
  }

  #[test]
  fn disassembly(){
    let instruction = Instruction {
      opcode : Opcode::Add,
      modes  : [Mode::Pointer, Mode::Immediate, Mode::Relative]
    };
    assert_eq!(instruction.disassemble(&[9, 10, 3]), "Add([9], #10, rb[3])");
    assert_eq!(format!("{}", instruction), "Add<Pointer, Immediate, Relative>");

    let halt = Instruction { opcode: Opcode::Halt, modes: [Mode::Pointer; 3] };
    assert_eq!(halt.disassemble(&[1, 2, 3]), "Halt");
  }
}
