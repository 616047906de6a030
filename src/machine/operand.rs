/*!
  Operand resolution. Every function here is a pure query of memory.

  A value operand is dereferenced in `Pointer` mode, taken literally in `Immediate` mode, and
  dereferenced after adding the relative base in `Relative` mode. A destination operand is
  never dereferenced: it is the literal address in `Pointer` and `Immediate` mode, and the
  literal address plus the relative base in `Relative` mode.
*/

use crate::bytecode::{Instruction, Mode, MAX_OPERANDS};
use crate::memory::{Address, Memory, Word};

/// The raw operand word at `position` (zero based) of the instruction at `pointer`.
pub fn raw_operand(memory: &Memory, pointer: Address, position: usize) -> Word {
  memory.read(pointer.wrapping_add(1 + position as Word))
}

/// The address a destination operand writes to.
pub fn destination_address(
  memory        : &Memory,
  pointer       : Address,
  relative_base : Word,
  mode          : Mode,
  position      : usize
) -> Address {
  let raw = raw_operand(memory, pointer, position);
  match mode.is_relative() {
    true  => raw.wrapping_add(relative_base),
    false => raw
  }
}

/// The value a read operand denotes.
pub fn operand_value(
  memory        : &Memory,
  pointer       : Address,
  relative_base : Word,
  mode          : Mode,
  position      : usize
) -> Word {
  let raw = raw_operand(memory, pointer, position);
  match mode {
    Mode::Pointer   => memory.read(raw),
    Mode::Immediate => raw,
    Mode::Relative  => memory.read(raw.wrapping_add(relative_base)),
  }
}

/**
  Resolves every operand of `instruction`. Value operands resolve to their value and a
  destination operand resolves to its address. Positions past the instruction's arity are
  zero.
*/
pub fn resolve_operands(
  memory        : &Memory,
  pointer       : Address,
  relative_base : Word,
  instruction   : &Instruction
) -> [Word; MAX_OPERANDS] {
  let arity        = instruction.opcode.arity();
  let mut resolved = [0; MAX_OPERANDS];

  for (position, mode) in instruction.modes.iter().enumerate().take(arity) {
    let is_destination = instruction.opcode.has_destination() && position + 1 == arity;
    resolved[position] = match is_destination {
      true  => destination_address(memory, pointer, relative_base, *mode, position),
      false => operand_value(memory, pointer, relative_base, *mode, position),
    };
  }

  resolved
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::bytecode::Opcode;

  fn add(modes: [Mode; 3]) -> Instruction {
    Instruction{ opcode: Opcode::Add, modes }
  }

  #[test]
  fn pointer_mode_dereferences(){
    let memory = Memory::new(&[1, 4, 5, 6, 40, 50]);
    assert_eq!(operand_value(&memory, 0, 0, Mode::Pointer, 0), 40);
    assert_eq!(operand_value(&memory, 0, 0, Mode::Pointer, 1), 50);
    // Address 6 was never written.
    assert_eq!(operand_value(&memory, 0, 0, Mode::Pointer, 2), 0);
  }

  #[test]
  fn immediate_mode_is_literal(){
    let memory = Memory::new(&[1101, 4, -5, 6]);
    assert_eq!(operand_value(&memory, 0, 0, Mode::Immediate, 0), 4);
    assert_eq!(operand_value(&memory, 0, 0, Mode::Immediate, 1), -5);
    // Past the end of the program the operand word itself is zero.
    assert_eq!(operand_value(&memory, 10, 0, Mode::Immediate, 0), 0);
  }

  #[test]
  fn relative_mode_matches_pointer_mode(){
    let memory = Memory::new(&[2201, 1, 2, 0, 7, 8, 9]);
    for base in -1..3 {
      for position in 0..2 {
        let offset = raw_operand(&memory, 0, position);
        assert_eq!(
          operand_value(&memory, 0, base, Mode::Relative, position),
          memory.read(base + offset)
        );
      }
    }
  }

  #[test]
  fn destinations_are_never_dereferenced(){
    let memory = Memory::new(&[1, 0, 0, 3]);
    assert_eq!(destination_address(&memory, 0, 100, Mode::Pointer, 2), 3);
    assert_eq!(destination_address(&memory, 0, 100, Mode::Immediate, 2), 3);
    assert_eq!(destination_address(&memory, 0, 100, Mode::Relative, 2), 103);
    assert_eq!(destination_address(&memory, 0, -10, Mode::Relative, 2), -7);
  }

  #[test]
  fn resolve_add(){
    let memory = Memory::new(&[1, 4, 5, 6, 40, 50]);
    let resolved = resolve_operands(&memory, 0, 0, &add([Mode::Pointer; 3]));
    assert_eq!(resolved, [40, 50, 6]);

    let memory = Memory::new(&[21101, 4, 5, 6]);
    let resolved = resolve_operands(
      &memory, 0, 10, &add([Mode::Immediate, Mode::Immediate, Mode::Relative])
    );
    assert_eq!(resolved, [4, 5, 16]);
  }

  #[test]
  fn resolve_output_reads_value(){
    let memory = Memory::new(&[4, 2, 77]);
    let output = Instruction{ opcode: Opcode::Output, modes: [Mode::Pointer; 3] };
    assert_eq!(resolve_operands(&memory, 0, 0, &output), [77, 0, 0]);
  }

  #[test]
  fn resolve_input_yields_address(){
    let memory = Memory::new(&[203, 2, 77]);
    let input = Instruction {
      opcode : Opcode::Input,
      modes  : [Mode::Relative, Mode::Pointer, Mode::Pointer]
    };
    assert_eq!(resolve_operands(&memory, 0, 5, &input), [7, 0, 0]);
  }
}
