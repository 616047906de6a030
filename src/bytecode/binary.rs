/*!
  Decoding of instruction words.

  An instruction word is a decimal number. Its low two digits are the command code, and each
  digit above those is the addressing mode of one operand: the hundreds digit belongs to the
  first operand, the thousands digit to the second, and the ten-thousands digit to the third.
  Missing digits are zero, which is `Mode::Pointer`.

  Splitting a word into digits never fails. Turning those digits into an `Instruction` fails
  when the command code has no handler, when the mode digit of an operand the instruction
  uses is not 0, 1, or 2, or when the word is negative. Digits above the instruction's arity
  are ignored. `Halt` takes no operands and is recognized only as the bare word `99`.
*/

use super::{Instruction, Mode, Opcode, MAX_OPERANDS};
use crate::error::Fault;
use crate::memory::{Address, Word};

/// The only word that terminates a program.
pub const HALT_WORD: Word = 99;

/// The raw pieces of an instruction word, before validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct DecodedWord {
  pub code  : Word,
  pub modes : [Word; MAX_OPERANDS],
}

/// Splits `word` into its command code and mode digits. Total on every input.
pub fn split_word(word: Word) -> DecodedWord {
  DecodedWord {
    code  : word % 100,
    modes : [
      (word / 100) % 10,
      (word / 1_000) % 10,
      (word / 10_000) % 10,
    ],
  }
}

/**
  Decodes the instruction word found at `pointer`. The pointer is only used to describe the
  fault if the word is not a valid instruction.
*/
pub fn try_decode_instruction(word: Word, pointer: Address) -> Result<Instruction, Fault> {
  let DecodedWord{ code, modes: digits } = split_word(word);

  let opcode =
    u8::try_from(code)
      .ok()
      .and_then(|code| Opcode::try_from(code).ok())
      .ok_or(Fault::UnknownOpcode { pointer, word })?;

  if opcode == Opcode::Halt && word != HALT_WORD {
    return Err(Fault::UnknownOpcode { pointer, word });
  }

  let mut modes = [Mode::Pointer; MAX_OPERANDS];
  for (mode, digit) in modes.iter_mut().zip(digits.iter()).take(opcode.arity()) {
    *mode =
      u8::try_from(*digit)
        .ok()
        .and_then(|digit| Mode::try_from(digit).ok())
        .ok_or(Fault::InvalidMode { pointer, word })?;
  }

  Ok(Instruction { opcode, modes })
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn split_plain(){
    assert_eq!(split_word(2), DecodedWord{ code: 2, modes: [0, 0, 0] });
    assert_eq!(split_word(99), DecodedWord{ code: 99, modes: [0, 0, 0] });
  }

  #[test]
  fn split_modes(){
    assert_eq!(split_word(1002), DecodedWord{ code: 2, modes: [0, 1, 0] });
    assert_eq!(split_word(21108), DecodedWord{ code: 8, modes: [1, 1, 2] });
    assert_eq!(split_word(204), DecodedWord{ code: 4, modes: [2, 0, 0] });
  }

  #[test]
  fn split_is_total(){
    // Negative words decode to negative digits; they are rejected later.
    assert_eq!(split_word(-1101), DecodedWord{ code: -1, modes: [-1, -1, 0] });
    split_word(Word::MIN);
    split_word(Word::MAX);
  }

  #[test]
  fn decode_instruction(){
    let instruction = try_decode_instruction(1002, 0).unwrap();
    assert_eq!(instruction.opcode, Opcode::Multiply);
    assert_eq!(instruction.modes, [Mode::Pointer, Mode::Immediate, Mode::Pointer]);

    let instruction = try_decode_instruction(109, 0).unwrap();
    assert_eq!(instruction.opcode, Opcode::AdjustBase);
    assert_eq!(instruction.modes[0], Mode::Immediate);
  }

  #[test]
  fn unknown_opcodes(){
    assert_eq!(
      try_decode_instruction(5000, 7),
      Err(Fault::UnknownOpcode{ pointer: 7, word: 5000 })
    );
    assert_eq!(
      try_decode_instruction(0, 0),
      Err(Fault::UnknownOpcode{ pointer: 0, word: 0 })
    );
    assert_eq!(
      try_decode_instruction(-1, 3),
      Err(Fault::UnknownOpcode{ pointer: 3, word: -1 })
    );
    assert_eq!(
      try_decode_instruction(-199, 3),
      Err(Fault::UnknownOpcode{ pointer: 3, word: -199 })
    );
  }

  #[test]
  fn unused_mode_digits_are_ignored(){
    let instruction = try_decode_instruction(3004, 0).unwrap();
    assert_eq!(instruction.opcode, Opcode::Output);
    assert_eq!(instruction.modes, [Mode::Pointer; 3]);

    let instruction = try_decode_instruction(90105, 0).unwrap();
    assert_eq!(instruction.opcode, Opcode::JumpIfTrue);
    assert_eq!(instruction.modes, [Mode::Immediate, Mode::Pointer, Mode::Pointer]);

    assert_eq!(
      try_decode_instruction(3104, 1),
      Ok(Instruction {
        opcode : Opcode::Output,
        modes  : [Mode::Immediate, Mode::Pointer, Mode::Pointer]
      })
    );
  }

  #[test]
  fn halt_is_exact(){
    assert_eq!(try_decode_instruction(99, 0).unwrap().opcode, Opcode::Halt);
    assert_eq!(
      try_decode_instruction(199, 2),
      Err(Fault::UnknownOpcode{ pointer: 2, word: 199 })
    );
  }

  #[test]
  fn invalid_modes(){
    assert_eq!(
      try_decode_instruction(301, 4),
      Err(Fault::InvalidMode{ pointer: 4, word: 301 })
    );
    assert_eq!(
      try_decode_instruction(90001, 0),
      Err(Fault::InvalidMode{ pointer: 0, word: 90001 })
    );
  }
}
