/*!
  The instruction set. A program is a sequence of signed words. Instruction words carry a
  command code in their low two decimal digits and one addressing mode digit per operand
  above those. Operands are the words that immediately follow the instruction word.

  Only the instruction word is decoded here. Its operands are resolved against memory by the
  machine, because resolution depends on the relative base.
*/

mod assembly;
mod binary;
mod instruction;

pub use assembly::{disassemble, format_program, parse_program};
pub use binary::{split_word, try_decode_instruction, DecodedWord, HALT_WORD};
pub use instruction::{Instruction, Mode, Opcode, Operand, MAX_OPERANDS};
