/*!
  Textual forms of a program. A program image is written as a comma separated list of signed
  integers, possibly spread over several lines and possibly with a trailing comma. The
  disassembler renders an image as one instruction per line, which is how tracing shows
  the machine's progress.
*/

use nom::{
  character::complete::{
    char as one_char,
    i64 as word_p,
    multispace0
  },
  combinator::{all_consuming, opt},
  multi::separated_list1,
  sequence::{delimited, preceded, terminated},
  Finish,
  IResult
};

use super::{try_decode_instruction, Opcode};
use crate::error::ParseError;
use crate::memory::{Address, Word};

fn program_p(text: &str) -> IResult<&str, Vec<Word>> {
  let separator_p = delimited(multispace0, one_char(','), multispace0);

  all_consuming(
    delimited(
      multispace0,
      terminated(
        separated_list1(separator_p, word_p),
        opt(preceded(multispace0, one_char(',')))
      ),
      multispace0
    )
  )(text)
}

/// Parses program text into a memory image.
pub fn parse_program(text: &str) -> Result<Vec<Word>, ParseError> {
  if text.trim().is_empty() {
    return Err(ParseError::Empty);
  }

  match program_p(text).finish() {
    Ok((_rest, words)) => Ok(words),
    Err(e) => {
      let offset   = text.len() - e.input.len();
      let consumed = &text[..offset];
      let line     = consumed.matches('\n').count() + 1;
      let column   = offset - consumed.rfind('\n').map_or(0, |i| i + 1) + 1;
      Err(ParseError::Unexpected {
        line,
        column,
        fragment: e.input.chars().take(16).collect()
      })
    }
  }
}

/// Renders a memory image in the form `parse_program` reads.
pub fn format_program(program: &[Word]) -> String {
  program
    .iter()
    .map(Word::to_string)
    .collect::<Vec<String>>()
    .join(",")
}

/**
  Produces one line per instruction, walking the image linearly from address zero. Words that
  do not decode as instructions are listed as data. This is a static listing; it cannot know
  which words a running program actually treats as code.
*/
pub fn disassemble(program: &[Word]) -> Vec<String> {
  let mut lines           = vec![];
  let mut pointer: usize  = 0;

  while pointer < program.len() {
    let word = program[pointer];

    match try_decode_instruction(word, pointer as Address) {

      Ok(instruction) => {
        let end = (pointer + 1 + instruction.opcode.arity()).min(program.len());
        lines.push(
          format!("{:>5}: {}", pointer, instruction.disassemble(&program[pointer + 1..end]))
        );
        pointer += match instruction.opcode {
          Opcode::Halt => 1,
          opcode       => opcode.stride() as usize
        };
      }

      Err(_) => {
        lines.push(format!("{:>5}: Data({})", pointer, word));
        pointer += 1;
      }

    }
  }

  lines
}
