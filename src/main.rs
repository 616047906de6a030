//! Loads a program image from a file and runs it.
//!
//!     intcode [--disassemble] <program-file> [input ...]
//!
//! Inputs given on the command line are consumed first; after that, each input instruction
//! reads one integer per line from standard input. Every output is printed on its own line.

use std::collections::VecDeque;
use std::process::exit;

use tokio::io::{stdin, AsyncBufReadExt, BufReader, Lines, Stdin};

use intcode::bytecode::{disassemble, parse_program};
use intcode::{run_outcome, InputProvider, Outcome, OutputSink, Word};

/// Command line inputs, then standard input.
struct ArgsThenStdin {
  queued : VecDeque<Word>,
  lines  : Lines<BufReader<Stdin>>,
}

#[async_trait::async_trait]
impl InputProvider for ArgsThenStdin {
  async fn next_input(&mut self) -> Option<Word> {
    if let Some(value) = self.queued.pop_front() {
      return Some(value);
    }
    loop {
      let line = self.lines.next_line().await.ok()??;
      let line = line.trim();
      if line.is_empty() {
        continue;
      }
      match line.parse::<Word>() {
        Ok(value) => return Some(value),
        Err(_)    => eprintln!("Not an integer: `{}`", line),
      }
    }
  }
}

struct PrintSink;

#[async_trait::async_trait]
impl OutputSink for PrintSink {
  async fn accept(&mut self, value: Word) -> bool {
    println!("{}", value);
    true
  }
}

fn usage() -> ! {
  eprintln!("Usage: intcode [--disassemble] <program-file> [input ...]");
  exit(2);
}

#[tokio::main]
async fn main() {
  let mut args: VecDeque<String> = std::env::args().skip(1).collect();

  let listing = args.front().map(String::as_str) == Some("--disassemble");
  if listing {
    args.pop_front();
  }
  let path = match args.pop_front() {
    Some(path) => path,
    None       => usage()
  };

  let text = match std::fs::read_to_string(&path) {
    Ok(text) => text,
    Err(e)   => {
      eprintln!("Could not read {}: {}", path, e);
      exit(1);
    }
  };
  let program = match parse_program(&text) {
    Ok(program) => program,
    Err(e)      => {
      eprintln!("{}: {}", path, e);
      exit(1);
    }
  };

  if listing {
    for line in disassemble(&program) {
      println!("{}", line);
    }
    return;
  }

  let mut queued = VecDeque::new();
  for arg in args {
    match arg.parse::<Word>() {
      Ok(value) => queued.push_back(value),
      Err(_)    => {
        eprintln!("Not an integer input: `{}`", arg);
        usage();
      }
    }
  }

  let input = ArgsThenStdin {
    queued,
    lines: BufReader::new(stdin()).lines()
  };

  match run_outcome(&program, input, PrintSink).await {
    Outcome::Halted(value) => {
      println!("Result: {}", value);
    }
    Outcome::Faulted(fault) => {
      eprintln!("Program faulted: {}", fault);
      exit(1);
    }
  }
}
