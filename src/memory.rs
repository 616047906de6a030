//! Word memory for a single machine. Addresses are signed; every address can be read and
//! written, and an address that was never written reads as zero.

use std::fmt::{Display, Formatter};

use crate::error::Fault;

/// A single memory word.
pub type Word = i64;
/// Memory addresses are words, so that any word can be used as an address.
pub type Address = Word;

/// Default upper bound on the number of words a machine may hold on either side of zero.
pub const DEFAULT_MEMORY_LIMIT: usize = 1 << 24;

/**
  Growable memory. Non-negative addresses live in `cells`, negative addresses in `below`
  (address `-1` is `below[0]`). Reads past the end of either vector yield zero without
  allocating. Writes past the end grow the vector, zero filling the gap.
*/
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Memory {
  cells : Vec<Word>,
  below : Vec<Word>,
  limit : usize,
}

impl Memory {

  /// Copies `program` into a fresh memory.
  pub fn new(program: &[Word]) -> Memory {
    Memory::with_limit(program, DEFAULT_MEMORY_LIMIT)
  }

  pub fn with_limit(program: &[Word], limit: usize) -> Memory {
    Memory {
      cells : program.to_vec(),
      below : vec![],
      limit : limit.max(program.len()),
    }
  }

  pub fn read(&self, address: Address) -> Word {
    let (store, idx) = self.locate(address);
    store.get(idx).copied().unwrap_or(0)
  }

  /**
    Sets the value at the given address, dynamically growing the relevant vector if the
    address is larger than the max index of the vector.
  */
  pub fn write(&mut self, address: Address, value: Word) -> Result<(), Fault> {
    let limit = self.limit;
    let (store, idx) = match address {
      a if a >= 0 => (&mut self.cells, a as u64),
      a           => (&mut self.below, (-(a + 1)) as u64),
    };

    if idx >= limit as u64 {
      return Err(Fault::MemoryLimit { address, limit });
    }
    let idx = idx as usize;
    if idx >= store.len() {
      store.resize(idx + 1, 0);
    }
    store[idx] = value;
    Ok(())
  }

  /// Number of words stored at non-negative addresses.
  pub fn len(&self) -> usize {
    self.cells.len()
  }

  pub fn is_empty(&self) -> bool {
    self.cells.is_empty()
  }

  /// The words stored at non-negative addresses, starting at address zero.
  pub fn as_slice(&self) -> &[Word] {
    &self.cells
  }

  fn locate(&self, address: Address) -> (&Vec<Word>, usize) {
    match address {
      a if a >= 0 => (&self.cells, usize::try_from(a).unwrap_or(usize::MAX)),
      // `-(a + 1)` cannot overflow, even for `Word::MIN`.
      a           => (&self.below, usize::try_from(-(a + 1)).unwrap_or(usize::MAX)),
    }
  }

}

impl Display for Memory {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "{}",
      self.cells
          .iter()
          .map(Word::to_string)
          .collect::<Vec<String>>()
          .join(",")
    )
  }
}
