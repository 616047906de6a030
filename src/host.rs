//! Asynchronous host capabilities and the driver that runs a machine against them.
//!
//! A machine never blocks its thread. When it suspends on an input or output instruction the
//! driver awaits the host's provider or sink, then resumes the machine. Several machines can
//! run as separate tasks; each owns its memory, so nothing is shared between them.

use std::collections::VecDeque;

use tokio::sync::mpsc::{Receiver, Sender, UnboundedReceiver, UnboundedSender};

use crate::error::Fault;
use crate::machine::{Event, Machine, MachineConfig, Outcome};
use crate::memory::Word;

/// Supplies values to input instructions, in the order they execute.
#[async_trait::async_trait]
pub trait InputProvider: Send {
  /// The next input value, or `None` if there will never be another one.
  async fn next_input(&mut self) -> Option<Word>;
}

/// Accepts values from output instructions, in emission order.
#[async_trait::async_trait]
pub trait OutputSink: Send {
  /// Returns `false` if the sink can no longer accept values.
  async fn accept(&mut self, value: Word) -> bool;
}

// region Provider and sink implementations

#[async_trait::async_trait]
impl InputProvider for Receiver<Word> {
  async fn next_input(&mut self) -> Option<Word> {
    self.recv().await
  }
}

#[async_trait::async_trait]
impl InputProvider for UnboundedReceiver<Word> {
  async fn next_input(&mut self) -> Option<Word> {
    self.recv().await
  }
}

#[async_trait::async_trait]
impl InputProvider for VecDeque<Word> {
  async fn next_input(&mut self) -> Option<Word> {
    self.pop_front()
  }
}

#[async_trait::async_trait]
impl<T: InputProvider + ?Sized> InputProvider for &mut T {
  async fn next_input(&mut self) -> Option<Word> {
    (**self).next_input().await
  }
}

#[async_trait::async_trait]
impl OutputSink for Sender<Word> {
  async fn accept(&mut self, value: Word) -> bool {
    self.send(value).await.is_ok()
  }
}

#[async_trait::async_trait]
impl OutputSink for UnboundedSender<Word> {
  async fn accept(&mut self, value: Word) -> bool {
    self.send(value).is_ok()
  }
}

#[async_trait::async_trait]
impl OutputSink for Vec<Word> {
  async fn accept(&mut self, value: Word) -> bool {
    self.push(value);
    true
  }
}

#[async_trait::async_trait]
impl<T: OutputSink + ?Sized> OutputSink for &mut T {
  async fn accept(&mut self, value: Word) -> bool {
    (**self).accept(value).await
  }
}

// endregion

/**
  Drives `machine` until it halts, awaiting `input` whenever an input instruction finds
  nothing queued and awaiting `output` after every output instruction.
*/
pub async fn drive<I, O>(machine: &mut Machine, mut input: I, mut output: O) -> Outcome
  where I: InputProvider,
        O: OutputSink
{
  loop {
    match machine.resume() {

      Event::NeedInput => {
        match input.next_input().await {
          Some(value) => machine.provide_input(value),
          None        => return machine.abort(Fault::InputClosed),
        }
      }

      Event::Output(value) => {
        if !output.accept(value).await {
          return machine.abort(Fault::OutputClosed);
        }
      }

      Event::Halted(outcome) => return outcome,

    }
  }
}

/// Runs a copy of `program` to completion and reports how it ended.
pub async fn run_outcome<I, O>(program: &[Word], input: I, output: O) -> Outcome
  where I: InputProvider,
        O: OutputSink
{
  run_with_config(program, MachineConfig::default(), input, output).await
}

pub async fn run_with_config<I, O>(
  program : &[Word],
  config  : MachineConfig,
  input   : I,
  output  : O
) -> Outcome
  where I: InputProvider,
        O: OutputSink
{
  let mut machine = Machine::with_config(program, config);
  drive(&mut machine, input, output).await
}

/**
  Runs a copy of `program` to completion. The result is the word at address zero when the
  program halts, or `SENTINEL` if the run faults.
*/
pub async fn run<I, O>(program: &[Word], input: I, output: O) -> Word
  where I: InputProvider,
        O: OutputSink
{
  run_outcome(program, input, output).await.result()
}


#[cfg(test)]
mod tests {
  use super::*;
  use tokio::sync::mpsc::{channel, unbounded_channel};
  use crate::error::SENTINEL;

  const QUINE: [Word; 16] = [
    109, 1, 204, -1, 1001, 100, 1, 100, 1008, 100, 16, 101, 1006, 101, 0, 99
  ];

  #[tokio::test]
  async fn run_without_io(){
    let result = run(
      &[1, 9, 10, 3, 2, 3, 11, 0, 99, 30, 40, 50],
      VecDeque::new(),
      Vec::new()
    ).await;
    assert_eq!(result, 3500);
  }

  #[tokio::test]
  async fn quine_emits_itself(){
    let mut outputs = vec![];
    let outcome = run_outcome(&QUINE, VecDeque::new(), &mut outputs).await;
    assert_eq!(outcome, Outcome::Halted(109));
    assert_eq!(outputs, QUINE.to_vec());
  }

  #[tokio::test]
  async fn echo_in_order(){
    let program   = [3, 20, 3, 21, 3, 22, 4, 20, 4, 21, 4, 22, 99];
    let mut input = VecDeque::from(vec![9, 8, 7]);
    let mut out   = vec![];
    run(&program, &mut input, &mut out).await;
    assert_eq!(out, vec![9, 8, 7]);
    assert!(input.is_empty());
  }

  #[tokio::test]
  async fn unknown_opcode_is_sentinel(){
    let result = run(&[1101, 1, 1, 0, 5000], VecDeque::new(), Vec::new()).await;
    assert_eq!(result, SENTINEL);
  }

  #[tokio::test]
  async fn closed_input_faults(){
    let outcome = run_outcome(&[3, 0, 99], VecDeque::new(), Vec::new()).await;
    assert_eq!(outcome, Outcome::Faulted(Fault::InputClosed));
  }

  #[tokio::test]
  async fn closed_output_faults(){
    let (tx, rx) = channel::<Word>(1);
    drop(rx);
    let outcome = run_outcome(&[104, 1, 99], VecDeque::new(), tx).await;
    assert_eq!(outcome, Outcome::Faulted(Fault::OutputClosed));
  }

  #[tokio::test]
  async fn input_arrives_later(){
    // Double the input.
    let program = [3, 9, 1002, 9, 2, 9, 4, 9, 99, 0];
    let (in_tx, in_rx)   = channel::<Word>(1);
    let (out_tx, mut out_rx) = unbounded_channel::<Word>();

    let task = tokio::spawn(async move { run(&program, in_rx, out_tx).await });

    in_tx.send(21).await.unwrap();
    assert_eq!(out_rx.recv().await, Some(42));
    assert_eq!(task.await.unwrap(), 3);
  }

  #[tokio::test]
  async fn independent_machines(){
    let program = [3, 9, 1002, 9, 2, 9, 4, 9, 99, 0];
    let tasks: Vec<_> =
      (1..=4)
        .map(|i| {
          tokio::spawn(async move {
            let mut out = vec![];
            run(&program, VecDeque::from(vec![i]), &mut out).await;
            out
          })
        })
        .collect();

    for (i, task) in tasks.into_iter().enumerate() {
      assert_eq!(task.await.unwrap(), vec![2 * (i as Word + 1)]);
    }
  }
}
