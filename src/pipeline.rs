/*!
  Wiring several machines together. Each machine runs as its own tokio task with a private
  copy of the program. Machine `i`'s output feeds machine `i + 1`'s input, and in feedback
  mode the last machine's output also loops back to the first machine.

  Every machine is first given its phase setting. The first machine then receives the seed
  value. The signal of the chain is the last value the final machine emitted.
*/

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinError;

use crate::error::Fault;
use crate::host::{run_outcome, OutputSink};
use crate::machine::Outcome;
use crate::memory::Word;

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
  #[error("a pipeline needs at least one phase setting")]
  NoPhases,

  #[error("machine {machine} faulted: {fault}")]
  Fault { machine: usize, fault: Fault },

  #[error("the last machine produced no output")]
  NoOutput,

  #[error("machine task failed: {0}")]
  Task(#[from] JoinError),
}

/// Records the last value it sees and forwards every value to `next`, if there is a `next`.
/// Values the next machine will never read are dropped rather than refused.
struct Tap {
  next : Option<UnboundedSender<Word>>,
  last : Option<Word>,
}

#[async_trait::async_trait]
impl OutputSink for Tap {
  async fn accept(&mut self, value: Word) -> bool {
    self.last = Some(value);
    if let Some(next) = &self.next {
      // A closed receiver means the first machine already halted.
      let _ = next.send(value);
    }
    true
  }
}

fn check(machine: usize, outcome: Outcome) -> Result<(), PipelineError> {
  match outcome {
    Outcome::Faulted(fault) => Err(PipelineError::Fault { machine, fault }),
    Outcome::Halted(_)      => Ok(()),
  }
}

/// Runs one machine per entry of `phases`, chained output to input, and returns the signal.
pub async fn run_chain(
  program  : &[Word],
  phases   : &[Word],
  seed     : Word,
  feedback : bool
) -> Result<Word, PipelineError> {
  if phases.is_empty() {
    return Err(PipelineError::NoPhases);
  }

  let (senders, mut receivers): (Vec<UnboundedSender<Word>>, Vec<UnboundedReceiver<Word>>) =
    phases.iter().map(|_| unbounded_channel()).unzip();

  for (sender, phase) in senders.iter().zip(phases.iter()) {
    // Receivers are still held, so these sends cannot fail.
    let _ = sender.send(*phase);
  }
  let _ = senders[0].send(seed);

  let last = phases.len() - 1;
  let tap  = Tap {
    next : if feedback { Some(senders[0].clone()) } else { None },
    last : None,
  };

  // Machines `0..last` each write into the next machine's input.
  let mut tasks = vec![];
  for (i, input) in receivers.drain(..last).enumerate() {
    let program = program.to_vec();
    let output  = senders[i + 1].clone();
    tasks.push(tokio::spawn(async move { run_outcome(&program, input, output).await }));
  }

  let final_input = receivers.pop().ok_or(PipelineError::NoPhases)?;
  let program     = program.to_vec();
  let final_task  = tokio::spawn(async move {
    let mut tap = tap;
    let outcome = run_outcome(&program, final_input, &mut tap).await;
    (outcome, tap.last)
  });

  // Only the machines hold senders from here on, so a closed channel means a halted peer.
  drop(senders);

  for (i, task) in tasks.into_iter().enumerate() {
    check(i, task.await?)?;
  }
  let (outcome, signal) = final_task.await?;
  check(last, outcome)?;

  signal.ok_or(PipelineError::NoOutput)
}

/// All orderings of `items`.
fn permutations(items: &[Word]) -> Vec<Vec<Word>> {
  if items.len() <= 1 {
    return vec![items.to_vec()];
  }

  let mut result = vec![];
  for i in 0..items.len() {
    let mut rest = items.to_vec();
    let first    = rest.remove(i);
    for mut tail in permutations(&rest) {
      tail.insert(0, first);
      result.push(tail);
    }
  }
  result
}

/**
  Tries every ordering of `phases` and returns the ordering that produces the largest signal,
  together with that signal. Chains are run with a seed of zero.
*/
pub async fn best_phase_order(
  program  : &[Word],
  phases   : &[Word],
  feedback : bool
) -> Result<(Vec<Word>, Word), PipelineError> {
  let mut best: Option<(Vec<Word>, Word)> = None;

  for order in permutations(phases) {
    let signal = run_chain(program, &order, 0, feedback).await?;
    match &best {
      Some((_, best_signal)) if *best_signal >= signal => {}
      _ => best = Some((order, signal)),
    }
  }

  best.ok_or(PipelineError::NoPhases)
}
