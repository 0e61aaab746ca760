//! A job moving through the pipeline and the ticket its handler waits on.
//!
//! The [Job] itself is moved from queue to queue, so exactly one stage owns it
//! at a time and its result slots need no lock. Only the completion cell is
//! shared with the handler's [JobTicket].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;
use tracing::{instrument, trace};
use uuid::Uuid;

use crate::error::PipelineError;
use crate::protocol::format_report;
use crate::types::{Graph, StageKind};

/// How a job ended, as seen by its handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
  /// All four stages ran; the aggregated reply.
  Completed(String),
  /// The job was discarded before the terminal stage, e.g. by shutdown.
  Abandoned,
}

#[derive(Debug)]
enum CompletionState {
  Pending,
  Done { reply: String },
  Abandoned,
}

/// `done`/`reply` guarded by one lock, plus the single-waiter signal.
#[derive(Debug)]
struct Completion {
  state: Mutex<CompletionState>,
  signal: Notify,
  cancelled: AtomicBool,
}

impl Completion {
  fn new() -> Self {
    Self {
      state: Mutex::new(CompletionState::Pending),
      signal: Notify::new(),
      cancelled: AtomicBool::new(false),
    }
  }

  fn lock(&self) -> MutexGuard<'_, CompletionState> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Moves `Pending` to `next`. The waiter is signalled after the lock is
  /// released; it re-checks the state in a loop, so the order is safe.
  fn settle(&self, next: CompletionState) -> bool {
    {
      let mut state = self.lock();
      if !matches!(*state, CompletionState::Pending) {
        return false;
      }
      *state = next;
    }
    self.signal.notify_one();
    true
  }
}

/// One client request in flight.
#[derive(Debug)]
pub struct Job {
  id: Uuid,
  graph: Arc<Graph>,
  results: [Option<String>; 4],
  completion: Arc<Completion>,
}

/// The handler's side of a [Job]: waits for completion, and marks the job
/// cancelled when dropped before it finished.
#[derive(Debug)]
pub struct JobTicket {
  id: Uuid,
  completion: Arc<Completion>,
}

/// Cancellation flag of a [Job], readable after the job itself has moved on,
/// e.g. from inside a blocking analysis.
#[derive(Debug, Clone)]
pub struct JobCancellation {
  completion: Arc<Completion>,
}

impl JobCancellation {
  pub fn is_cancelled(&self) -> bool {
    self.completion.cancelled.load(Ordering::Acquire)
  }
}

impl Job {
  /// Creates a job for `graph` and the ticket its handler will wait on.
  pub fn new(graph: Graph) -> (Job, JobTicket) {
    let id = Uuid::new_v4();
    let completion = Arc::new(Completion::new());
    let ticket = JobTicket {
      id,
      completion: Arc::clone(&completion),
    };
    let job = Job {
      id,
      graph: Arc::new(graph),
      results: Default::default(),
      completion,
    };
    (job, ticket)
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn graph(&self) -> &Arc<Graph> {
    &self.graph
  }

  /// True once the handler has stopped waiting for this job.
  pub fn is_cancelled(&self) -> bool {
    self.completion.cancelled.load(Ordering::Acquire)
  }

  pub fn cancellation(&self) -> JobCancellation {
    JobCancellation {
      completion: Arc::clone(&self.completion),
    }
  }

  /// Stores a stage's result. Each slot accepts exactly one write.
  pub fn record(&mut self, kind: StageKind, text: String) -> Result<(), PipelineError> {
    let slot = &mut self.results[kind.index()];
    if slot.is_some() {
      return Err(PipelineError::SlotAlreadyWritten(kind));
    }
    *slot = Some(text);
    Ok(())
  }

  pub fn result(&self, kind: StageKind) -> Option<&str> {
    self.results[kind.index()].as_deref()
  }

  /// Builds the reply from all four slots, publishes it together with
  /// `done`, and wakes the waiting handler.
  #[instrument(level = "trace", skip(self), fields(job = %self.id))]
  pub fn finish(self) -> Result<(), PipelineError> {
    let mut lines = Vec::with_capacity(StageKind::ALL.len());
    for kind in StageKind::ALL {
      let text = self.result(kind).ok_or(PipelineError::MissingResult(kind))?;
      lines.push((kind, text));
    }
    let reply = format_report(lines);
    if !self.completion.settle(CompletionState::Done { reply }) {
      trace!(job = %self.id, "job already settled");
    }
    Ok(())
  }
}

impl Drop for Job {
  fn drop(&mut self) {
    // No-op after finish(); otherwise releases the handler.
    if self.completion.settle(CompletionState::Abandoned) {
      trace!(job = %self.id, "job abandoned");
    }
  }
}

impl JobTicket {
  pub fn id(&self) -> Uuid {
    self.id
  }

  /// True once the job has completed or been abandoned.
  pub fn is_settled(&self) -> bool {
    !matches!(*self.completion.lock(), CompletionState::Pending)
  }

  /// Waits until the job settles. The reply is copied out under the lock.
  pub async fn wait(&self) -> JobOutcome {
    loop {
      let notified = self.completion.signal.notified();
      {
        let state = self.completion.lock();
        match &*state {
          CompletionState::Done { reply } => return JobOutcome::Completed(reply.clone()),
          CompletionState::Abandoned => return JobOutcome::Abandoned,
          CompletionState::Pending => {}
        }
      }
      notified.await;
    }
  }
}

impl Drop for JobTicket {
  fn drop(&mut self) {
    self.completion.cancelled.store(true, Ordering::Release);
  }
}
