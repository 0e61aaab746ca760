//! The staged analysis pipeline and its shutdown coordinator.
//!
//! ```text
//! submit → [mst queue] → MST → [maxflow queue] → MaxFlow → [scc queue] → SCC
//!        → [clique queue] → Clique (terminal) → ticket wakes the handler
//! ```
//!
//! A [Pipeline] owns the four queues, the worker handles and the shutdown
//! flag. It is created once and shared by `Arc` with every connection handler.

mod handoff_queue;
mod job;
#[cfg(test)]
mod job_test;
mod stage_worker;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

use crate::analysis::{Analysis, analysis_for};
use crate::error::PipelineError;
use crate::types::{Graph, StageKind};

pub use handoff_queue::HandoffQueue;
pub use job::{Job, JobCancellation, JobOutcome, JobTicket};
pub use stage_worker::{StageReport, StageWorker};

/// Handles for the spawned stage workers.
type WorkerHandles = Vec<JoinHandle<StageReport>>;

pub struct Pipeline {
  /// `queues[k.index()]` is the input queue of stage `k`.
  queues: Vec<Arc<HandoffQueue<Job>>>,
  shutting_down: AtomicBool,
  /// Flips to `true` once shutdown starts; the accept loop watches it.
  stop_tx: watch::Sender<bool>,
  workers: Mutex<WorkerHandles>,
}

impl Pipeline {
  /// Creates the four queues and spawns one worker per stage.
  ///
  /// Must be called from within a tokio runtime.
  pub fn start() -> Arc<Self> {
    Self::start_with(StageKind::ALL.map(analysis_for))
  }

  /// Like [Pipeline::start], with one analysis per stage in pipeline order.
  /// Each analysis runs in the slot of its [Analysis::kind].
  #[instrument(level = "debug", skip(analyses))]
  pub fn start_with(analyses: [Arc<dyn Analysis>; 4]) -> Arc<Self> {
    let queues: Vec<Arc<HandoffQueue<Job>>> = StageKind::ALL
      .iter()
      .map(|k| Arc::new(HandoffQueue::new(format!("{}-queue", k.label()))))
      .collect();

    let workers: WorkerHandles = analyses
      .into_iter()
      .map(|analysis| {
        let kind = analysis.kind();
        let input = Arc::clone(&queues[kind.index()]);
        let output = kind.next().map(|next| Arc::clone(&queues[next.index()]));
        tokio::spawn(StageWorker::with_analysis(analysis, input, output).run())
      })
      .collect();

    let (stop_tx, _) = watch::channel(false);
    info!(stages = workers.len(), "pipeline started");
    Arc::new(Self {
      queues,
      shutting_down: AtomicBool::new(false),
      stop_tx,
      workers: Mutex::new(workers),
    })
  }

  /// Wraps `graph` in a job and enqueues it on the first stage.
  pub fn submit(&self, graph: Graph) -> Result<JobTicket, PipelineError> {
    if self.is_shutting_down() {
      return Err(PipelineError::ShuttingDown);
    }
    let (job, ticket) = Job::new(graph);
    let first = &self.queues[StageKind::ALL[0].index()];
    if first.push(job).is_err() {
      return Err(PipelineError::ShuttingDown);
    }
    debug!(job = %ticket.id(), "job submitted");
    Ok(ticket)
  }

  pub fn is_shutting_down(&self) -> bool {
    self.shutting_down.load(Ordering::Acquire)
  }

  /// Receiver that observes `true` once shutdown has begun.
  pub fn stop_signal(&self) -> watch::Receiver<bool> {
    self.stop_tx.subscribe()
  }

  /// Number of jobs waiting in front of `kind`.
  pub fn queued(&self, kind: StageKind) -> usize {
    self.queues[kind.index()].len()
  }

  /// Stops the pipeline: sets the flag, closes every queue (waking idle
  /// workers and abandoning queued jobs), tells the accept loop to stop, then
  /// waits for all workers to exit.
  ///
  /// Returns one report per worker in pipeline order. A second call returns
  /// an empty list.
  #[instrument(level = "debug", skip(self))]
  pub async fn shutdown(&self) -> Vec<StageReport> {
    if !self.shutting_down.swap(true, Ordering::AcqRel) {
      info!("pipeline shutting down");
    }

    for queue in &self.queues {
      let abandoned = queue.close();
      if !abandoned.is_empty() {
        info!(queue = queue.name(), jobs = abandoned.len(), "abandoning queued jobs");
      }
    }
    self.stop_tx.send_replace(true);

    let handles = std::mem::take(&mut *self.workers.lock().await);
    let mut reports = Vec::with_capacity(handles.len());
    for result in futures::future::join_all(handles).await {
      match result {
        Ok(report) => reports.push(report),
        Err(e) => error!(error = %e, "stage worker panicked"),
      }
    }
    if !reports.is_empty() {
      info!("pipeline stopped");
    }
    reports
  }
}

impl Drop for Pipeline {
  fn drop(&mut self) {
    // Lets detached workers exit if shutdown() was never awaited.
    for queue in &self.queues {
      queue.close();
    }
  }
}
