//! Long-lived worker bound to one analysis and one input/output queue pair.

use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use super::handoff_queue::HandoffQueue;
use super::job::Job;
use crate::analysis::{Analysis, analysis_for};
use crate::types::StageKind;

/// What a worker did before its input queue closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageReport {
  pub kind: StageKind,
  /// Jobs analysed and handed on (or finished, for the terminal stage).
  pub processed: u64,
  /// Jobs skipped because their handler had stopped waiting.
  pub skipped: u64,
  /// Jobs dropped because of a closed output queue or a failed invariant.
  pub discarded: u64,
}

impl StageReport {
  fn new(kind: StageKind) -> Self {
    Self {
      kind,
      processed: 0,
      skipped: 0,
      discarded: 0,
    }
  }
}

/// Pops jobs from `input`, runs the analysis, stores the result and forwards
/// the job to `output`. Without an output queue the worker is terminal and
/// completes the job instead.
pub struct StageWorker {
  kind: StageKind,
  analysis: Arc<dyn Analysis>,
  input: Arc<HandoffQueue<Job>>,
  output: Option<Arc<HandoffQueue<Job>>>,
}

impl StageWorker {
  pub fn new(
    kind: StageKind,
    input: Arc<HandoffQueue<Job>>,
    output: Option<Arc<HandoffQueue<Job>>>,
  ) -> Self {
    Self::with_analysis(analysis_for(kind), input, output)
  }

  /// Worker for a custom analysis; the stage slot is `analysis.kind()`.
  pub fn with_analysis(
    analysis: Arc<dyn Analysis>,
    input: Arc<HandoffQueue<Job>>,
    output: Option<Arc<HandoffQueue<Job>>>,
  ) -> Self {
    Self {
      kind: analysis.kind(),
      analysis,
      input,
      output,
    }
  }

  pub fn kind(&self) -> StageKind {
    self.kind
  }

  pub fn is_terminal(&self) -> bool {
    self.output.is_none()
  }

  /// Runs until the input queue closes.
  #[instrument(level = "debug", skip(self), fields(stage = %self.kind))]
  pub async fn run(self) -> StageReport {
    info!(queue = self.input.name(), "stage worker started");
    let mut report = StageReport::new(self.kind);
    while let Some(job) = self.input.pop().await {
      self.process(job, &mut report).await;
    }
    info!(
      processed = report.processed,
      skipped = report.skipped,
      discarded = report.discarded,
      "stage worker stopped"
    );
    report
  }

  async fn process(&self, mut job: Job, report: &mut StageReport) {
    let job_id = job.id();
    if job.is_cancelled() {
      debug!(job = %job_id, "handler gone, skipping job");
      report.skipped += 1;
      return;
    }

    let analysis = Arc::clone(&self.analysis);
    let graph = Arc::clone(job.graph());
    let cancellation = job.cancellation();
    let input = Arc::clone(&self.input);
    let stop = move || cancellation.is_cancelled() || input.is_closed();
    let text = match tokio::task::spawn_blocking(move || analysis.run_until(&graph, &stop)).await {
      Ok(Some(text)) => text,
      Ok(None) if job.is_cancelled() => {
        debug!(job = %job_id, "handler gone, analysis stopped");
        report.skipped += 1;
        return;
      }
      Ok(None) => {
        debug!(job = %job_id, "shutting down, analysis stopped");
        report.discarded += 1;
        return;
      }
      Err(e) => {
        error!(job = %job_id, error = %e, "analysis task failed");
        report.discarded += 1;
        return;
      }
    };
    debug!(job = %job_id, result = %text, "analysis finished");

    if let Err(e) = job.record(self.kind, text) {
      error!(job = %job_id, error = %e, "result slot invariant violated");
      report.discarded += 1;
      return;
    }

    match &self.output {
      Some(next) => {
        if next.push(job).is_err() {
          debug!(job = %job_id, queue = next.name(), "next queue closed, dropping job");
          report.discarded += 1;
          return;
        }
      }
      None => {
        if let Err(e) = job.finish() {
          error!(job = %job_id, error = %e, "cannot assemble reply");
          report.discarded += 1;
          return;
        }
      }
    }
    report.processed += 1;
  }
}
