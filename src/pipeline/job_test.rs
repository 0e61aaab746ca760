//! Tests for `Job` and `JobTicket`.

use std::time::Duration;

use tokio_test::{assert_pending, assert_ready_eq, task};

use super::job::{Job, JobOutcome};
use crate::error::PipelineError;
use crate::types::{Graph, StageKind};

fn filled_job() -> (Job, super::job::JobTicket) {
  let (mut job, ticket) = Job::new(Graph::new(2, false));
  for kind in StageKind::ALL {
    job.record(kind, format!("{}-result", kind)).unwrap();
  }
  (job, ticket)
}

#[test]
fn slots_are_write_once() {
  let (mut job, _ticket) = Job::new(Graph::new(1, false));
  assert_eq!(job.result(StageKind::Mst), None);
  job.record(StageKind::Mst, "first".into()).unwrap();
  assert_eq!(
    job.record(StageKind::Mst, "second".into()),
    Err(PipelineError::SlotAlreadyWritten(StageKind::Mst))
  );
  assert_eq!(job.result(StageKind::Mst), Some("first"));
}

#[test]
fn ticket_and_job_share_id() {
  let (job, ticket) = Job::new(Graph::new(1, false));
  assert_eq!(job.id(), ticket.id());
  assert_eq!(job.graph().vertex_count(), 1);
}

#[test]
fn finish_requires_every_slot() {
  let (mut job, ticket) = Job::new(Graph::new(1, false));
  job.record(StageKind::Mst, "m".into()).unwrap();
  assert_eq!(
    job.finish(),
    Err(PipelineError::MissingResult(StageKind::MaxFlow))
  );
  // the failed job was dropped, which releases the handler
  let mut wait = task::spawn(ticket.wait());
  assert_ready_eq!(wait.poll(), JobOutcome::Abandoned);
}

#[test]
fn waiter_sees_full_reply_after_finish() {
  let (job, ticket) = filled_job();
  {
    let mut wait = task::spawn(ticket.wait());
    assert_pending!(wait.poll());
    assert!(!ticket.is_settled());
    job.finish().unwrap();
    assert!(wait.is_woken());
    assert_ready_eq!(
      wait.poll(),
      JobOutcome::Completed(
        "mst: mst-result\nmaxflow: maxflow-result\nscc: scc-result\nclique: clique-result\n"
          .to_string()
      )
    );
  }
  assert!(ticket.is_settled());
}

#[test]
fn finish_before_wait_is_not_lost() {
  let (job, ticket) = filled_job();
  job.finish().unwrap();
  let mut wait = task::spawn(ticket.wait());
  assert!(matches!(
    wait.poll(),
    std::task::Poll::Ready(JobOutcome::Completed(_))
  ));
}

#[test]
fn dropping_unfinished_job_abandons_it() {
  let (job, ticket) = Job::new(Graph::new(1, false));
  let mut wait = task::spawn(ticket.wait());
  assert_pending!(wait.poll());
  drop(job);
  assert!(wait.is_woken());
  assert_ready_eq!(wait.poll(), JobOutcome::Abandoned);
}

#[test]
fn dropping_ticket_cancels_job() {
  let (job, ticket) = Job::new(Graph::new(1, false));
  assert!(!job.is_cancelled());
  let cancellation = job.cancellation();
  drop(ticket);
  assert!(job.is_cancelled());
  assert!(cancellation.is_cancelled());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn finish_from_another_thread() {
  let (job, ticket) = filled_job();
  let finisher = tokio::spawn(async move {
    tokio::time::sleep(Duration::from_millis(10)).await;
    job.finish()
  });
  let outcome = tokio::time::timeout(Duration::from_secs(5), ticket.wait())
    .await
    .unwrap();
  assert!(matches!(outcome, JobOutcome::Completed(ref r) if r.lines().count() == 4));
  finisher.await.unwrap().unwrap();
}
