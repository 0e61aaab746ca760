//! Unbounded FIFO hand-off queue between pipeline stages.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;

#[derive(Debug)]
struct QueueState<T> {
  items: VecDeque<T>,
  closed: bool,
}

/// Blocking FIFO queue, safe for any number of producers and consumers.
///
/// [HandoffQueue::pop] waits for an item and returns `None` once the queue is
/// closed. Items still queued at close time are handed back by
/// [HandoffQueue::close] and never popped.
#[derive(Debug)]
pub struct HandoffQueue<T> {
  name: String,
  state: Mutex<QueueState<T>>,
  available: Notify,
}

impl<T> HandoffQueue<T> {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      state: Mutex::new(QueueState {
        items: VecDeque::new(),
        closed: false,
      }),
      available: Notify::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
    // The lock is never held across user code, so a poisoned state is still consistent.
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Appends `item`. Returns it back if the queue is closed.
  pub fn push(&self, item: T) -> Result<(), T> {
    {
      let mut state = self.lock();
      if state.closed {
        return Err(item);
      }
      state.items.push_back(item);
    }
    self.available.notify_one();
    Ok(())
  }

  /// Waits for the oldest item. `None` means the queue was closed.
  pub async fn pop(&self) -> Option<T> {
    loop {
      // Register interest before inspecting the state so a close or push
      // between the check and the await is not missed.
      let notified = self.available.notified();
      tokio::pin!(notified);
      notified.as_mut().enable();
      {
        let mut state = self.lock();
        if state.closed {
          return None;
        }
        if let Some(item) = state.items.pop_front() {
          return Some(item);
        }
      }
      notified.await;
    }
  }

  /// Non-blocking pop.
  pub fn try_pop(&self) -> Option<T> {
    let mut state = self.lock();
    if state.closed {
      return None;
    }
    state.items.pop_front()
  }

  /// Closes the queue and wakes every waiting consumer. Returns the items
  /// that were still queued, in FIFO order. Idempotent.
  pub fn close(&self) -> Vec<T> {
    let pending: Vec<T> = {
      let mut state = self.lock();
      state.closed = true;
      state.items.drain(..).collect()
    };
    self.available.notify_waiters();
    pending
  }

  pub fn is_closed(&self) -> bool {
    self.lock().closed
  }

  pub fn len(&self) -> usize {
    self.lock().items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}
