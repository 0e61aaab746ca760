//! The four pipeline stages, in pipeline order.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// One of the four analyses. Declaration order is pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StageKind {
  Mst,
  MaxFlow,
  Scc,
  Clique,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown stage: {0}")]
pub struct UnknownStage(pub String);

impl StageKind {
  /// All stages in pipeline order.
  pub const ALL: [StageKind; 4] = [
    StageKind::Mst,
    StageKind::MaxFlow,
    StageKind::Scc,
    StageKind::Clique,
  ];

  /// Label used as the line prefix in the aggregated reply.
  pub fn label(self) -> &'static str {
    match self {
      StageKind::Mst => "mst",
      StageKind::MaxFlow => "maxflow",
      StageKind::Scc => "scc",
      StageKind::Clique => "clique",
    }
  }

  /// Position in the pipeline, starting at 0.
  pub fn index(self) -> usize {
    self as usize
  }

  /// The stage that consumes this stage's output, `None` for the terminal stage.
  pub fn next(self) -> Option<StageKind> {
    Self::ALL.get(self.index() + 1).copied()
  }

  pub fn is_terminal(self) -> bool {
    self.next().is_none()
  }
}

impl fmt::Display for StageKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

impl FromStr for StageKind {
  type Err = UnknownStage;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|k| k.label() == s.trim())
      .ok_or_else(|| UnknownStage(s.to_string()))
  }
}
