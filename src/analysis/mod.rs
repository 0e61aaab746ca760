//! Graph analyses run by the pipeline stages.
//!
//! Each analysis is a pure function from a [Graph] to one line of text. An
//! inconsistency (for example a disconnected graph for MST) is reported as
//! text, never as an error.

mod clique;
#[cfg(test)]
mod factory_test;
mod max_flow;
mod mst;
#[cfg(test)]
mod mst_test;
mod scc;
#[cfg(test)]
mod scc_test;

use std::sync::Arc;

use crate::types::{Graph, StageKind};

pub use clique::CliqueCount;
pub use max_flow::MaxFlow;
pub use mst::MinimumSpanningTree;
pub use scc::StronglyConnectedComponents;

/// A stateless graph analysis.
pub trait Analysis: Send + Sync {
  /// The stage this analysis implements.
  fn kind(&self) -> StageKind;

  /// Runs the analysis and renders its result as a single line.
  fn run(&self, graph: &Graph) -> String;

  /// Like [Analysis::run], but gives up with `None` once `stop` returns true.
  /// Long-running analyses poll `stop` while they work.
  fn run_until(&self, graph: &Graph, stop: &dyn Fn() -> bool) -> Option<String> {
    if stop() {
      return None;
    }
    Some(self.run(graph))
  }
}

/// Returns the analysis for a stage.
pub fn analysis_for(kind: StageKind) -> Arc<dyn Analysis> {
  match kind {
    StageKind::Mst => Arc::new(MinimumSpanningTree),
    StageKind::MaxFlow => Arc::new(MaxFlow),
    StageKind::Scc => Arc::new(StronglyConnectedComponents),
    StageKind::Clique => Arc::new(CliqueCount),
  }
}

/// Looks up an analysis by its reply label (`mst`, `maxflow`, `scc`, `clique`).
pub fn analysis_by_name(name: &str) -> Option<Arc<dyn Analysis>> {
  name.parse::<StageKind>().ok().map(analysis_for)
}
