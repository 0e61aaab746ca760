//! Maximum flow from vertex 0 to the last vertex (Edmonds–Karp).

use std::collections::VecDeque;

use tracing::instrument;

use super::Analysis;
use crate::types::{Graph, StageKind};

/// Maximum flow from vertex `0` to vertex `n - 1`, edge weights as capacities.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxFlow;

/// Shortest augmenting path from `source` to `sink` in the residual graph.
/// Returns the bottleneck and fills `parent`.
fn augmenting_path(
  residual: &[u64],
  n: usize,
  source: usize,
  sink: usize,
  parent: &mut [Option<usize>],
) -> Option<u64> {
  parent.fill(None);
  parent[source] = Some(source);
  let mut queue = VecDeque::from([(source, u64::MAX)]);
  while let Some((u, flow)) = queue.pop_front() {
    for v in 0..n {
      let cap = residual[u * n + v];
      if parent[v].is_none() && cap > 0 {
        parent[v] = Some(u);
        let bottleneck = flow.min(cap);
        if v == sink {
          return Some(bottleneck);
        }
        queue.push_back((v, bottleneck));
      }
    }
  }
  None
}

#[instrument(level = "trace", skip(graph))]
pub(crate) fn max_flow(graph: &Graph, source: usize, sink: usize) -> u64 {
  let n = graph.vertex_count();
  if source >= n || sink >= n || source == sink {
    return 0;
  }
  let mut residual: Vec<u64> = (0..n * n)
    .map(|i| u64::from(graph.weight(i / n, i % n)))
    .collect();
  let mut parent = vec![None; n];
  let mut flow = 0u64;

  while let Some(pushed) = augmenting_path(&residual, n, source, sink, &mut parent) {
    flow += pushed;
    let mut v = sink;
    while v != source {
      let Some(u) = parent[v] else { break };
      residual[u * n + v] -= pushed;
      residual[v * n + u] += pushed;
      v = u;
    }
  }
  flow
}

impl Analysis for MaxFlow {
  fn kind(&self) -> StageKind {
    StageKind::MaxFlow
  }

  fn run(&self, graph: &Graph) -> String {
    let sink = graph.vertex_count().saturating_sub(1);
    format!("Max flow from 0 to {}: {}", sink, max_flow(graph, 0, sink))
  }
}
