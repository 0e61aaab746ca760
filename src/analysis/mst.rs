//! Minimum spanning tree weight (Prim, dense variant).

use tracing::instrument;

use super::Analysis;
use crate::types::{Graph, StageKind};

/// Total weight of a minimum spanning tree.
///
/// Edge direction is ignored; when both `u -> v` and `v -> u` exist the
/// lighter one is used.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimumSpanningTree;

/// Returns the MST weight, or `None` when the graph is not connected.
#[instrument(level = "trace", skip(graph))]
pub(crate) fn mst_weight(graph: &Graph) -> Option<u64> {
  let n = graph.vertex_count();
  if n == 0 {
    return Some(0);
  }
  let mut in_tree = vec![false; n];
  let mut best: Vec<Option<u32>> = vec![None; n];
  best[0] = Some(0);
  let mut total = 0u64;

  for _ in 0..n {
    let next = (0..n)
      .filter(|v| !in_tree[*v])
      .filter_map(|v| best[v].map(|w| (w, v)))
      .min();
    let (w, u) = next?;
    in_tree[u] = true;
    total += u64::from(w);

    for v in 0..n {
      if in_tree[v] {
        continue;
      }
      let forward = graph.weight(u, v);
      let backward = graph.weight(v, u);
      let w = match (forward, backward) {
        (0, 0) => continue,
        (0, b) => b,
        (f, 0) => f,
        (f, b) => f.min(b),
      };
      if best[v].is_none_or(|cur| w < cur) {
        best[v] = Some(w);
      }
    }
  }
  Some(total)
}

impl Analysis for MinimumSpanningTree {
  fn kind(&self) -> StageKind {
    StageKind::Mst
  }

  fn run(&self, graph: &Graph) -> String {
    match mst_weight(graph) {
      Some(total) => format!("MST total weight: {}", total),
      None => "Graph not connected".to_string(),
    }
  }
}
