//! Strongly connected components (Kosaraju).

use tracing::instrument;

use super::Analysis;
use crate::types::{Graph, StageKind};

#[derive(Debug, Clone, Copy, Default)]
pub struct StronglyConnectedComponents;

/// Vertices in order of DFS completion, iterative to avoid deep recursion.
fn finish_order(graph: &Graph) -> Vec<usize> {
  let n = graph.vertex_count();
  let mut visited = vec![false; n];
  let mut order = Vec::with_capacity(n);
  for root in 0..n {
    if visited[root] {
      continue;
    }
    visited[root] = true;
    let mut stack = vec![(root, 0usize)];
    while let Some((u, next)) = stack.last_mut() {
      let u = *u;
      match (*next..n).find(|v| graph.has_edge(u, *v) && !visited[*v]) {
        Some(v) => {
          *next = v + 1;
          visited[v] = true;
          stack.push((v, 0));
        }
        None => {
          order.push(u);
          stack.pop();
        }
      }
    }
  }
  order
}

/// Components of `graph`, each sorted ascending, listed by smallest vertex.
#[instrument(level = "trace", skip(graph))]
pub(crate) fn components(graph: &Graph) -> Vec<Vec<usize>> {
  let n = graph.vertex_count();
  let order = finish_order(graph);
  let mut assigned = vec![false; n];
  let mut out = Vec::new();

  for &root in order.iter().rev() {
    if assigned[root] {
      continue;
    }
    assigned[root] = true;
    let mut component = vec![root];
    let mut stack = vec![root];
    while let Some(u) = stack.pop() {
      for v in 0..n {
        // reversed edge v -> u
        if !assigned[v] && graph.has_edge(v, u) {
          assigned[v] = true;
          component.push(v);
          stack.push(v);
        }
      }
    }
    component.sort_unstable();
    out.push(component);
  }
  out.sort_unstable_by_key(|c| c[0]);
  out
}

impl Analysis for StronglyConnectedComponents {
  fn kind(&self) -> StageKind {
    StageKind::Scc
  }

  fn run(&self, graph: &Graph) -> String {
    let comps = components(graph);
    let listed: Vec<String> = comps
      .iter()
      .map(|c| {
        let vs: Vec<String> = c.iter().map(usize::to_string).collect();
        format!("{{{}}}", vs.join(" "))
      })
      .collect();
    format!("Number of SCCs: {} {}", comps.len(), listed.join(" "))
      .trim_end()
      .to_string()
  }
}
