//! Clique counting for clique sizes 2 through 5.

use tracing::instrument;

use super::Analysis;
use crate::types::{Graph, StageKind};

pub(crate) const MIN_CLIQUE: usize = 2;
pub(crate) const MAX_CLIQUE: usize = 5;

/// Counts vertex sets of size 2–5 that are pairwise adjacent, and how many of
/// those cannot be extended by another vertex.
///
/// `a` and `b` with `a < b` are adjacent when the edge `a -> b` exists; for
/// undirected graphs this is plain adjacency.
///
/// Maximality is judged against the whole graph, not the counted range: a
/// 5-clique that extends to a 6-clique is not maximal, so K6 reports
/// `maximal: 0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CliqueCount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct CliqueTally {
  pub total: u64,
  pub maximal: u64,
}

fn adjacent(graph: &Graph, a: usize, b: usize) -> bool {
  graph.has_edge(a.min(b), a.max(b))
}

fn is_maximal(graph: &Graph, clique: &[usize]) -> bool {
  !(0..graph.vertex_count())
    .filter(|x| !clique.contains(x))
    .any(|x| clique.iter().all(|&c| adjacent(graph, c, x)))
}

/// Search nodes visited between two polls of the stop callback.
const STOP_POLL_INTERVAL: u64 = 4096;

struct Search<'a> {
  graph: &'a Graph,
  stop: &'a dyn Fn() -> bool,
  visited: u64,
  stopped: bool,
  tally: CliqueTally,
}

impl Search<'_> {
  fn extend(&mut self, clique: &mut Vec<usize>) {
    self.visited += 1;
    if self.visited % STOP_POLL_INTERVAL == 0 && (self.stop)() {
      self.stopped = true;
    }
    if self.stopped {
      return;
    }
    if clique.len() >= MIN_CLIQUE {
      self.tally.total += 1;
      if is_maximal(self.graph, clique) {
        self.tally.maximal += 1;
      }
    }
    if clique.len() == MAX_CLIQUE {
      return;
    }
    let from = clique.last().map_or(0, |v| v + 1);
    for v in from..self.graph.vertex_count() {
      if clique.iter().all(|&c| adjacent(self.graph, c, v)) {
        clique.push(v);
        self.extend(clique);
        clique.pop();
        if self.stopped {
          return;
        }
      }
    }
  }
}

/// Counts cliques, giving up with `None` once `stop` returns true. `stop` is
/// polled every few thousand search nodes.
#[instrument(level = "trace", skip(graph, stop))]
pub(crate) fn count_cliques_until(graph: &Graph, stop: &dyn Fn() -> bool) -> Option<CliqueTally> {
  let mut search = Search {
    graph,
    stop,
    visited: 0,
    stopped: false,
    tally: CliqueTally::default(),
  };
  let mut clique = Vec::with_capacity(MAX_CLIQUE);
  search.extend(&mut clique);
  (!search.stopped).then_some(search.tally)
}

pub(crate) fn count_cliques(graph: &Graph) -> CliqueTally {
  count_cliques_until(graph, &|| false).unwrap_or_default()
}

fn render(tally: CliqueTally) -> String {
  format!(
    "Number of cliques (size {}-{}): {}, maximal: {}",
    MIN_CLIQUE, MAX_CLIQUE, tally.total, tally.maximal
  )
}

impl Analysis for CliqueCount {
  fn kind(&self) -> StageKind {
    StageKind::Clique
  }

  fn run(&self, graph: &Graph) -> String {
    render(count_cliques(graph))
  }

  fn run_until(&self, graph: &Graph, stop: &dyn Fn() -> bool) -> Option<String> {
    count_cliques_until(graph, stop).map(render)
  }
}
