//! Tests for `mst`.

use super::Analysis;
use super::mst::{MinimumSpanningTree, mst_weight};
use crate::types::Graph;

fn graph(n: usize, directed: bool, edges: &[(usize, usize, i64)]) -> Graph {
  let mut g = Graph::new(n, directed);
  for &(u, v, w) in edges {
    g.add_edge(u, v, w).unwrap();
  }
  g
}

#[test]
fn triangle_picks_two_lightest_edges() {
  let g = graph(3, false, &[(0, 1, 5), (1, 2, 3), (2, 0, 2)]);
  assert_eq!(mst_weight(&g), Some(5));
  assert_eq!(MinimumSpanningTree.run(&g), "MST total weight: 5");
}

#[test]
fn disconnected_graph_is_reported_as_text() {
  let g = graph(4, false, &[(0, 1, 1), (2, 3, 1)]);
  assert_eq!(mst_weight(&g), None);
  assert_eq!(MinimumSpanningTree.run(&g), "Graph not connected");
}

#[test]
fn single_vertex_has_zero_weight() {
  let g = Graph::new(1, false);
  assert_eq!(MinimumSpanningTree.run(&g), "MST total weight: 0");
}

#[test]
fn directed_edges_count_in_either_direction() {
  let g = graph(3, true, &[(1, 0, 4), (0, 2, 6), (2, 0, 1)]);
  assert_eq!(mst_weight(&g), Some(5));
}

#[test]
fn classic_five_vertex_example() {
  let g = graph(
    5,
    false,
    &[
      (0, 1, 2),
      (0, 3, 6),
      (1, 2, 3),
      (1, 3, 8),
      (1, 4, 5),
      (2, 4, 7),
      (3, 4, 9),
    ],
  );
  assert_eq!(mst_weight(&g), Some(16));
}
