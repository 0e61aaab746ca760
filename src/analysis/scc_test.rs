//! Tests for `scc`.

use super::Analysis;
use super::scc::{StronglyConnectedComponents, components};
use crate::types::Graph;

fn directed(n: usize, edges: &[(usize, usize, i64)]) -> Graph {
  let mut g = Graph::new(n, true);
  for &(u, v, w) in edges {
    g.add_edge(u, v, w).unwrap();
  }
  g
}

#[test]
fn cycle_plus_tail() {
  let g = directed(4, &[(0, 1, 1), (1, 2, 1), (2, 0, 1), (2, 3, 1)]);
  assert_eq!(components(&g), vec![vec![0, 1, 2], vec![3]]);
  assert_eq!(
    StronglyConnectedComponents.run(&g),
    "Number of SCCs: 2 {0 1 2} {3}"
  );
}

#[test]
fn dag_has_singleton_components() {
  let g = directed(3, &[(0, 1, 1), (1, 2, 1)]);
  assert_eq!(components(&g).len(), 3);
}

#[test]
fn two_cycles_joined_one_way() {
  let g = directed(
    6,
    &[
      (0, 1, 1),
      (1, 0, 1),
      (1, 2, 1),
      (2, 3, 1),
      (3, 4, 1),
      (4, 2, 1),
      (5, 4, 1),
    ],
  );
  assert_eq!(components(&g), vec![vec![0, 1], vec![2, 3, 4], vec![5]]);
}

#[test]
fn undirected_components_are_connected_components() {
  let mut g = Graph::new(5, false);
  g.add_edge(0, 1, 1).unwrap();
  g.add_edge(3, 4, 1).unwrap();
  assert_eq!(components(&g), vec![vec![0, 1], vec![2], vec![3, 4]]);
}

#[test]
fn empty_graph() {
  let g = Graph::new(0, true);
  assert_eq!(StronglyConnectedComponents.run(&g), "Number of SCCs: 0");
}
