//! Tests for `Graph`.

use super::{EdgeRejection, Graph, NoEulerianCircuit};

fn undirected(n: usize, edges: &[(usize, usize, i64)]) -> Graph {
  let mut g = Graph::new(n, false);
  for &(u, v, w) in edges {
    g.add_edge(u, v, w).unwrap();
  }
  g
}

#[test]
fn undirected_edges_are_mirrored() {
  let g = undirected(3, &[(0, 1, 5)]);
  assert_eq!(g.weight(0, 1), 5);
  assert_eq!(g.weight(1, 0), 5);
  assert_eq!(g.edge_count(), 1);
}

#[test]
fn directed_edges_are_one_way() {
  let mut g = Graph::new(3, true);
  g.add_edge(0, 1, 4).unwrap();
  assert_eq!(g.weight(0, 1), 4);
  assert_eq!(g.weight(1, 0), 0);
  g.add_edge(1, 0, 7).unwrap();
  assert_eq!(g.weight(1, 0), 7);
  assert_eq!(g.edge_count(), 2);
}

#[test]
fn add_edge_rejects_invalid_edges() {
  let mut g = Graph::new(3, false);
  assert_eq!(g.add_edge(0, 3, 1), Err(EdgeRejection::OutOfRange));
  assert_eq!(g.add_edge(1, 1, 1), Err(EdgeRejection::SelfLoop));
  assert_eq!(g.add_edge(0, 1, 0), Err(EdgeRejection::NonPositiveWeight));
  assert_eq!(g.add_edge(0, 1, -2), Err(EdgeRejection::NonPositiveWeight));
  g.add_edge(0, 1, 5).unwrap();
  assert_eq!(g.add_edge(0, 1, 9), Err(EdgeRejection::Duplicate));
  assert_eq!(g.add_edge(1, 0, 9), Err(EdgeRejection::Duplicate));
  assert_eq!(g.weight(0, 1), 5);
}

#[test]
fn weight_out_of_range_is_zero() {
  let g = undirected(2, &[(0, 1, 1)]);
  assert_eq!(g.weight(5, 0), 0);
  assert!(!g.has_edge(0, 9));
  assert_eq!(g.neighbors(7).count(), 0);
}

#[test]
fn degrees() {
  let g = undirected(4, &[(0, 1, 1), (0, 2, 1), (0, 3, 1)]);
  assert_eq!(g.degree(0), 3);
  assert_eq!(g.degree(1), 1);
  let mut d = Graph::new(3, true);
  d.add_edge(0, 1, 1).unwrap();
  d.add_edge(2, 1, 1).unwrap();
  assert_eq!(d.degree(1), 0);
  assert_eq!(d.in_degree(1), 2);
}

#[test]
fn connectivity_ignores_isolated_vertices() {
  let g = undirected(4, &[(0, 1, 1), (1, 2, 1)]);
  assert!(g.is_connected());
  let split = undirected(4, &[(0, 1, 1), (2, 3, 1)]);
  assert!(!split.is_connected());
}

#[test]
fn connectivity_without_edges() {
  assert!(Graph::new(1, false).is_connected());
  assert!(!Graph::new(3, false).is_connected());
}

#[test]
fn eulerian_circuit_on_triangle() {
  let g = undirected(3, &[(0, 1, 1), (1, 2, 1), (2, 0, 1)]);
  let circuit = g.eulerian_circuit().unwrap();
  assert_eq!(circuit.len(), 4);
  assert_eq!(circuit.first(), circuit.last());
}

#[test]
fn eulerian_circuit_rejects_odd_degree() {
  let g = undirected(3, &[(0, 1, 1), (1, 2, 1)]);
  assert_eq!(g.eulerian_circuit(), Err(NoEulerianCircuit::OddDegree(0)));
}

#[test]
fn eulerian_circuit_rejects_disconnected() {
  let g = undirected(6, &[(0, 1, 1), (1, 2, 1), (2, 0, 1), (3, 4, 1), (4, 5, 1), (5, 3, 1)]);
  assert_eq!(g.eulerian_circuit(), Err(NoEulerianCircuit::NotConnected));
}

#[test]
fn eulerian_circuit_directed_cycle() {
  let mut g = Graph::new(3, true);
  g.add_edge(0, 1, 1).unwrap();
  g.add_edge(1, 2, 1).unwrap();
  g.add_edge(2, 0, 1).unwrap();
  assert_eq!(g.eulerian_circuit().unwrap(), vec![0, 1, 2, 0]);

  g = Graph::new(3, true);
  g.add_edge(0, 1, 1).unwrap();
  g.add_edge(1, 2, 1).unwrap();
  assert_eq!(
    g.eulerian_circuit(),
    Err(NoEulerianCircuit::UnbalancedDegree(0))
  );
}

#[test]
fn display_lists_edges() {
  let g = undirected(2, &[(0, 1, 3)]);
  let text = g.to_string();
  assert!(text.contains("Undirected graph with 2 vertices"));
  assert!(text.contains("Vertex 0: (1, weight: 3)"));
}
