//! Tests for `client`.

use std::collections::HashSet;
use std::io::Cursor;

use crate::client::{RandomGraphParams, parse_manual_edges};
use crate::error::ClientError;
use crate::protocol::EdgeSpec;

fn params(vertices: usize, edges: usize, directed: bool) -> RandomGraphParams {
  RandomGraphParams {
    vertices,
    edges,
    max_weight: 9,
    seed: 7,
    directed,
  }
}

#[test]
fn random_graph_is_simple_and_seeded() {
  let p = params(10, 30, false);
  let req = p.random_request().unwrap();
  assert_eq!(req.vertex_count, 10);
  assert_eq!(req.seed, "7");
  assert_eq!(req.edges.len(), 30);

  let mut seen = HashSet::new();
  for e in &req.edges {
    assert_ne!(e.u, e.v);
    assert!((1..=9).contains(&e.weight));
    assert!(seen.insert((e.u.min(e.v), e.u.max(e.v))), "duplicate {e:?}");
  }
  assert_eq!(p.random_request().unwrap(), req);

  let other = RandomGraphParams { seed: 8, ..p }.random_request().unwrap();
  assert_ne!(other.edges, req.edges);
}

#[test]
fn complete_graphs_are_reachable() {
  assert_eq!(params(4, 12, true).random_request().unwrap().edges.len(), 12);
  assert_eq!(params(4, 6, false).random_request().unwrap().edges.len(), 6);
}

#[test]
fn too_many_edges_is_rejected() {
  assert_eq!(params(4, 12, true).max_edges(), 12);
  assert!(matches!(
    params(4, 7, false).random_request(),
    Err(ClientError::InvalidParameters(_))
  ));
  assert!(matches!(
    params(0, 0, false).validate(),
    Err(ClientError::InvalidParameters(_))
  ));
  let zero_weight = RandomGraphParams {
    max_weight: 0,
    ..params(3, 1, false)
  };
  assert!(zero_weight.validate().is_err());
}

#[test]
fn manual_edges_stop_at_blank_line() {
  let input = Cursor::new("# comment\n0 1 5\n 1 2 3 \n\n2 0 9\n");
  assert_eq!(
    parse_manual_edges(input).unwrap(),
    vec![
      EdgeSpec { u: 0, v: 1, weight: 5 },
      EdgeSpec { u: 1, v: 2, weight: 3 },
    ]
  );
}

#[test]
fn manual_edge_needs_three_integers() {
  for bad in ["0 1\n", "0 1 x\n", "0 1 2 3\n"] {
    match parse_manual_edges(Cursor::new(bad)) {
      Err(ClientError::InvalidEdge { line }) => assert_eq!(line, bad.trim()),
      other => panic!("unexpected {other:?}"),
    }
  }
}
