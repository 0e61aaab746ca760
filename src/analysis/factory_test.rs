//! Tests for the analysis factory.

use super::{Analysis, analysis_by_name, analysis_for};
use crate::types::{Graph, StageKind};

#[test]
fn factory_returns_matching_kind() {
  for kind in StageKind::ALL {
    assert_eq!(analysis_for(kind).kind(), kind);
  }
}

#[test]
fn lookup_by_name() {
  let a = analysis_by_name("scc").unwrap();
  assert_eq!(a.kind(), StageKind::Scc);
  assert!(analysis_by_name("pagerank").is_none());
}

#[test]
fn analyses_are_pure() {
  let mut g = Graph::new(4, true);
  g.add_edge(0, 1, 3).unwrap();
  g.add_edge(1, 3, 2).unwrap();
  g.add_edge(3, 0, 1).unwrap();
  for kind in StageKind::ALL {
    let a = analysis_for(kind);
    assert_eq!(a.run(&g), a.run(&g));
  }
}
