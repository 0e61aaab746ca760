//! Tests for `StageKind`.

use super::StageKind;

#[test]
fn pipeline_order() {
  let labels: Vec<&str> = StageKind::ALL.iter().map(|k| k.label()).collect();
  assert_eq!(labels, vec!["mst", "maxflow", "scc", "clique"]);
  for (i, k) in StageKind::ALL.iter().enumerate() {
    assert_eq!(k.index(), i);
  }
}

#[test]
fn next_links_stages() {
  assert_eq!(StageKind::Mst.next(), Some(StageKind::MaxFlow));
  assert_eq!(StageKind::MaxFlow.next(), Some(StageKind::Scc));
  assert_eq!(StageKind::Scc.next(), Some(StageKind::Clique));
  assert_eq!(StageKind::Clique.next(), None);
  assert!(StageKind::Clique.is_terminal());
  assert!(!StageKind::Mst.is_terminal());
}

#[test]
fn parse_by_label() {
  assert_eq!("maxflow".parse::<StageKind>(), Ok(StageKind::MaxFlow));
  assert_eq!(" scc\n".parse::<StageKind>(), Ok(StageKind::Scc));
  let err = "dijkstra".parse::<StageKind>().unwrap_err();
  assert!(err.to_string().contains("dijkstra"));
}

#[test]
fn display_is_label() {
  assert_eq!(StageKind::Clique.to_string(), "clique");
}
