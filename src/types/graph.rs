//! Weighted graph stored as an adjacency matrix.

use std::fmt;

use thiserror::Error;
use tracing::instrument;

/// Why [Graph::add_edge] refused an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EdgeRejection {
  #[error("vertex out of range")]
  OutOfRange,
  #[error("self-loops are not allowed")]
  SelfLoop,
  #[error("weight must be positive")]
  NonPositiveWeight,
  #[error("edge already exists")]
  Duplicate,
}

/// Why a graph has no Eulerian circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NoEulerianCircuit {
  #[error("the graph is not connected")]
  NotConnected,
  #[error("vertex {0} has an odd degree")]
  OddDegree(usize),
  #[error("vertex {0} has different in- and out-degree")]
  UnbalancedDegree(usize),
}

/// Directed or undirected weighted graph. A weight of 0 means "no edge".
///
/// Undirected edges are mirrored across the diagonal. The graph is built once
/// per request and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
  n: usize,
  directed: bool,
  weights: Vec<u32>,
}

impl Graph {
  pub fn new(vertex_count: usize, directed: bool) -> Self {
    Self {
      n: vertex_count,
      directed,
      weights: vec![0; vertex_count * vertex_count],
    }
  }

  pub fn vertex_count(&self) -> usize {
    self.n
  }

  pub fn is_directed(&self) -> bool {
    self.directed
  }

  /// Adds `u -> v` (and `v -> u` when undirected).
  pub fn add_edge(&mut self, u: usize, v: usize, weight: i64) -> Result<(), EdgeRejection> {
    if u >= self.n || v >= self.n {
      return Err(EdgeRejection::OutOfRange);
    }
    if u == v {
      return Err(EdgeRejection::SelfLoop);
    }
    if weight <= 0 {
      return Err(EdgeRejection::NonPositiveWeight);
    }
    let weight = u32::try_from(weight).map_err(|_| EdgeRejection::OutOfRange)?;
    if self.weight(u, v) != 0 {
      return Err(EdgeRejection::Duplicate);
    }
    self.weights[u * self.n + v] = weight;
    if !self.directed {
      self.weights[v * self.n + u] = weight;
    }
    Ok(())
  }

  /// Weight of `u -> v`, 0 when absent or out of range.
  pub fn weight(&self, u: usize, v: usize) -> u32 {
    if u >= self.n || v >= self.n {
      return 0;
    }
    self.weights[u * self.n + v]
  }

  pub fn has_edge(&self, u: usize, v: usize) -> bool {
    self.weight(u, v) != 0
  }

  /// Vertices reachable from `u` over one outgoing edge, with weights.
  pub fn neighbors(&self, u: usize) -> impl Iterator<Item = (usize, u32)> + '_ {
    let row: &[u32] = if u < self.n {
      &self.weights[u * self.n..(u + 1) * self.n]
    } else {
      &[]
    };
    row
      .iter()
      .enumerate()
      .filter(|(_, w)| **w != 0)
      .map(|(v, w)| (v, *w))
  }

  /// Number of distinct edges (an undirected edge counts once).
  pub fn edge_count(&self) -> usize {
    let stored = self.weights.iter().filter(|w| **w != 0).count();
    if self.directed { stored } else { stored / 2 }
  }

  /// Out-degree of `v` (the degree for undirected graphs).
  pub fn degree(&self, v: usize) -> usize {
    self.neighbors(v).count()
  }

  pub fn in_degree(&self, v: usize) -> usize {
    (0..self.n).filter(|u| self.has_edge(*u, v)).count()
  }

  /// True when every vertex that has an edge lies in one component, ignoring
  /// edge direction. A graph without edges is connected only if it has a
  /// single vertex.
  #[instrument(level = "trace", skip(self))]
  pub fn is_connected(&self) -> bool {
    let touches_edge = |v: usize| (0..self.n).any(|u| self.has_edge(v, u) || self.has_edge(u, v));
    let Some(start) = (0..self.n).find(|v| touches_edge(*v)) else {
      return self.n == 1;
    };
    let mut visited = vec![false; self.n];
    let mut stack = vec![start];
    visited[start] = true;
    while let Some(u) = stack.pop() {
      for v in 0..self.n {
        if !visited[v] && (self.has_edge(u, v) || self.has_edge(v, u)) {
          visited[v] = true;
          stack.push(v);
        }
      }
    }
    (0..self.n).all(|v| visited[v] || !touches_edge(v))
  }

  /// Finds an Eulerian circuit with Hierholzer's algorithm.
  ///
  /// Returns the closed walk as a vertex sequence (first == last). A graph
  /// without edges yields an empty circuit.
  #[instrument(level = "trace", skip(self))]
  pub fn eulerian_circuit(&self) -> Result<Vec<usize>, NoEulerianCircuit> {
    if !self.is_connected() {
      return Err(NoEulerianCircuit::NotConnected);
    }
    for v in 0..self.n {
      if self.directed {
        if self.degree(v) != self.in_degree(v) {
          return Err(NoEulerianCircuit::UnbalancedDegree(v));
        }
      } else if self.degree(v) % 2 != 0 {
        return Err(NoEulerianCircuit::OddDegree(v));
      }
    }
    let Some(start) = (0..self.n).find(|v| self.degree(*v) > 0) else {
      return Ok(Vec::new());
    };

    let mut remaining = self.weights.clone();
    let mut stack = vec![start];
    let mut circuit = Vec::with_capacity(self.edge_count() + 1);
    while let Some(&u) = stack.last() {
      let next = (0..self.n).find(|v| remaining[u * self.n + v] != 0);
      match next {
        Some(v) => {
          remaining[u * self.n + v] = 0;
          if !self.directed {
            remaining[v * self.n + u] = 0;
          }
          stack.push(v);
        }
        None => {
          circuit.push(u);
          stack.pop();
        }
      }
    }
    circuit.reverse();
    Ok(circuit)
  }
}

impl fmt::Display for Graph {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(
      f,
      "{} graph with {} vertices:",
      if self.directed { "Directed" } else { "Undirected" },
      self.n
    )?;
    for u in 0..self.n {
      write!(f, "Vertex {}:", u)?;
      for (v, w) in self.neighbors(u) {
        write!(f, " ({}, weight: {})", v, w)?;
      }
      writeln!(f)?;
    }
    Ok(())
  }
}
