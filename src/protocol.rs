//! Newline-delimited wire format.
//!
//! Request:
//!
//! ```text
//! <seed>
//! <directed: 0|1>
//! <vertex_count>
//! <edge_count>
//! <u> <v> <weight>      (edge_count lines)
//! ```
//!
//! Exactly `4 + edge_count` lines are read; the reader does not wait for EOF.
//! `edge_count` may not exceed `max_vertices²`.
//! Edge lines are kept raw here and validated when the [Graph] is built, so
//! a bad edge never rejects the whole request.

use std::fmt::Write as _;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, instrument};

use crate::error::ProtocolError;
use crate::types::{Graph, StageKind};

/// Reply for requests that cannot be parsed.
pub const MALFORMED_REPLY: &str = "Error: incomplete or bad message\n";
/// Reply when the pipeline stops before the job finished.
pub const SHUTDOWN_REPLY: &str = "Error: server shutting down\n";
/// Reply when the job misses its deadline.
pub const TIMEOUT_REPLY: &str = "Error: timed out\n";

const HEADER_LINES: usize = 4;

/// One edge line as sent by the client, not yet validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeSpec {
  pub u: i64,
  pub v: i64,
  pub weight: i64,
}

/// A fully framed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphRequest {
  /// Opaque client metadata.
  pub seed: String,
  pub directed: bool,
  pub vertex_count: usize,
  /// Parsable edge lines in arrival order. Unparsable lines are skipped.
  pub edges: Vec<EdgeSpec>,
}

/// Graph built from a request plus the number of edges that were dropped.
#[derive(Debug, Clone)]
pub struct BuiltGraph {
  pub graph: Graph,
  pub dropped_edges: usize,
}

impl GraphRequest {
  /// Builds the graph, silently dropping out-of-range, self-loop, duplicate
  /// and non-positive edges.
  #[instrument(level = "trace", skip(self), fields(vertices = self.vertex_count, edges = self.edges.len()))]
  pub fn build_graph(&self) -> BuiltGraph {
    let mut graph = Graph::new(self.vertex_count, self.directed);
    let mut dropped_edges = 0;
    for edge in &self.edges {
      let (Ok(u), Ok(v)) = (usize::try_from(edge.u), usize::try_from(edge.v)) else {
        debug!(?edge, "dropping edge: negative vertex");
        dropped_edges += 1;
        continue;
      };
      if let Err(reason) = graph.add_edge(u, v, edge.weight) {
        debug!(?edge, %reason, "dropping edge");
        dropped_edges += 1;
      }
    }
    BuiltGraph {
      graph,
      dropped_edges,
    }
  }

  /// Serializes the request in wire format.
  pub fn encode(&self) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", self.seed);
    let _ = writeln!(out, "{}", u8::from(self.directed));
    let _ = writeln!(out, "{}", self.vertex_count);
    let _ = writeln!(out, "{}", self.edges.len());
    for e in &self.edges {
      let _ = writeln!(out, "{} {} {}", e.u, e.v, e.weight);
    }
    out
  }
}

/// Incremental request parser fed one line at a time.
#[derive(Debug)]
struct RequestParser {
  max_vertices: usize,
  seed: String,
  directed: bool,
  vertex_count: usize,
  edge_count: usize,
  lines: usize,
  edges: Vec<EdgeSpec>,
}

fn header<T: std::str::FromStr>(field: &'static str, line: &str) -> Result<T, ProtocolError> {
  line.trim().parse().map_err(|_| ProtocolError::BadHeader {
    field,
    value: line.trim().to_string(),
  })
}

fn parse_edge(line: &str) -> Option<EdgeSpec> {
  let mut parts = line.split_whitespace().map(str::parse::<i64>);
  let u = parts.next()?.ok()?;
  let v = parts.next()?.ok()?;
  let weight = parts.next()?.ok()?;
  Some(EdgeSpec { u, v, weight })
}

impl RequestParser {
  fn new(max_vertices: usize) -> Self {
    Self {
      max_vertices,
      seed: String::new(),
      directed: false,
      vertex_count: 0,
      edge_count: 0,
      lines: 0,
      edges: Vec::new(),
    }
  }

  /// Every ordered vertex pair once, repeated lines included. Also keeps
  /// `HEADER_LINES + edge_count` from overflowing.
  fn max_edge_lines(&self) -> usize {
    self
      .max_vertices
      .saturating_mul(self.max_vertices)
      .min(usize::MAX - HEADER_LINES)
  }

  fn expected_lines(&self) -> Option<usize> {
    (self.lines >= HEADER_LINES).then(|| HEADER_LINES + self.edge_count)
  }

  fn is_complete(&self) -> bool {
    self.expected_lines().is_some_and(|n| self.lines >= n)
  }

  fn feed(&mut self, line: &str) -> Result<(), ProtocolError> {
    match self.lines {
      0 => self.seed = line.trim().to_string(),
      1 => {
        self.directed = match line.trim() {
          "0" => false,
          "1" => true,
          other => {
            return Err(ProtocolError::BadHeader {
              field: "directed",
              value: other.to_string(),
            });
          }
        }
      }
      2 => {
        let count: usize = header("vertex_count", line)?;
        if count == 0 || count > self.max_vertices {
          return Err(ProtocolError::VertexCountOutOfRange {
            count,
            max: self.max_vertices,
          });
        }
        self.vertex_count = count;
      }
      3 => {
        let count: usize = header("edge_count", line)?;
        let max = self.max_edge_lines();
        if count > max {
          return Err(ProtocolError::EdgeCountOutOfRange { count, max });
        }
        self.edge_count = count;
      }
      _ => match parse_edge(line) {
        Some(edge) => self.edges.push(edge),
        None => debug!(line = line.trim(), "skipping unparsable edge line"),
      },
    }
    self.lines += 1;
    Ok(())
  }

  fn finish(self) -> Result<GraphRequest, ProtocolError> {
    if !self.is_complete() {
      return Err(ProtocolError::Incomplete {
        expected: self.expected_lines().unwrap_or(HEADER_LINES),
        received: self.lines,
      });
    }
    Ok(GraphRequest {
      seed: self.seed,
      directed: self.directed,
      vertex_count: self.vertex_count,
      edges: self.edges,
    })
  }
}

/// Parses a complete request held in memory.
pub fn parse_request(text: &str, max_vertices: usize) -> Result<GraphRequest, ProtocolError> {
  let mut parser = RequestParser::new(max_vertices);
  for line in text.lines() {
    if parser.is_complete() {
      break;
    }
    parser.feed(line)?;
  }
  parser.finish()
}

/// Reads one request from `reader`, stopping after the last declared edge
/// line. EOF before that point is [ProtocolError::Incomplete].
#[instrument(level = "trace", skip(reader))]
pub async fn read_request<R>(reader: &mut R, max_vertices: usize) -> Result<GraphRequest, ProtocolError>
where
  R: AsyncBufRead + Unpin,
{
  let mut parser = RequestParser::new(max_vertices);
  let mut line = String::new();
  while !parser.is_complete() {
    line.clear();
    if reader.read_line(&mut line).await? == 0 {
      break;
    }
    parser.feed(&line)?;
  }
  parser.finish()
}

/// Renders the aggregated reply, one `label: text` line per stage.
pub fn format_report<'a>(results: impl IntoIterator<Item = (StageKind, &'a str)>) -> String {
  let mut out = String::new();
  for (kind, text) in results {
    let _ = writeln!(out, "{}: {}", kind.label(), text);
  }
  out
}
