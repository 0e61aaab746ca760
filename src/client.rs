//! Client side: request generation and a one-shot request/response exchange.

use std::io::BufRead;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, instrument};

use crate::error::ClientError;
use crate::protocol::{EdgeSpec, GraphRequest};

/// Parameters of a seeded random graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomGraphParams {
  pub vertices: usize,
  pub edges: usize,
  pub max_weight: u32,
  pub seed: u64,
  pub directed: bool,
}

impl RandomGraphParams {
  /// Most edges a simple graph on `vertices` vertices can hold.
  pub fn max_edges(&self) -> usize {
    let pairs = self.vertices * self.vertices.saturating_sub(1);
    if self.directed { pairs } else { pairs / 2 }
  }

  pub fn validate(&self) -> Result<(), ClientError> {
    if self.vertices == 0 {
      return Err(ClientError::InvalidParameters(
        "the graph needs at least one vertex".into(),
      ));
    }
    if self.max_weight == 0 {
      return Err(ClientError::InvalidParameters(
        "max weight must be at least 1".into(),
      ));
    }
    if self.edges > self.max_edges() {
      return Err(ClientError::InvalidParameters(format!(
        "{} edges requested but {} vertices allow at most {}",
        self.edges,
        self.vertices,
        self.max_edges()
      )));
    }
    Ok(())
  }

  /// Draws `edges` distinct non-loop edges with weights in `1..=max_weight`.
  /// The same parameters always give the same request.
  #[instrument(level = "trace")]
  pub fn random_request(&self) -> Result<GraphRequest, ClientError> {
    self.validate()?;
    let mut rng = StdRng::seed_from_u64(self.seed);
    let n = self.vertices;
    let mut candidates: Vec<(usize, usize)> = (0..n)
      .flat_map(|u| (0..n).map(move |v| (u, v)))
      .filter(|&(u, v)| if self.directed { u != v } else { u < v })
      .collect();
    candidates.shuffle(&mut rng);

    let edges = candidates
      .into_iter()
      .take(self.edges)
      .map(|(u, v)| EdgeSpec {
        u: u as i64,
        v: v as i64,
        weight: i64::from(rng.gen_range(1..=self.max_weight)),
      })
      .collect();
    Ok(GraphRequest {
      seed: self.seed.to_string(),
      directed: self.directed,
      vertex_count: n,
      edges,
    })
  }
}

/// Reads `u v weight` lines until EOF or an empty line. Lines starting with
/// `#` are ignored.
pub fn parse_manual_edges(input: impl BufRead) -> Result<Vec<EdgeSpec>, ClientError> {
  let mut edges = Vec::new();
  for line in input.lines() {
    let line = line?;
    let trimmed = line.trim();
    if trimmed.is_empty() {
      break;
    }
    if trimmed.starts_with('#') {
      continue;
    }
    let parts: Vec<i64> = trimmed
      .split_whitespace()
      .map(str::parse)
      .collect::<Result<_, _>>()
      .map_err(|_| ClientError::InvalidEdge {
        line: trimmed.to_string(),
      })?;
    let &[u, v, weight] = parts.as_slice() else {
      return Err(ClientError::InvalidEdge {
        line: trimmed.to_string(),
      });
    };
    edges.push(EdgeSpec { u, v, weight });
  }
  Ok(edges)
}

/// Sends `request` to `addr` and returns everything the server wrote back.
#[instrument(level = "debug", skip(request), fields(vertices = request.vertex_count, edges = request.edges.len()))]
pub async fn send_request(addr: &str, request: &GraphRequest) -> Result<String, ClientError> {
  let mut stream = TcpStream::connect(addr)
    .await
    .map_err(|source| ClientError::Connect {
      addr: addr.to_string(),
      source,
    })?;
  stream.write_all(request.encode().as_bytes()).await?;
  let mut reply = String::new();
  stream.read_to_string(&mut reply).await?;
  debug!(bytes = reply.len(), "reply received");
  Ok(reply)
}
