//! Error types for the wire protocol, the pipeline, configuration, server and client.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::StageKind;

/// A request that cannot enter the pipeline.
#[derive(Debug, Error)]
pub enum ProtocolError {
  #[error("request ended after {received} of {expected} lines")]
  Incomplete { expected: usize, received: usize },
  #[error("bad {field} header: {value:?}")]
  BadHeader { field: &'static str, value: String },
  #[error("vertex count {count} outside 1..={max}")]
  VertexCountOutOfRange { count: usize, max: usize },
  #[error("edge count {count} exceeds {max}")]
  EdgeCountOutOfRange { count: usize, max: usize },
  #[error("i/o error while reading request: {0}")]
  Io(#[from] std::io::Error),
}

/// Pipeline faults. Slot errors are invariant violations, never user errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
  #[error("pipeline is shutting down")]
  ShuttingDown,
  #[error("result slot for stage {0} already written")]
  SlotAlreadyWritten(StageKind),
  #[error("result slot for stage {0} is empty")]
  MissingResult(StageKind),
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("cannot read config file {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("invalid config file {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
  #[error("invalid value {value:?} for {var}")]
  InvalidEnv { var: &'static str, value: String },
  #[error("invalid configuration: {0}")]
  Invalid(String),
}

#[derive(Debug, Error)]
pub enum ServerError {
  #[error("cannot bind {addr}: {source}")]
  Bind {
    addr: String,
    #[source]
    source: std::io::Error,
  },
  #[error(transparent)]
  Config(#[from] ConfigError),
  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("cannot connect to {addr}: {source}")]
  Connect {
    addr: String,
    #[source]
    source: std::io::Error,
  },
  #[error("invalid graph parameters: {0}")]
  InvalidParameters(String),
  #[error("invalid edge line {line:?}")]
  InvalidEdge { line: String },
  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),
}
