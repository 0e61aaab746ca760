//! # graph-pipeline
//!
//! A TCP server that runs four graph analyses on every submitted graph as a
//! staged pipeline.
//!
//! ## Architecture
//!
//! Each request becomes a [pipeline::Job] that moves through four stages, each
//! a long-lived worker connected to the next by a FIFO hand-off queue:
//!
//! MST → MaxFlow → SCC → Clique
//!
//! The terminal stage assembles the four result lines and wakes the connection
//! handler, which writes the report and closes the connection. A [Pipeline]
//! owns the queues and coordinates graceful shutdown.

pub mod analysis;
pub mod client;
#[cfg(test)]
mod client_test;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod protocol;
pub mod server;
pub mod types;

pub use config::ServerConfig;
pub use error::{ClientError, ConfigError, PipelineError, ProtocolError, ServerError};
pub use pipeline::{JobOutcome, Pipeline, StageReport};
pub use protocol::GraphRequest;
pub use server::{Reply, Server};
pub use types::{Graph, StageKind};
