//! TCP front end: accept loop and per-connection handler.
//!
//! Each accepted connection gets its own task which reads exactly one request,
//! submits it to the [Pipeline], waits on the ticket and writes either the
//! four-line report or a single error line before closing.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::TcpListenerStream;
use tracing::{debug, info, instrument, warn};

use crate::config::ServerConfig;
use crate::error::{ProtocolError, ServerError};
use crate::pipeline::{JobOutcome, Pipeline};
use crate::protocol::{
  BuiltGraph, GraphRequest, MALFORMED_REPLY, SHUTDOWN_REPLY, TIMEOUT_REPLY, read_request,
};

/// What a handler sent back to its client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
  /// The aggregated four-line report.
  Report(String),
  Malformed,
  ShuttingDown,
  TimedOut,
}

impl Reply {
  pub fn as_str(&self) -> &str {
    match self {
      Reply::Report(text) => text,
      Reply::Malformed => MALFORMED_REPLY,
      Reply::ShuttingDown => SHUTDOWN_REPLY,
      Reply::TimedOut => TIMEOUT_REPLY,
    }
  }
}

/// A bound listener plus the pipeline it feeds.
pub struct Server {
  listener: TcpListener,
  config: Arc<ServerConfig>,
  pipeline: Arc<Pipeline>,
}

impl Server {
  /// Validates `config`, binds the listener and starts the pipeline.
  #[instrument(level = "debug", skip(config), fields(addr = %config.listen_addr()))]
  pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
    config.validate()?;
    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr)
      .await
      .map_err(|source| ServerError::Bind {
        addr: addr.clone(),
        source,
      })?;
    info!(addr = %listener.local_addr()?, "server listening");
    Ok(Self {
      listener,
      config: Arc::new(config),
      pipeline: Pipeline::start(),
    })
  }

  pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
    Ok(self.listener.local_addr()?)
  }

  /// Shared handle used to stop the server via [Pipeline::shutdown].
  pub fn pipeline(&self) -> Arc<Pipeline> {
    Arc::clone(&self.pipeline)
  }

  /// Accepts connections until the pipeline starts shutting down, then closes
  /// the listener and waits for the open connections to be answered.
  pub async fn serve(self) -> Result<(), ServerError> {
    let Server {
      listener,
      config,
      pipeline,
    } = self;
    let mut stop = pipeline.stop_signal();
    let mut incoming = TcpListenerStream::new(listener);
    let mut connections = JoinSet::new();

    loop {
      tokio::select! {
        _ = async { let _ = stop.wait_for(|stopping| *stopping).await; } => break,
        next = incoming.next() => match next {
          Some(Ok(stream)) => {
            let peer = match stream.peer_addr() {
              Ok(peer) => peer,
              Err(e) => {
                warn!(error = %e, "dropping connection without peer address");
                continue;
              }
            };
            info!(%peer, "connection accepted");
            let pipeline = Arc::clone(&pipeline);
            let config = Arc::clone(&config);
            connections.spawn(async move {
              match handle_connection(stream, &pipeline, &config).await {
                Ok(reply) => debug!(%peer, ?reply, "connection answered"),
                Err(e) => warn!(%peer, error = %e, "connection failed"),
              }
            });
          }
          Some(Err(e)) => warn!(error = %e, "accept failed"),
          None => break,
        },
        Some(_) = connections.join_next(), if !connections.is_empty() => {}
      }
    }

    drop(incoming);
    info!(open = connections.len(), "accept loop stopped");
    while connections.join_next().await.is_some() {}
    Ok(())
  }
}

/// Answers a single request on `stream` and closes the write side.
pub async fn handle_connection<S>(
  stream: S,
  pipeline: &Pipeline,
  config: &ServerConfig,
) -> std::io::Result<Reply>
where
  S: AsyncRead + AsyncWrite + Unpin,
{
  let (reader, mut writer) = tokio::io::split(stream);
  let mut reader = BufReader::new(reader.take(config.max_request_bytes));
  let mut stop = pipeline.stop_signal();

  let request = tokio::select! {
    request = read_request(&mut reader, config.max_vertices) => Some(request),
    _ = async { let _ = stop.wait_for(|stopping| *stopping).await; } => None,
  };
  let reply = match request {
    Some(request) => answer(request, pipeline, config).await,
    None => Reply::ShuttingDown,
  };

  writer.write_all(reply.as_str().as_bytes()).await?;
  writer.shutdown().await?;
  Ok(reply)
}

async fn answer(
  request: Result<GraphRequest, ProtocolError>,
  pipeline: &Pipeline,
  config: &ServerConfig,
) -> Reply {
  let request = match request {
    Ok(request) => request,
    Err(e) => {
      info!(error = %e, "rejecting malformed request");
      return Reply::Malformed;
    }
  };

  let BuiltGraph {
    graph,
    dropped_edges,
  } = request.build_graph();
  debug!(
    seed = %request.seed,
    edges = graph.edge_count(),
    dropped_edges,
    "received graph\n{graph}"
  );

  let ticket = match pipeline.submit(graph) {
    Ok(ticket) => ticket,
    Err(e) => {
      info!(error = %e, "request refused");
      return Reply::ShuttingDown;
    }
  };

  let outcome = match config.job_timeout() {
    Some(limit) => match tokio::time::timeout(limit, ticket.wait()).await {
      Ok(outcome) => outcome,
      Err(_) => {
        warn!(job = %ticket.id(), ?limit, "job timed out");
        return Reply::TimedOut;
      }
    },
    None => ticket.wait().await,
  };

  match outcome {
    JobOutcome::Completed(report) => Reply::Report(report),
    JobOutcome::Abandoned => Reply::ShuttingDown,
  }
}
