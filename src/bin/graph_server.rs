//! CLI: Run the graph analysis pipeline server.
//!
//! Usage: `graph_server [OPTIONS]`
//! Example: graph_server --port 3490 --job-timeout-ms 5000
//!
//! Stops gracefully on Ctrl-C or SIGTERM: queued jobs are abandoned, waiting
//! clients get an error line, and every stage worker is joined.
//!
//! Set RUST_LOG=graph_pipeline=debug to log every received graph.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use graph_pipeline::{Server, ServerConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Run the graph analysis pipeline server.
#[derive(Parser, Debug)]
#[command(name = "graph_server")]
#[command(
  after_help = r#"Environment variables (override the config file and flags when set):
  GRAPH_PIPELINE_BIND            Listen address
  GRAPH_PIPELINE_PORT            Listen port
  GRAPH_PIPELINE_JOB_TIMEOUT_MS  Per-job deadline in milliseconds
  GRAPH_PIPELINE_MAX_VERTICES    Largest accepted vertex count

Examples:
  graph_server
  graph_server --config server.json --port 4000"#
)]
struct Args {
  /// JSON config file. Missing fields keep their defaults.
  #[arg(long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Address to listen on.
  #[arg(long, value_name = "ADDR")]
  bind: Option<String>,

  /// TCP port (0 picks a free port).
  #[arg(short, long)]
  port: Option<u16>,

  /// Per-job deadline in milliseconds; unbounded by default.
  #[arg(long, value_name = "MS")]
  job_timeout_ms: Option<u64>,

  /// Largest accepted vertex count.
  #[arg(long, value_name = "N")]
  max_vertices: Option<usize>,
}

impl Args {
  /// Defaults < config file < flags < environment.
  fn load_config(&self) -> Result<ServerConfig, graph_pipeline::ConfigError> {
    let mut config = match &self.config {
      Some(path) => ServerConfig::from_file(path)?,
      None => ServerConfig::default(),
    };
    if let Some(bind) = &self.bind {
      config.bind = bind.clone();
    }
    if let Some(port) = self.port {
      config.port = port;
    }
    if let Some(ms) = self.job_timeout_ms {
      config.job_timeout_ms = Some(ms);
    }
    if let Some(max) = self.max_vertices {
      config.max_vertices = max;
    }
    config.apply_env()
  }
}

async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      error!(error = %e, "cannot listen for Ctrl-C");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
      Ok(mut sigterm) => {
        sigterm.recv().await;
      }
      Err(e) => {
        error!(error = %e, "cannot listen for SIGTERM");
        std::future::pending::<()>().await;
      }
    }
  };
  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => info!("received Ctrl-C"),
    _ = terminate => info!("received SIGTERM"),
  }
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let args = Args::parse();
  let config = match args.load_config() {
    Ok(config) => config,
    Err(e) => {
      eprintln!("Configuration error: {}", e);
      process::exit(1);
    }
  };
  info!(?config, "options (env, flags or config file)");

  let server = match Server::bind(config).await {
    Ok(server) => server,
    Err(e) => {
      eprintln!("Server error: {}", e);
      process::exit(1);
    }
  };
  let pipeline = server.pipeline();
  let serving = tokio::spawn(server.serve());

  shutdown_signal().await;
  for report in pipeline.shutdown().await {
    info!(
      stage = %report.kind,
      processed = report.processed,
      skipped = report.skipped,
      discarded = report.discarded,
      "stage finished"
    );
  }

  match serving.await {
    Ok(Ok(())) => info!("server stopped"),
    Ok(Err(e)) => {
      eprintln!("Server error: {}", e);
      process::exit(1);
    }
    Err(e) => {
      eprintln!("Server task failed: {}", e);
      process::exit(1);
    }
  }
}
