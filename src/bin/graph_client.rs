//! CLI: Send one graph to a graph_server and print its report.
//!
//! Usage:
//!   graph_client -r -n <V> -e <E> [-w <MAX>] [-s <SEED>] [--directed]
//!   graph_client -m -n <V> [-e <E>] [--directed] < edges.txt
//!
//! Manual mode reads `u v weight` lines from stdin until EOF or a blank line.

use std::io;
use std::process;

use clap::{ArgGroup, Parser};
use graph_pipeline::GraphRequest;
use graph_pipeline::client::{RandomGraphParams, parse_manual_edges, send_request};
use tracing_subscriber::EnvFilter;

/// Send one graph to a graph_server and print its report.
#[derive(Parser, Debug)]
#[command(name = "graph_client")]
#[command(group(ArgGroup::new("mode").required(true).args(["random", "manual"])))]
struct Args {
  /// Generate a random graph.
  #[arg(short = 'r', long)]
  random: bool,

  /// Read edges from stdin.
  #[arg(short = 'm', long)]
  manual: bool,

  /// Number of vertices.
  #[arg(short = 'n', long, value_name = "V")]
  vertices: usize,

  /// Number of edges (required in random mode, checked in manual mode).
  #[arg(short = 'e', long, value_name = "E")]
  edges: Option<usize>,

  /// Largest random edge weight.
  #[arg(short = 'w', long, value_name = "MAX", default_value_t = 10)]
  max_weight: u32,

  /// Random seed; also sent to the server as request metadata.
  #[arg(short = 's', long, default_value_t = 0)]
  seed: u64,

  /// Build a directed graph.
  #[arg(long)]
  directed: bool,

  #[arg(long, default_value = "127.0.0.1")]
  host: String,

  #[arg(short = 'p', long, default_value_t = graph_pipeline::config::DEFAULT_PORT)]
  port: u16,
}

fn build_request(args: &Args) -> Result<GraphRequest, graph_pipeline::ClientError> {
  if args.random {
    let Some(edges) = args.edges else {
      return Err(graph_pipeline::ClientError::InvalidParameters(
        "random mode needs -e".into(),
      ));
    };
    return RandomGraphParams {
      vertices: args.vertices,
      edges,
      max_weight: args.max_weight,
      seed: args.seed,
      directed: args.directed,
    }
    .random_request();
  }

  let edges = parse_manual_edges(io::stdin().lock())?;
  if let Some(expected) = args.edges.filter(|&n| n != edges.len()) {
    return Err(graph_pipeline::ClientError::InvalidParameters(format!(
      "expected {} edges on stdin, read {}",
      expected,
      edges.len()
    )));
  }
  Ok(GraphRequest {
    seed: args.seed.to_string(),
    directed: args.directed,
    vertex_count: args.vertices,
    edges,
  })
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(io::stderr)
    .init();

  let args = Args::parse();
  let request = match build_request(&args) {
    Ok(request) => request,
    Err(e) => {
      eprintln!("Error: {}", e);
      process::exit(1);
    }
  };

  let addr = format!("{}:{}", args.host, args.port);
  match send_request(&addr, &request).await {
    Ok(reply) => {
      print!("{}", reply);
      if reply.starts_with("Error:") {
        process::exit(1);
      }
    }
    Err(e) => {
      eprintln!("Error: {}", e);
      process::exit(1);
    }
  }
}
