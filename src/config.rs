//! Server configuration: defaults, JSON file, then environment overrides.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::ConfigError;

pub const DEFAULT_PORT: u16 = 3490;
pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_MAX_VERTICES: usize = 64;
pub const DEFAULT_MAX_REQUEST_BYTES: u64 = 1 << 20;

pub const ENV_BIND: &str = "GRAPH_PIPELINE_BIND";
pub const ENV_PORT: &str = "GRAPH_PIPELINE_PORT";
pub const ENV_JOB_TIMEOUT_MS: &str = "GRAPH_PIPELINE_JOB_TIMEOUT_MS";
pub const ENV_MAX_VERTICES: &str = "GRAPH_PIPELINE_MAX_VERTICES";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
  /// Address to listen on.
  pub bind: String,
  /// TCP port; 0 picks a free port.
  pub port: u16,
  /// Deadline for one job, unbounded when `None`.
  pub job_timeout_ms: Option<u64>,
  /// Largest accepted `vertex_count`.
  pub max_vertices: usize,
  /// Requests longer than this are treated as incomplete.
  pub max_request_bytes: u64,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      bind: DEFAULT_BIND.to_string(),
      port: DEFAULT_PORT,
      job_timeout_ms: None,
      max_vertices: DEFAULT_MAX_VERTICES,
      max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
    }
  }
}

fn env_value<T: std::str::FromStr>(
  var: &'static str,
  lookup: &impl Fn(&str) -> Option<String>,
) -> Result<Option<T>, ConfigError> {
  match lookup(var) {
    None => Ok(None),
    Some(value) => value
      .trim()
      .parse()
      .map(Some)
      .map_err(|_| ConfigError::InvalidEnv { var, value }),
  }
}

impl ServerConfig {
  /// Loads a JSON config file. Missing fields keep their defaults.
  #[instrument(level = "trace", skip(path))]
  pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
    let bytes = std::fs::read(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Applies `GRAPH_PIPELINE_*` overrides read through `lookup`.
  pub fn apply_env_with(
    mut self,
    lookup: impl Fn(&str) -> Option<String>,
  ) -> Result<Self, ConfigError> {
    if let Some(bind) = env_value::<String>(ENV_BIND, &lookup)? {
      self.bind = bind;
    }
    if let Some(port) = env_value(ENV_PORT, &lookup)? {
      self.port = port;
    }
    if let Some(ms) = env_value(ENV_JOB_TIMEOUT_MS, &lookup)? {
      self.job_timeout_ms = Some(ms);
    }
    if let Some(max) = env_value(ENV_MAX_VERTICES, &lookup)? {
      self.max_vertices = max;
    }
    Ok(self)
  }

  /// Applies overrides from the process environment.
  pub fn apply_env(self) -> Result<Self, ConfigError> {
    self.apply_env_with(|var| std::env::var(var).ok())
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.max_vertices == 0 {
      return Err(ConfigError::Invalid("max_vertices must be at least 1".into()));
    }
    if self.max_request_bytes == 0 {
      return Err(ConfigError::Invalid(
        "max_request_bytes must be at least 1".into(),
      ));
    }
    if self.job_timeout_ms == Some(0) {
      return Err(ConfigError::Invalid("job_timeout_ms must be positive".into()));
    }
    Ok(())
  }

  pub fn job_timeout(&self) -> Option<Duration> {
    self.job_timeout_ms.map(Duration::from_millis)
  }

  /// `bind:port` as accepted by `TcpListener::bind`.
  pub fn listen_addr(&self) -> String {
    format!("{}:{}", self.bind, self.port)
  }
}
