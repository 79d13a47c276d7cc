//! Default runtime configuration for the downstream service.
//!
//! The file is scaffolding: it is written once when missing and never
//! touched again, whatever it contains.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SparkSection {
  pub base_address: String,
  pub username: String,
  pub password: String,
}

impl Default for SparkSection {
  fn default() -> Self {
    Self {
      base_address: "http://localhost".to_string(),
      username: "admin".to_string(),
      password: "12345678".to_string(),
    }
  }
}

/// Cache and timeout settings, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CachingSection {
  pub login_cache_ttl: u64,
  pub default_request_cache_ttl: u64,
  pub default_job_timeout: u64,
}

impl Default for CachingSection {
  fn default() -> Self {
    Self {
      login_cache_ttl: 86400,
      default_request_cache_ttl: 100,
      default_job_timeout: 100,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceConfig {
  pub spark: SparkSection,
  pub caching: CachingSection,
}

impl ServiceConfig {
  /// Render as an INI document.
  pub fn render(&self) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "[spark]");
    let _ = writeln!(out, "base_address = {}", self.spark.base_address);
    let _ = writeln!(out, "username = {}", self.spark.username);
    let _ = writeln!(out, "password = {}", self.spark.password);
    let _ = writeln!(out);
    let _ = writeln!(out, "[caching]");
    let _ = writeln!(out, "login_cache_ttl = {}", self.caching.login_cache_ttl);
    let _ = writeln!(out, "default_request_cache_ttl = {}", self.caching.default_request_cache_ttl);
    let _ = writeln!(out, "default_job_timeout = {}", self.caching.default_job_timeout);
    out
  }
}

#[derive(Debug, Error)]
pub enum ServiceConfigError {
  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: std::io::Error },

  #[error("failed to write file {}: {source}", path.display())]
  WriteFile { path: PathBuf, source: std::io::Error },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmitOutcome {
  Written,
  /// The file already existed and was left alone.
  Skipped,
}

/// Write `config` to `path` unless something already exists there.
pub fn emit_default_config(path: &Path, config: &ServiceConfig) -> Result<EmitOutcome, ServiceConfigError> {
  if path.exists() {
    debug!(path = %path.display(), "service config exists, leaving it untouched");
    return Ok(EmitOutcome::Skipped);
  }

  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent).map_err(|e| ServiceConfigError::CreateDir {
      path: parent.to_path_buf(),
      source: e,
    })?;
  }

  fs::write(path, config.render()).map_err(|e| ServiceConfigError::WriteFile {
    path: path.to_path_buf(),
    source: e,
  })?;

  info!(path = %path.display(), "wrote default service config");
  Ok(EmitOutcome::Written)
}
