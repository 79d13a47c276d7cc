mod branch;
mod build;
mod clean;
mod config;
mod init;
mod usage;
mod venv;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use monark_build_lib::layout::Layout;
use monark_build_lib::manifest::Manifest;
use monark_build_lib::vcs::resolve_branch;
use monark_build_lib::workspace_lock::WorkspaceLock;

use crate::output::OutputFormat;

pub use branch::cmd_branch;
pub use build::{cmd_build, cmd_pack};
pub use clean::{CleanTarget, cmd_clean};
pub use config::cmd_config;
pub use init::cmd_init;
pub use test::{cmd_clean_test, cmd_test};
pub use usage::print_usage;
pub use venv::{cmd_dev, cmd_pp_cmd, cmd_venv};

/// Everything a command needs: resolved paths, overrides and output mode.
pub struct Context {
  pub layout: Layout,
  pub branch_override: Option<String>,
  pub output: OutputFormat,
}

impl Context {
  pub fn load(
    root: Option<&Path>,
    manifest: Option<&Path>,
    version: Option<&str>,
    branch_override: Option<String>,
    output: OutputFormat,
  ) -> Result<Self> {
    let root = resolve_root(root)?;

    let mut manifest = Manifest::load(&root, manifest).context("Failed to load manifest")?;
    if let Some(version) = version {
      manifest.set_version(version).context("Invalid --set-version")?;
    }

    Ok(Self {
      layout: Layout::new(root, manifest),
      branch_override,
      output,
    })
  }

  pub fn branch(&self) -> Result<String> {
    resolve_branch(&self.layout.root, self.branch_override.as_deref()).context("Failed to determine branch")
  }

  /// Take the workspace lock for a mutating command.
  pub fn lock(&self, command: &str) -> Result<WorkspaceLock> {
    WorkspaceLock::acquire(&self.layout.lock_path(), command).context("Failed to acquire workspace lock")
  }
}

pub fn resolve_root(root: Option<&Path>) -> Result<PathBuf> {
  let root = match root {
    Some(root) => root.to_path_buf(),
    None => std::env::current_dir().context("Failed to read current directory")?,
  };
  dunce::canonicalize(&root).with_context(|| format!("Repository root not found: {}", root.display()))
}

/// Run a future to completion on a fresh runtime.
fn block_on<F: std::future::Future>(future: F) -> Result<F::Output> {
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  Ok(rt.block_on(future))
}
