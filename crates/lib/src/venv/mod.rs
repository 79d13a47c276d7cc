//! Isolated Python environment provisioning.
//!
//! The environment is a conda prefix holding a pinned interpreter and the
//! command SDK installed from source control. For local development the
//! working copy of the project is symlinked into the SDK's command
//! directory, so edits are picked up without reinstalling.

mod process;

use std::ffi::OsStr;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::layout::Layout;
use crate::manifest::ManifestError;
use crate::util::fs::{create_symlink, path_occupied, remove_path};

pub use process::run_tool;

#[derive(Debug, Error)]
pub enum VenvError {
  #[error("failed to start {}: {source}", program.display())]
  Spawn { program: PathBuf, source: std::io::Error },

  #[error("`{command}` failed with exit code {}{}", code.map_or("unknown".to_string(), |c| c.to_string()), stderr_suffix(stderr))]
  ToolFailed {
    command: String,
    code: Option<i32>,
    stderr: String,
  },

  #[error(
    "package revision '{rev}' is a moving reference; pin [venv.package] rev to a tag or commit id, \
     or set require_pinned = false"
  )]
  MutableRevision { rev: String },

  #[error("environment not found at {} (run venv first)", path.display())]
  Missing { path: PathBuf },

  #[error("project directory not found: {}", path.display())]
  ProjectMissing { path: PathBuf },

  #[error("refusing to overwrite existing path {}", path.display())]
  LinkExists { path: PathBuf },

  #[error(transparent)]
  UnsafeLayout(#[from] ManifestError),

  #[error("filesystem error at {}: {source}", path.display())]
  Io { path: PathBuf, source: std::io::Error },
}

fn stderr_suffix(stderr: &str) -> String {
  if stderr.is_empty() {
    String::new()
  } else {
    format!(":\n{stderr}")
  }
}

/// Provisioning steps, reported before each one runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  CreateEnv,
  InstallPython,
  InstallPackage,
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Phase::CreateEnv => write!(f, "Creating environment"),
      Phase::InstallPython => write!(f, "Installing python"),
      Phase::InstallPackage => write!(f, "Installing package"),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provisioned {
  Created,
  /// The environment directory existed and was kept as is.
  AlreadyPresent,
}

/// Whether `rev` names immutable content: a commit id or a version tag.
pub fn is_immutable_rev(rev: &str) -> bool {
  let is_commit = (7..=40).contains(&rev.len()) && rev.chars().all(|c| c.is_ascii_hexdigit());
  let version = rev.strip_prefix('v').unwrap_or(rev);
  is_commit || semver::Version::parse(version).is_ok()
}

/// Python interpreter inside a conda prefix.
fn python_path(layout: &Layout) -> PathBuf {
  #[cfg(windows)]
  {
    layout.venv_dir().join("python.exe")
  }
  #[cfg(not(windows))]
  {
    layout.venv_dir().join("bin").join("python")
  }
}

/// Create the environment.
///
/// An existing environment directory counts as provisioned unless `force`
/// is set, in which case it is destroyed and rebuilt. A failed step
/// removes the partial environment so the next run starts clean; nothing
/// is retried.
pub async fn create<F>(layout: &Layout, force: bool, mut on_phase: F) -> Result<Provisioned, VenvError>
where
  F: FnMut(Phase),
{
  layout.check_owned_dirs()?;

  let venv = &layout.manifest.venv;
  let venv_dir = layout.venv_dir();

  if venv_dir.exists() {
    if !force {
      info!(path = %venv_dir.display(), "environment already present");
      return Ok(Provisioned::AlreadyPresent);
    }
    destroy(layout)?;
  }

  let rev = &venv.package.rev;
  if !is_immutable_rev(rev) {
    if venv.require_pinned {
      return Err(VenvError::MutableRevision { rev: rev.clone() });
    }
    warn!(rev = %rev, package = %venv.package.name, "installing from a moving reference; the environment is not reproducible");
  }

  let result = provision(layout, &mut on_phase).await;
  if result.is_err() && path_occupied(&venv_dir) {
    warn!(path = %venv_dir.display(), "removing partially created environment");
    if let Err(e) = remove_path(&venv_dir) {
      warn!(path = %venv_dir.display(), error = %e, "failed to remove partial environment");
    }
  }
  result?;

  info!(path = %venv_dir.display(), "environment created");
  Ok(Provisioned::Created)
}

async fn provision<F>(layout: &Layout, on_phase: &mut F) -> Result<(), VenvError>
where
  F: FnMut(Phase),
{
  let venv = &layout.manifest.venv;
  let venv_dir = layout.venv_dir();
  let conda = PathBuf::from(&venv.conda);
  let prefix = venv_dir.as_os_str();

  on_phase(Phase::CreateEnv);
  run_tool(
    &conda,
    [OsStr::new("create"), OsStr::new("--copy"), OsStr::new("-p"), prefix, OsStr::new("-y")],
    None,
  )
  .await?;

  on_phase(Phase::InstallPython);
  let python_spec = format!("python=={}", venv.python);
  run_tool(
    &conda,
    [OsStr::new("install"), OsStr::new("-p"), prefix, OsStr::new(&python_spec), OsStr::new("-y")],
    None,
  )
  .await?;

  on_phase(Phase::InstallPackage);
  let requirement = venv.package.requirement();
  run_tool(
    &python_path(layout),
    ["-m", "pip", "install", "--no-input", requirement.as_str()],
    None,
  )
  .await?;

  Ok(())
}

/// Delete the environment directory. Returns whether anything was removed.
pub fn destroy(layout: &Layout) -> Result<bool, VenvError> {
  layout.check_owned_dirs()?;

  let venv_dir = layout.venv_dir();
  let removed = remove_path(&venv_dir).map_err(|e| VenvError::Io {
    path: venv_dir.clone(),
    source: e,
  })?;
  if removed {
    info!(path = %venv_dir.display(), "removed environment");
  }
  Ok(removed)
}

/// Run the package's entry-point generator inside the environment.
pub async fn link_commands(layout: &Layout) -> Result<String, VenvError> {
  let venv_dir = layout.venv_dir();
  if !venv_dir.is_dir() {
    return Err(VenvError::Missing { path: venv_dir });
  }

  let links = &layout.manifest.venv.links;
  let program = if links.program.is_absolute() {
    links.program.clone()
  } else {
    venv_dir.join(&links.program)
  };

  run_tool(&program, &links.args, Some(&venv_dir)).await
}

/// Symlink the working copy of the project into the command directory.
///
/// Never overwrites: anything already at the link path is an error.
pub fn dev_link(layout: &Layout) -> Result<PathBuf, VenvError> {
  let project_dir = layout.project_dir();
  let target = dunce::canonicalize(&project_dir).map_err(|_| VenvError::ProjectMissing {
    path: project_dir.clone(),
  })?;
  if !target.is_dir() {
    return Err(VenvError::ProjectMissing { path: project_dir });
  }

  let link = layout.dev_link_path();
  if path_occupied(&link) {
    return Err(VenvError::LinkExists { path: link });
  }

  if let Some(parent) = link.parent() {
    std::fs::create_dir_all(parent).map_err(|e| VenvError::Io {
      path: parent.to_path_buf(),
      source: e,
    })?;
  }

  create_symlink(&target, &link).map_err(|e| VenvError::Io {
    path: link.clone(),
    source: e,
  })?;

  info!(link = %link.display(), target = %target.display(), "linked working copy");
  Ok(link)
}
