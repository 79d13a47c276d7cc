//! Resolution of every path the orchestrator touches.
//!
//! Manifest paths are relative to the repository root unless absolute.

use std::path::{Path, PathBuf};

use crate::consts::LOCK_FILENAME;
use crate::manifest::{Manifest, ManifestError};

#[derive(Debug, Clone)]
pub struct Layout {
  pub root: PathBuf,
  pub manifest: Manifest,
}

impl Layout {
  pub fn new(root: impl Into<PathBuf>, manifest: Manifest) -> Self {
    Self {
      root: root.into(),
      manifest,
    }
  }

  fn resolve(&self, path: &Path) -> PathBuf {
    if path.is_absolute() {
      path.to_path_buf()
    } else {
      self.root.join(path)
    }
  }

  pub fn project_name(&self) -> &str {
    &self.manifest.project.name
  }

  pub fn version(&self) -> &str {
    &self.manifest.project.version
  }

  /// The project tree being packaged.
  pub fn project_dir(&self) -> PathBuf {
    self.root.join(&self.manifest.project.name)
  }

  pub fn staging_dir(&self) -> PathBuf {
    self.resolve(&self.manifest.build.staging_dir)
  }

  /// The copy of the project inside the staging dir; this is what gets archived.
  pub fn staged_project_dir(&self) -> PathBuf {
    self.staging_dir().join(&self.manifest.project.name)
  }

  pub fn output_dir(&self) -> PathBuf {
    self.resolve(&self.manifest.build.output_dir)
  }

  pub fn venv_dir(&self) -> PathBuf {
    self.resolve(&self.manifest.venv.path)
  }

  pub fn commands_dir(&self) -> PathBuf {
    self.venv_dir().join(&self.manifest.venv.links.commands_dir)
  }

  /// Where `dev` places the symlink to the working copy.
  pub fn dev_link_path(&self) -> PathBuf {
    self.commands_dir().join(&self.manifest.project.name)
  }

  pub fn service_config_path(&self) -> PathBuf {
    self.resolve(&self.manifest.service_config.path)
  }

  /// Refuse layouts whose staging dir or environment would swallow the
  /// root or the project. Called before anything is deleted.
  pub fn check_owned_dirs(&self) -> Result<(), ManifestError> {
    self.manifest.validate_paths(&self.root)
  }

  pub fn lock_path(&self) -> PathBuf {
    self.root.join(LOCK_FILENAME)
  }
}
