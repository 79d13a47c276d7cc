//! Staging of the project tree.
//!
//! `stage` produces `<staging>/<project>`: a fresh recursive copy of the
//! project plus the repository's top-level documentation files. The staged
//! copy is what `archive` packs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::layout::Layout;
use crate::manifest::ManifestError;
use crate::util::fs::{CopyError, copy_tree, remove_path};
use crate::util::hash::{ContentHash, HashError, hash_tree};

#[derive(Debug, Error)]
pub enum StageError {
  #[error("project directory not found: {}", path.display())]
  ProjectMissing { path: PathBuf },

  #[error(transparent)]
  UnsafeLayout(#[from] ManifestError),

  #[error("failed to clear staging directory {}: {source}", path.display())]
  Clear { path: PathBuf, source: io::Error },

  #[error("failed to read repository root {}: {source}", path.display())]
  ReadRoot { path: PathBuf, source: io::Error },

  #[error(transparent)]
  Copy(#[from] CopyError),

  #[error("failed to copy {} into staged project: {source}", path.display())]
  CopyDoc { path: PathBuf, source: io::Error },

  #[error("failed to fingerprint staged project: {0}")]
  Hash(#[from] HashError),
}

#[derive(Debug, Serialize)]
pub struct StageResult {
  pub staging_dir: PathBuf,
  pub staged_dir: PathBuf,
  pub files_copied: usize,
  /// Documentation files copied from the repository root, by file name.
  pub docs: Vec<String>,
  /// Content digest of the staged project.
  pub tree_hash: ContentHash,
}

/// Stage the project for packaging.
///
/// Any previous staging directory is removed first, so stale files never
/// leak into an archive.
pub fn stage(layout: &Layout) -> Result<StageResult, StageError> {
  let project_dir = layout.project_dir();
  if !project_dir.is_dir() {
    return Err(StageError::ProjectMissing { path: project_dir });
  }

  layout.check_owned_dirs()?;

  let staging_dir = layout.staging_dir();
  let staged_dir = layout.staged_project_dir();

  if remove_staging(&staging_dir)? {
    debug!(path = %staging_dir.display(), "removed previous staging directory");
  }

  info!(
    project = %project_dir.display(),
    staging = %staging_dir.display(),
    "staging project"
  );
  let files_copied = copy_tree(&project_dir, &staged_dir)?;

  let docs = copy_docs(&layout.root, &staged_dir, &layout.manifest.project.docs)?;
  let tree_hash = hash_tree(&staged_dir)?;

  info!(files = files_copied, docs = docs.len(), hash = %tree_hash.short(), "staged project");

  Ok(StageResult {
    staging_dir,
    staged_dir,
    files_copied,
    docs,
    tree_hash,
  })
}

/// Copy top-level files of `root` whose extension is in `extensions`.
fn copy_docs(root: &Path, staged_dir: &Path, extensions: &[String]) -> Result<Vec<String>, StageError> {
  let entries = fs::read_dir(root).map_err(|e| StageError::ReadRoot {
    path: root.to_path_buf(),
    source: e,
  })?;
  let docs = select_docs(root, entries.map(|entry| entry.map(|e| e.path())), extensions)?;

  let mut copied = Vec::new();
  for path in docs {
    let Some(name) = path.file_name() else {
      continue;
    };

    fs::copy(&path, staged_dir.join(name)).map_err(|e| StageError::CopyDoc {
      path: path.clone(),
      source: e,
    })?;
    copied.push(name.to_string_lossy().to_string());
  }

  copied.sort();
  Ok(copied)
}

/// Documentation files among the entries of `root`. An entry that cannot be
/// read fails the stage instead of being skipped.
fn select_docs(
  root: &Path,
  entries: impl IntoIterator<Item = io::Result<PathBuf>>,
  extensions: &[String],
) -> Result<Vec<PathBuf>, StageError> {
  let mut docs = Vec::new();
  for entry in entries {
    let path = entry.map_err(|e| StageError::ReadRoot {
      path: root.to_path_buf(),
      source: e,
    })?;
    if path.is_file() && is_doc(&path, extensions) {
      docs.push(path);
    }
  }
  Ok(docs)
}

fn is_doc(path: &Path, extensions: &[String]) -> bool {
  path
    .extension()
    .and_then(|ext| ext.to_str())
    .is_some_and(|ext| extensions.iter().any(|e| e == ext))
}

fn remove_staging(staging_dir: &Path) -> Result<bool, StageError> {
  remove_path(staging_dir).map_err(|e| StageError::Clear {
    path: staging_dir.to_path_buf(),
    source: e,
  })
}

/// Remove the staging directory. Returns whether anything was removed.
pub fn clean_staging(layout: &Layout) -> Result<bool, StageError> {
  layout.check_owned_dirs()?;

  let staging_dir = layout.staging_dir();
  let removed = remove_staging(&staging_dir)?;
  if removed {
    info!(path = %staging_dir.display(), "removed staging directory");
  }
  Ok(removed)
}
