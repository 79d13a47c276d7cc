//! Versioned tarballs of the staged project.
//!
//! The canonical archive name is `<project>-<version>-<branch>.tar.gz`.
//! The unversioned `<project>.tar.gz` produced by older build scripts is
//! deprecated: it is never written, but it still counts as an archive of
//! the project, so `pack` and `clean-pack` remove it.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::consts::ARCHIVE_SUFFIX;
use crate::layout::Layout;
use crate::util::hash::{ContentHash, HashError, hash_file};

#[derive(Debug, Error)]
pub enum ArchiveError {
  #[error("project is not staged: {} does not exist (run build first)", path.display())]
  NotStaged { path: PathBuf },

  #[error("failed to create output directory {}: {source}", path.display())]
  CreateOutputDir { path: PathBuf, source: io::Error },

  #[error("failed to list archives in {}: {source}", path.display())]
  List { path: PathBuf, source: io::Error },

  #[error("failed to remove old archive {}: {source}", path.display())]
  Remove { path: PathBuf, source: io::Error },

  #[error("failed to write archive {}: {source}", path.display())]
  Write { path: PathBuf, source: io::Error },

  #[error("failed to hash archive: {0}")]
  Hash(#[from] HashError),
}

#[derive(Debug, Serialize)]
pub struct ArchiveResult {
  pub path: PathBuf,
  pub file_name: String,
  /// Archives deleted before this one was written.
  pub replaced: Vec<PathBuf>,
  pub size_bytes: u64,
  pub sha256: ContentHash,
}

/// Canonical archive file name.
pub fn archive_name(project: &str, version: &str, branch: &str) -> String {
  format!("{project}-{version}-{branch}{ARCHIVE_SUFFIX}")
}

fn legacy_archive_name(project: &str) -> String {
  format!("{project}{ARCHIVE_SUFFIX}")
}

/// Whether `file_name` is an archive of `project`, canonical or legacy.
pub fn is_project_archive(file_name: &str, project: &str) -> bool {
  if file_name == legacy_archive_name(project) {
    return true;
  }
  file_name
    .strip_prefix(project)
    .and_then(|rest| rest.strip_prefix('-'))
    .is_some_and(|rest| rest.len() > ARCHIVE_SUFFIX.len() && rest.ends_with(ARCHIVE_SUFFIX))
}

/// Prefix of the temporary file a tarball is assembled in.
const PARTIAL_PREFIX: &str = ".mbuild-";

/// Whether `file_name` is a tarball an interrupted `pack` left behind.
fn is_partial_archive(file_name: &str) -> bool {
  file_name
    .strip_prefix(PARTIAL_PREFIX)
    .is_some_and(|rest| rest.len() > ARCHIVE_SUFFIX.len() && rest.ends_with(ARCHIVE_SUFFIX))
}

/// List archives of `project` in `dir`, sorted by name.
pub fn find_archives(dir: &Path, project: &str) -> Result<Vec<PathBuf>, ArchiveError> {
  list_files(dir, |name| is_project_archive(name, project))
}

/// List partial tarballs in `dir`, sorted by name.
pub fn find_partial_archives(dir: &Path) -> Result<Vec<PathBuf>, ArchiveError> {
  list_files(dir, is_partial_archive)
}

fn list_files(dir: &Path, matches: impl Fn(&str) -> bool) -> Result<Vec<PathBuf>, ArchiveError> {
  let entries = match fs::read_dir(dir) {
    Ok(entries) => entries,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
    Err(e) => {
      return Err(ArchiveError::List {
        path: dir.to_path_buf(),
        source: e,
      });
    }
  };

  let mut files: Vec<PathBuf> = entries
    .flatten()
    .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file() || t.is_symlink()))
    .filter(|entry| entry.file_name().to_str().is_some_and(&matches))
    .map(|entry| entry.path())
    .collect();
  files.sort();
  Ok(files)
}

/// Delete every archive of the project in the output directory, along with
/// partial tarballs left by an interrupted `pack`.
pub fn clean_archives(layout: &Layout) -> Result<Vec<PathBuf>, ArchiveError> {
  let output_dir = layout.output_dir();
  let archives = find_archives(&output_dir, layout.project_name())?;
  let partials = find_partial_archives(&output_dir)?;
  let legacy = legacy_archive_name(layout.project_name());

  for path in &archives {
    if path.file_name().is_some_and(|name| name == legacy.as_str()) {
      warn!(path = %path.display(), "removing deprecated unversioned archive");
    }
    remove_archive(path)?;
    info!(path = %path.display(), "removed archive");
  }
  for path in &partials {
    remove_archive(path)?;
    info!(path = %path.display(), "removed partial archive");
  }

  let mut removed = archives;
  removed.extend(partials);
  Ok(removed)
}

fn remove_archive(path: &Path) -> Result<(), ArchiveError> {
  fs::remove_file(path).map_err(|e| ArchiveError::Remove {
    path: path.to_path_buf(),
    source: e,
  })
}

/// Pack the staged project into a fresh archive.
///
/// Existing archives of the project are deleted before the new one is
/// written, so exactly one remains afterwards.
pub fn create_archive(layout: &Layout, branch: &str) -> Result<ArchiveResult, ArchiveError> {
  let staged_dir = layout.staged_project_dir();
  if !staged_dir.is_dir() {
    return Err(ArchiveError::NotStaged { path: staged_dir });
  }

  let output_dir = layout.output_dir();
  fs::create_dir_all(&output_dir).map_err(|e| ArchiveError::CreateOutputDir {
    path: output_dir.clone(),
    source: e,
  })?;

  let replaced = clean_archives(layout)?;

  let file_name = archive_name(layout.project_name(), layout.version(), branch);
  let path = output_dir.join(&file_name);
  info!(archive = %path.display(), "creating archive");

  write_tarball(&staged_dir, layout.project_name(), &output_dir, &path).map_err(|e| ArchiveError::Write {
    path: path.clone(),
    source: e,
  })?;

  let size_bytes = fs::metadata(&path)
    .map_err(|e| ArchiveError::Write {
      path: path.clone(),
      source: e,
    })?
    .len();
  let sha256 = hash_file(&path)?;

  info!(archive = %file_name, size_bytes, sha256 = %sha256.short(), "archive created");

  Ok(ArchiveResult {
    path,
    file_name,
    replaced,
    size_bytes,
    sha256,
  })
}

/// Write `src` as a gzip tarball rooted at `prefix/`.
///
/// The tarball is assembled in a temporary file next to `dest` and moved
/// into place once complete, so an interrupted run never leaves a
/// truncated archive under the final name.
fn write_tarball(src: &Path, prefix: &str, tmp_dir: &Path, dest: &Path) -> io::Result<()> {
  let tmp = tempfile::Builder::new()
    .prefix(PARTIAL_PREFIX)
    .suffix(ARCHIVE_SUFFIX)
    .tempfile_in(tmp_dir)?;

  let encoder = GzEncoder::new(BufWriter::new(tmp.as_file()), Compression::default());
  let mut builder = tar::Builder::new(encoder);
  builder.follow_symlinks(false);
  builder.append_dir_all(prefix, src)?;

  let encoder = builder.into_inner()?;
  let mut writer = encoder.finish()?;
  writer.flush()?;
  drop(writer);

  tmp.persist(dest).map_err(|e| e.error)?;
  debug!(dest = %dest.display(), "archive moved into place");
  Ok(())
}
