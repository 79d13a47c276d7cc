//! Filesystem helpers.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, thiserror::Error)]
pub enum CopyError {
  #[error("failed to walk {}: {source}", path.display())]
  Walk { path: PathBuf, source: walkdir::Error },

  #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
  Copy {
    from: PathBuf,
    to: PathBuf,
    source: io::Error,
  },
}

/// Recursively copy `src` into `dst`, creating `dst`.
///
/// Symlinks are recreated rather than followed. Returns the number of
/// files and symlinks copied.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<usize, CopyError> {
  let mut copied = 0;

  for entry in WalkDir::new(src).sort_by_file_name() {
    let entry = entry.map_err(|e| CopyError::Walk {
      path: src.to_path_buf(),
      source: e,
    })?;
    let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
    let target = dst.join(rel);
    let copy_err = |e| CopyError::Copy {
      from: entry.path().to_path_buf(),
      to: target.clone(),
      source: e,
    };

    let file_type = entry.file_type();
    if file_type.is_dir() {
      fs::create_dir_all(&target).map_err(copy_err)?;
    } else if file_type.is_symlink() {
      let link_target = fs::read_link(entry.path()).map_err(copy_err)?;
      create_symlink(&link_target, &target).map_err(copy_err)?;
      copied += 1;
    } else {
      fs::copy(entry.path(), &target).map_err(copy_err)?;
      copied += 1;
    }
  }

  debug!(src = %src.display(), dst = %dst.display(), copied, "copied tree");
  Ok(copied)
}

/// Remove a file, symlink or directory tree.
///
/// Returns `false` when nothing existed at `path`.
pub fn remove_path(path: &Path) -> io::Result<bool> {
  let metadata = match fs::symlink_metadata(path) {
    Ok(m) => m,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
    Err(e) => return Err(e),
  };

  if metadata.is_dir() {
    fs::remove_dir_all(path)?;
  } else {
    fs::remove_file(path)?;
  }
  Ok(true)
}

/// Whether anything, including a dangling symlink, exists at `path`.
pub fn path_occupied(path: &Path) -> bool {
  fs::symlink_metadata(path).is_ok()
}

/// Cross-platform symlink creation.
pub fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
  #[cfg(unix)]
  {
    std::os::unix::fs::symlink(target, link)
  }
  #[cfg(windows)]
  {
    let resolved = link.parent().map(|p| p.join(target)).unwrap_or_else(|| target.to_path_buf());
    if resolved.is_dir() {
      std::os::windows::fs::symlink_dir(target, link)
    } else {
      std::os::windows::fs::symlink_file(target, link)
    }
  }
}
