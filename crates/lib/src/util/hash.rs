//! SHA-256 fingerprints for build outputs.
//!
//! - `hash_file()`: digest of an archive, printed after `pack`
//! - `hash_tree()`: content digest of a staged project, independent of
//!   timestamps and permissions

use std::fs;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::consts::HASH_DISPLAY_LEN;

/// Full 64-character lowercase hex SHA-256.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(pub String);

impl ContentHash {
  /// Prefix used in human-readable output.
  pub fn short(&self) -> &str {
    let len = self.0.len().min(HASH_DISPLAY_LEN);
    &self.0[..len]
  }
}

impl std::fmt::Display for ContentHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Debug, thiserror::Error)]
pub enum HashError {
  #[error("failed to walk directory: {0}")]
  WalkDir(#[from] walkdir::Error),

  #[error("failed to read {path}: {source}")]
  Read { path: String, source: std::io::Error },
}

/// Hash a file's contents.
pub fn hash_file(path: &Path) -> Result<ContentHash, HashError> {
  let read_err = |e| HashError::Read {
    path: path.display().to_string(),
    source: e,
  };
  let mut file = fs::File::open(path).map_err(read_err)?;

  let mut hasher = Sha256::new();
  let mut buffer = [0u8; 8192];
  loop {
    let bytes_read = file.read(&mut buffer).map_err(read_err)?;
    if bytes_read == 0 {
      break;
    }
    hasher.update(&buffer[..bytes_read]);
  }

  Ok(ContentHash(hex::encode(hasher.finalize())))
}

/// Deterministic digest of a directory tree.
///
/// Covers relative paths, file contents and symlink targets. Entries are
/// visited in file-name order.
pub fn hash_tree(path: &Path) -> Result<ContentHash, HashError> {
  let mut hasher = Sha256::new();

  for entry in WalkDir::new(path).sort_by_file_name() {
    let entry = entry?;
    let rel = entry.path().strip_prefix(path).unwrap_or(entry.path());
    if rel.as_os_str().is_empty() {
      continue;
    }
    // Forward slashes keep the digest identical across platforms.
    let rel = rel.to_string_lossy().replace('\\', "/");

    let file_type = entry.file_type();
    let line = if file_type.is_symlink() {
      let target = fs::read_link(entry.path()).map_err(|e| HashError::Read {
        path: entry.path().display().to_string(),
        source: e,
      })?;
      format!("L:{}:{}", rel, target.to_string_lossy())
    } else if file_type.is_dir() {
      format!("D:{}", rel)
    } else if file_type.is_file() {
      format!("F:{}:{}", rel, hash_file(entry.path())?)
    } else {
      continue;
    };

    hasher.update(line.as_bytes());
    hasher.update(b"\n");
  }

  Ok(ContentHash(hex::encode(hasher.finalize())))
}
