//! Branch identifier resolution.
//!
//! The branch token ends up in archive file names, so it must be a single
//! filesystem-safe component. Resolution mirrors `git name-rev HEAD`: a
//! symbolic HEAD gives its branch name, a detached HEAD is named after a
//! reference pointing at the same commit. When no reference matches, the
//! caller has to supply the branch explicitly.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum BranchError {
  #[error("no git repository found at or above {}: {source}", path.display())]
  Discover {
    path: PathBuf,
    #[source]
    source: Box<gix::discover::Error>,
  },

  #[error("failed to resolve HEAD: {0}")]
  ResolveHead(String),

  #[error("failed to list references: {0}")]
  References(String),

  #[error("HEAD at {commit} is detached and no branch or tag points at it; pass --branch to name the build")]
  Detached { commit: String },

  #[error("branch name is empty after normalisation: '{0}'")]
  Empty(String),
}

/// Turn a `git name-rev` style name into a filesystem-safe token.
///
/// `remotes/origin/` and `origin/` prefixes are dropped, remaining path
/// separators become underscores.
pub fn normalize_branch(name: &str) -> String {
  let name = name.trim();
  let name = name
    .strip_prefix("remotes/origin/")
    .or_else(|| name.strip_prefix("origin/"))
    .unwrap_or(name);
  name.replace('/', "_")
}

/// Resolve the branch token for the repository containing `root`.
///
/// An override short-circuits git entirely.
pub fn resolve_branch(root: &Path, override_branch: Option<&str>) -> Result<String, BranchError> {
  let raw = match override_branch {
    Some(branch) => {
      debug!(branch, "using branch override");
      branch.to_string()
    }
    None => symbolic_name(root)?,
  };

  let token = normalize_branch(&raw);
  if token.is_empty() {
    return Err(BranchError::Empty(raw));
  }
  Ok(token)
}

/// Name of the current commit as `git name-rev` would print it.
fn symbolic_name(root: &Path) -> Result<String, BranchError> {
  let repo = gix::discover(root).map_err(|e| BranchError::Discover {
    path: root.to_path_buf(),
    source: Box::new(e),
  })?;

  let head_name = repo.head_name().map_err(|e| BranchError::ResolveHead(e.to_string()))?;
  if let Some(name) = head_name {
    let short = name.shorten().to_string();
    debug!(branch = %short, "HEAD is symbolic");
    return Ok(short);
  }

  let head_id = repo
    .head_id()
    .map_err(|e| BranchError::ResolveHead(e.to_string()))?
    .detach();

  let platform = repo.references().map_err(|e| BranchError::References(e.to_string()))?;
  let mut candidates = Vec::new();
  let groups = [
    platform.local_branches(),
    platform.remote_branches(),
    platform.tags(),
  ];
  for group in groups {
    let iter = group.map_err(|e| BranchError::References(e.to_string()))?;
    for reference in iter {
      let reference = reference.map_err(|e| BranchError::References(e.to_string()))?;
      let points_at_head = reference.target().try_id().is_some_and(|id| id.to_owned() == head_id);
      if points_at_head {
        candidates.push(reference.name().as_bstr().to_string());
      }
    }
  }

  match pick_name_rev(candidates.iter().map(String::as_str)) {
    Some(name) => {
      debug!(branch = %name, commit = %head_id, "named detached HEAD");
      Ok(name)
    }
    None => Err(BranchError::Detached {
      commit: head_id.to_string(),
    }),
  }
}

/// Convert a full reference name to the form `git name-rev` prints.
fn name_rev_form(full_name: &str) -> Option<String> {
  if let Some(rest) = full_name.strip_prefix("refs/heads/") {
    return Some(rest.to_string());
  }
  if let Some(rest) = full_name.strip_prefix("refs/remotes/") {
    if rest.ends_with("/HEAD") {
      return None;
    }
    return Some(format!("remotes/{rest}"));
  }
  full_name.strip_prefix("refs/tags/").map(|rest| format!("tags/{rest}"))
}

/// Pick the preferred name among references pointing at HEAD.
///
/// Local branches win over remote-tracking branches, which win over tags.
/// Ties keep the first candidate seen.
fn pick_name_rev<'a>(candidates: impl IntoIterator<Item = &'a str>) -> Option<String> {
  let rank = |name: &str| {
    if name.starts_with("refs/heads/") {
      0
    } else if name.starts_with("refs/remotes/") {
      1
    } else {
      2
    }
  };

  candidates
    .into_iter()
    .filter_map(|full| name_rev_form(full).map(|short| (rank(full), short)))
    .min_by_key(|(rank, _)| *rank)
    .map(|(_, short)| short)
}
