//! Loading and validation of the `mbuild.toml` build manifest.
//!
//! The manifest is optional: without one, the built-in defaults describe
//! the `monark_processing` project. Values that release automation needs to
//! vary (the version) can be overridden after loading.

mod templates;
mod types;

use std::fs;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::consts::MANIFEST_FILENAME;

pub use templates::MANIFEST_TEMPLATE;
pub use types::{
  BuildSection, LinksSection, Manifest, PackageSection, ProjectSection, ServiceConfigSection, VenvSection,
};

/// Errors that can occur while loading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
  #[error("manifest not found: {}", path.display())]
  NotFound { path: PathBuf },

  #[error("failed to read manifest {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("failed to parse manifest {}: {source}", path.display())]
  Parse { path: PathBuf, source: Box<toml::de::Error> },

  #[error("invalid version '{version}': {source}")]
  InvalidVersion { version: String, source: semver::Error },

  #[error("invalid project name '{0}': must be a single directory name")]
  InvalidProjectName(String),

  #[error(
    "{key} = {:?} would remove the repository root or the project directory; choose a separate directory",
    path.display().to_string()
  )]
  UnsafePath { key: &'static str, path: PathBuf },

  #[error("file already exists: {}", path.display())]
  PathExists { path: PathBuf },

  #[error("failed to write file {}: {source}", path.display())]
  WriteFile { path: PathBuf, source: std::io::Error },
}

/// Locate the manifest to use.
///
/// An explicit path must exist. Otherwise `<root>/mbuild.toml` is used when
/// present, and `None` means "use the defaults".
pub fn find_manifest_path(explicit: Option<&Path>, root: &Path) -> Result<Option<PathBuf>, ManifestError> {
  if let Some(path) = explicit {
    let path = if path.is_absolute() { path.to_path_buf() } else { root.join(path) };
    if path.is_file() {
      return Ok(Some(path));
    }
    return Err(ManifestError::NotFound { path });
  }

  let default = root.join(MANIFEST_FILENAME);
  if default.is_file() { Ok(Some(default)) } else { Ok(None) }
}

impl Manifest {
  /// Parse a manifest from TOML text without validating it.
  pub fn parse(content: &str, origin: &Path) -> Result<Self, ManifestError> {
    toml::from_str(content).map_err(|e| ManifestError::Parse {
      path: origin.to_path_buf(),
      source: Box::new(e),
    })
  }

  /// Read and validate a manifest file.
  pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
    let content = fs::read_to_string(path).map_err(|e| ManifestError::Read {
      path: path.to_path_buf(),
      source: e,
    })?;
    let mut manifest = Self::parse(&content, path)?;
    manifest.validate()?;
    Ok(manifest)
  }

  /// Load the manifest for `root`, falling back to defaults.
  pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self, ManifestError> {
    let manifest = match find_manifest_path(explicit, root)? {
      Some(path) => {
        debug!(path = %path.display(), "loading manifest");
        Self::from_file(&path)?
      }
      None => {
        debug!(root = %root.display(), "no manifest found, using defaults");
        Self::default()
      }
    };
    manifest.validate_paths(root)?;
    Ok(manifest)
  }

  /// Replace the version with an externally supplied one.
  pub fn set_version(&mut self, version: &str) -> Result<(), ManifestError> {
    parse_version(version)?;
    self.project.version = version.to_string();
    Ok(())
  }

  /// Check invariants that serde cannot express and normalise doc extensions.
  pub fn validate(&mut self) -> Result<(), ManifestError> {
    parse_version(&self.project.version)?;

    let name = &self.project.name;
    let mut components = Path::new(name).components();
    let single_normal = matches!(components.next(), Some(Component::Normal(_))) && components.next().is_none();
    if name.is_empty() || !single_normal || name.contains('/') || name.contains('\\') {
      return Err(ManifestError::InvalidProjectName(name.clone()));
    }

    for ext in &mut self.project.docs {
      *ext = ext.trim_start_matches('.').to_string();
    }
    self.project.docs.retain(|ext| !ext.is_empty());

    Ok(())
  }

  /// Check the directories that get deleted wholesale against `root`.
  ///
  /// The staging dir and the environment must not be the root, one of its
  /// ancestors, the project directory or anything inside it. Paths are
  /// compared lexically; symlinks are not followed.
  pub fn validate_paths(&self, root: &Path) -> Result<(), ManifestError> {
    let root = normalize_lexically(root);
    let project = root.join(&self.project.name);

    let owned = [("build.staging_dir", &self.build.staging_dir), ("venv.path", &self.venv.path)];
    for (key, path) in owned {
      let resolved = normalize_lexically(&root.join(path));
      if root.starts_with(&resolved) || resolved.starts_with(&project) {
        return Err(ManifestError::UnsafePath {
          key,
          path: path.clone(),
        });
      }
    }
    Ok(())
  }
}

/// Resolve `.` and `..` components without touching the filesystem.
fn normalize_lexically(path: &Path) -> PathBuf {
  let mut out = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        out.pop();
      }
      other => out.push(other),
    }
  }
  out
}

fn parse_version(version: &str) -> Result<semver::Version, ManifestError> {
  semver::Version::parse(version).map_err(|e| ManifestError::InvalidVersion {
    version: version.to_string(),
    source: e,
  })
}

/// Write the default manifest into `root`.
pub fn init_manifest(root: &Path) -> Result<PathBuf, ManifestError> {
  let path = root.join(MANIFEST_FILENAME);
  if path.exists() {
    return Err(ManifestError::PathExists { path });
  }

  fs::write(&path, MANIFEST_TEMPLATE).map_err(|e| ManifestError::WriteFile {
    path: path.clone(),
    source: e,
  })?;

  Ok(path)
}
