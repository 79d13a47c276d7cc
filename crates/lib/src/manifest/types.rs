//! Serde model of `mbuild.toml`.
//!
//! Every section has a complete default so a partially written manifest
//! (or none at all) still describes a buildable project.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::{
  DEFAULT_COMMANDS_DIR, DEFAULT_CONDA, DEFAULT_LINKS_PROGRAM, DEFAULT_PACKAGE_NAME, DEFAULT_PACKAGE_REV,
  DEFAULT_PACKAGE_URL, DEFAULT_PROJECT_NAME, DEFAULT_PYTHON, DEFAULT_SERVICE_CONFIG, DEFAULT_STAGING_DIR,
  DEFAULT_VENV_DIR, DEFAULT_VERSION,
};
use crate::service_config::{CachingSection, ServiceConfig, SparkSection};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
  pub project: ProjectSection,
  pub build: BuildSection,
  pub venv: VenvSection,
  pub service_config: ServiceConfigSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectSection {
  /// Directory name of the project at the repository root.
  pub name: String,
  /// Semantic version embedded in archive names.
  pub version: String,
  /// Extensions of top-level files copied into the staged project root.
  pub docs: Vec<String>,
}

impl Default for ProjectSection {
  fn default() -> Self {
    Self {
      name: DEFAULT_PROJECT_NAME.to_string(),
      version: DEFAULT_VERSION.to_string(),
      docs: vec!["md".to_string()],
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildSection {
  pub staging_dir: PathBuf,
  /// Where archives are written and looked for.
  pub output_dir: PathBuf,
}

impl Default for BuildSection {
  fn default() -> Self {
    Self {
      staging_dir: PathBuf::from(DEFAULT_STAGING_DIR),
      output_dir: PathBuf::from("."),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VenvSection {
  pub path: PathBuf,
  pub conda: String,
  pub python: String,
  /// Refuse to install the package from a branch name.
  pub require_pinned: bool,
  pub package: PackageSection,
  pub links: LinksSection,
}

impl Default for VenvSection {
  fn default() -> Self {
    Self {
      path: PathBuf::from(DEFAULT_VENV_DIR),
      conda: DEFAULT_CONDA.to_string(),
      python: DEFAULT_PYTHON.to_string(),
      require_pinned: false,
      package: PackageSection::default(),
      links: LinksSection::default(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackageSection {
  pub name: String,
  /// pip-compatible VCS url, e.g. `git+ssh://host/org/repo.git`.
  pub url: String,
  pub rev: String,
}

impl PackageSection {
  /// The requirement string handed to pip.
  pub fn requirement(&self) -> String {
    format!("{}@{}", self.url, self.rev)
  }
}

impl Default for PackageSection {
  fn default() -> Self {
    Self {
      name: DEFAULT_PACKAGE_NAME.to_string(),
      url: DEFAULT_PACKAGE_URL.to_string(),
      rev: DEFAULT_PACKAGE_REV.to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinksSection {
  /// Entry-point generator shipped by the package. Relative paths resolve
  /// inside the environment.
  pub program: PathBuf,
  pub args: Vec<String>,
  /// Directory inside the environment where command packages live.
  pub commands_dir: PathBuf,
}

impl Default for LinksSection {
  fn default() -> Self {
    Self {
      program: PathBuf::from(DEFAULT_LINKS_PROGRAM),
      args: vec!["createlinks".to_string()],
      commands_dir: PathBuf::from(DEFAULT_COMMANDS_DIR),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfigSection {
  pub path: PathBuf,
  pub spark: SparkSection,
  pub caching: CachingSection,
}

impl ServiceConfigSection {
  pub fn to_config(&self) -> ServiceConfig {
    ServiceConfig {
      spark: self.spark.clone(),
      caching: self.caching.clone(),
    }
  }
}

impl Default for ServiceConfigSection {
  fn default() -> Self {
    let config = ServiceConfig::default();
    Self {
      path: PathBuf::from(DEFAULT_SERVICE_CONFIG),
      spark: config.spark,
      caching: config.caching,
    }
  }
}
