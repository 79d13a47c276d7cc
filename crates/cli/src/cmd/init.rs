//! Implementation of the `mbuild init` command.

use std::path::Path;

use anyhow::{Context, Result};

use monark_build_lib::manifest::init_manifest;

use super::resolve_root;
use crate::output::{print_info, print_success};

/// Write a commented default `mbuild.toml` at the repository root.
///
/// # Errors
///
/// Fails if the manifest already exists.
pub fn cmd_init(root: Option<&Path>) -> Result<()> {
  let root = resolve_root(root)?;
  let path = init_manifest(&root).context("Failed to write manifest")?;

  print_success("Initialized mbuild manifest!");
  print_info(&format!("Manifest: {}", path.display()));
  Ok(())
}
