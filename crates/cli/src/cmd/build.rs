//! Implementation of the `mbuild build` and `mbuild pack` commands.

use std::time::Instant;

use anyhow::{Context as _, Result};
use serde::Serialize;

use monark_build_lib::archive::{ArchiveResult, create_archive};
use monark_build_lib::stage::{StageResult, stage};

use super::Context;
use crate::output::{format_bytes, format_elapsed, print_json, print_phase, print_removed, print_stat, print_success};

pub fn cmd_build(ctx: &Context) -> Result<()> {
  let _lock = ctx.lock("build")?;

  if !ctx.output.is_json() {
    print_phase(&format!("Staging {}", ctx.layout.project_name()));
  }
  let staged = stage(&ctx.layout).context("Build failed")?;

  if ctx.output.is_json() {
    return print_json(&staged);
  }
  print_stage(&staged);
  print_success("Build complete!");
  Ok(())
}

#[derive(Serialize)]
struct PackOutput<'a> {
  branch: &'a str,
  version: &'a str,
  stage: &'a StageResult,
  archive: &'a ArchiveResult,
}

/// Stage, then replace any previous archive with a fresh one.
///
/// The branch is resolved before anything is touched, so a detached HEAD
/// without `--branch` fails without side effects.
pub fn cmd_pack(ctx: &Context) -> Result<()> {
  let start = Instant::now();
  let _lock = ctx.lock("pack")?;
  let json = ctx.output.is_json();

  let branch = ctx.branch()?;

  if !json {
    print_phase(&format!("Staging {}", ctx.layout.project_name()));
  }
  let staged = stage(&ctx.layout).context("Build failed")?;
  if !json {
    print_stage(&staged);
    print_phase(&format!("Packing {} ({})", ctx.layout.version(), branch));
  }

  let archive = create_archive(&ctx.layout, &branch).context("Pack failed")?;

  if json {
    return print_json(&PackOutput {
      branch: &branch,
      version: ctx.layout.version(),
      stage: &staged,
      archive: &archive,
    });
  }

  for old in &archive.replaced {
    print_removed(old);
  }
  print_success(&format!("Created {}", archive.file_name));
  print_stat("Path", &archive.path.display().to_string());
  print_stat("Size", &format_bytes(archive.size_bytes));
  print_stat("SHA-256", &archive.sha256.to_string());
  print_stat("Duration", &format_elapsed(start.elapsed()));
  Ok(())
}

fn print_stage(staged: &StageResult) {
  print_stat("Staged", &staged.staged_dir.display().to_string());
  print_stat("Files", &staged.files_copied.to_string());
  if !staged.docs.is_empty() {
    print_stat("Docs", &staged.docs.join(", "));
  }
  print_stat("Tree hash", staged.tree_hash.short());
}
