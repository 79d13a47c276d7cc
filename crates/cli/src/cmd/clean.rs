//! Implementation of the `mbuild clean*` commands.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use serde::Serialize;

use monark_build_lib::clean::{CleanReport, clean_all, clean_build, clean_pack, clean_venv};

use super::{Context, cmd_clean_test};
use crate::output::{print_info, print_json, print_phase, print_removed, print_success};

#[derive(Debug, Clone, Copy)]
pub enum CleanTarget {
  Build,
  Pack,
  Venv,
  All,
}

impl CleanTarget {
  fn name(self) -> &'static str {
    match self {
      CleanTarget::Build => "clean-build",
      CleanTarget::Pack => "clean-pack",
      CleanTarget::Venv => "clean-venv",
      CleanTarget::All => "clean",
    }
  }
}

#[derive(Serialize)]
struct CleanOutput<'a> {
  removed: &'a [PathBuf],
  /// Test artifacts have no cleanup yet; reported so `clean` lists every step.
  #[serde(skip_serializing_if = "Option::is_none")]
  clean_test: Option<&'static str>,
}

pub fn cmd_clean(ctx: &Context, target: CleanTarget) -> Result<()> {
  let _lock = ctx.lock(target.name())?;
  let json = ctx.output.is_json();

  if !json {
    print_phase(&format!("Running {}", target.name()));
  }

  let layout = &ctx.layout;
  let report: CleanReport = match target {
    CleanTarget::Build => clean_build(layout),
    CleanTarget::Pack => clean_pack(layout),
    CleanTarget::Venv => clean_venv(layout),
    CleanTarget::All => {
      let report = clean_all(layout);
      if !json {
        cmd_clean_test();
      }
      report
    }
  }
  .context("Clean failed")?;

  if json {
    return print_json(&CleanOutput {
      removed: &report.removed,
      clean_test: matches!(target, CleanTarget::All).then_some("placeholder"),
    });
  }

  if report.is_empty() {
    print_info("Nothing to clean.");
  } else {
    for path in &report.removed {
      print_removed(path);
    }
    print_success(&format!("Removed {} item(s)", report.removed.len()));
  }
  Ok(())
}
