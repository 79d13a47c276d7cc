use anyhow::{Context as _, Result};
use serde::Serialize;

use monark_build_lib::service_config::{EmitOutcome, emit_default_config};

use super::Context;
use crate::output::{print_info, print_json, print_success};

#[derive(Serialize)]
struct ConfigOutput {
  path: std::path::PathBuf,
  outcome: EmitOutcome,
}

pub fn cmd_config(ctx: &Context) -> Result<()> {
  let _lock = ctx.lock("config")?;
  let outcome = emit_config(ctx)?;

  if ctx.output.is_json() {
    return print_json(&ConfigOutput {
      path: ctx.layout.service_config_path(),
      outcome,
    });
  }
  report(ctx, outcome);
  Ok(())
}

pub(super) fn emit_config(ctx: &Context) -> Result<EmitOutcome> {
  let path = ctx.layout.service_config_path();
  let config = ctx.layout.manifest.service_config.to_config();
  emit_default_config(&path, &config).context("Failed to write service config")
}

pub(super) fn report(ctx: &Context, outcome: EmitOutcome) {
  let path = ctx.layout.service_config_path();
  match outcome {
    EmitOutcome::Written => print_success(&format!("Wrote {}", path.display())),
    EmitOutcome::Skipped => print_info(&format!("{} already exists, left unchanged", path.display())),
  }
}
