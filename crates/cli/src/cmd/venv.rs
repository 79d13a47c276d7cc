//! Implementation of the environment commands: `venv`, `pp-cmd` and `dev`.

use anyhow::{Context as _, Result};
use serde::Serialize;

use monark_build_lib::service_config::EmitOutcome;
use monark_build_lib::venv::{Provisioned, create, dev_link, link_commands};

use super::config::{emit_config, report};
use super::{Context, block_on};
use crate::output::{print_info, print_json, print_phase, print_stat, print_success};

#[derive(Serialize)]
struct VenvOutput {
  path: std::path::PathBuf,
  outcome: Provisioned,
}

#[derive(Serialize)]
struct DevOutput {
  venv: Provisioned,
  config: EmitOutcome,
  link: std::path::PathBuf,
}

pub fn cmd_venv(ctx: &Context, force: bool) -> Result<()> {
  let _lock = ctx.lock("venv")?;
  let outcome = provision(ctx, force)?;

  if ctx.output.is_json() {
    return print_json(&VenvOutput {
      path: ctx.layout.venv_dir(),
      outcome,
    });
  }
  Ok(())
}

pub fn cmd_pp_cmd(ctx: &Context) -> Result<()> {
  let _lock = ctx.lock("pp-cmd")?;
  let outcome = provision(ctx, false)?;
  generate_links(ctx)?;

  if ctx.output.is_json() {
    return print_json(&VenvOutput {
      path: ctx.layout.venv_dir(),
      outcome,
    });
  }
  Ok(())
}

/// Environment, entry points, service config, then the working-copy link.
pub fn cmd_dev(ctx: &Context) -> Result<()> {
  let _lock = ctx.lock("dev")?;
  let json = ctx.output.is_json();

  let venv = provision(ctx, false)?;
  generate_links(ctx)?;

  let config = emit_config(ctx)?;
  if !json {
    report(ctx, config);
    print_phase("Linking working copy");
  }

  let link = dev_link(&ctx.layout).context("Failed to link working copy")?;

  if json {
    return print_json(&DevOutput { venv, config, link });
  }
  print_success("Development environment ready!");
  print_stat("Link", &link.display().to_string());
  print_stat("Target", &ctx.layout.project_dir().display().to_string());
  Ok(())
}

fn provision(ctx: &Context, force: bool) -> Result<Provisioned> {
  let json = ctx.output.is_json();
  let venv_dir = ctx.layout.venv_dir();

  let outcome = block_on(create(&ctx.layout, force, |phase| {
    if !json {
      print_phase(&phase.to_string());
    }
  }))?
  .context("Failed to create environment")?;

  if !json {
    match outcome {
      Provisioned::Created => print_success(&format!("Environment created at {}", venv_dir.display())),
      Provisioned::AlreadyPresent => print_info(&format!(
        "Environment already exists at {} (use `venv --force` to rebuild)",
        venv_dir.display()
      )),
    }
  }
  Ok(outcome)
}

fn generate_links(ctx: &Context) -> Result<()> {
  if !ctx.output.is_json() {
    print_phase("Generating command entry points");
  }
  block_on(link_commands(&ctx.layout))?.context("Failed to generate command entry points")?;
  Ok(())
}
