use anyhow::Result;
use serde::Serialize;

use super::Context;
use crate::output::print_json;

#[derive(Serialize)]
struct BranchOutput {
  branch: String,
}

pub fn cmd_branch(ctx: &Context) -> Result<()> {
  let branch = ctx.branch()?;
  if ctx.output.is_json() {
    print_json(&BranchOutput { branch })
  } else {
    println!("{branch}");
    Ok(())
  }
}
