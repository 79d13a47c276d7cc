//! External tool invocation for environment provisioning.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, info};

use super::VenvError;

/// Number of trailing stderr lines kept in failure reports.
const STDERR_TAIL_LINES: usize = 20;

/// Run `program` with `args` and wait for it.
///
/// Unlike build actions, tools inherit the caller's environment: conda and
/// pip need PATH, HOME and credentials for the package source.
///
/// Returns the trimmed stdout on success.
pub async fn run_tool<I, S>(program: &Path, args: I, cwd: Option<&Path>) -> Result<String, VenvError>
where
  I: IntoIterator<Item = S>,
  S: AsRef<OsStr>,
{
  let args: Vec<_> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
  let command_line = display_command(program, &args);
  info!(cmd = %command_line, "running tool");

  let mut command = Command::new(program);
  command.args(&args).kill_on_drop(true);
  if let Some(dir) = cwd {
    command.current_dir(dir);
  }

  debug!(cwd = ?cwd, "spawning process");
  let output = command.output().await.map_err(|e| VenvError::Spawn {
    program: PathBuf::from(program),
    source: e,
  })?;

  let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
  let stderr = String::from_utf8_lossy(&output.stderr);

  if !output.status.success() {
    if !stdout.is_empty() {
      debug!(stdout = %stdout, "tool stdout");
    }
    return Err(VenvError::ToolFailed {
      command: command_line,
      code: output.status.code(),
      stderr: tail(&stderr, STDERR_TAIL_LINES),
    });
  }

  if !stdout.is_empty() {
    debug!(stdout = %stdout, "tool output");
  }
  if !stderr.trim().is_empty() {
    debug!(stderr = %stderr.trim(), "tool stderr");
  }

  Ok(stdout)
}

fn display_command(program: &Path, args: &[std::ffi::OsString]) -> String {
  std::iter::once(program.as_os_str())
    .chain(args.iter().map(|a| a.as_os_str()))
    .map(|part| part.to_string_lossy())
    .collect::<Vec<_>>()
    .join(" ")
}

fn tail(text: &str, lines: usize) -> String {
  let all: Vec<&str> = text.trim_end().lines().collect();
  let start = all.len().saturating_sub(lines);
  all[start..].join("\n")
}
