//! Shared test helpers for CLI integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

pub const PROJECT: &str = "monark_processing";

/// Isolated repository checkout.
///
/// Each test gets a temporary root holding `monark_processing/a.py` and
/// `README.md`, matching the layout the default manifest expects.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    let env = Self::empty();
    env.write_file(&format!("{PROJECT}/a.py"), "print('monark')\n");
    env.write_file("README.md", "# monark\n");
    env
  }

  /// A root without a project directory.
  pub fn empty() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  pub fn root(&self) -> &Path {
    self.temp.path()
  }

  pub fn path(&self, relative: &str) -> PathBuf {
    self.temp.path().join(relative)
  }

  /// Write a file relative to the root, creating parents.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.path(relative_path);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
  }

  /// Names of project archives in the root, sorted.
  pub fn archives(&self) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(self.root())
      .unwrap()
      .flatten()
      .map(|e| e.file_name().to_string_lossy().to_string())
      .filter(|name| name.starts_with(PROJECT) && name.ends_with(".tar.gz"))
      .collect();
    names.sort();
    names
  }

  /// A Command for the mbuild binary, run from the root.
  ///
  /// Inherited `MBUILD_*` variables are cleared so the host environment
  /// cannot leak into a test.
  pub fn mbuild_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("mbuild");
    cmd.current_dir(self.root());
    for var in ["MBUILD_ROOT", "MBUILD_MANIFEST", "MBUILD_VERSION", "MBUILD_BRANCH", "RUST_LOG"] {
      cmd.env_remove(var);
    }
    cmd
  }
}

/// Install shell-script stand-ins for conda, python and the SDK link tool.
///
/// Returns the fake conda path and the log every fake appends to.
#[cfg(unix)]
pub fn fake_conda(env: &TestEnv) -> (PathBuf, PathBuf) {
  use std::os::unix::fs::PermissionsExt;

  let tools = env.path("fake-tools");
  fs::create_dir_all(&tools).unwrap();
  let log = tools.join("calls.log");
  let log_str = log.display();
  let tools_str = tools.display();

  let scripts = [
    ("python", format!("#!/bin/sh\necho \"python $*\" >> '{log_str}'\n")),
    (
      "pp_sdk",
      format!(
        "#!/bin/sh\necho \"pp_sdk $*\" >> '{log_str}'\nmkdir -p lib/python3.9/site-packages/postprocessing_sdk/pp_cmd\n"
      ),
    ),
    (
      "conda",
      format!(
        "#!/bin/sh\necho \"conda $*\" >> '{log_str}'\nif [ \"$1\" = create ]; then\n  mkdir -p \"$4/bin\"\n  cp '{tools_str}/python' '{tools_str}/pp_sdk' \"$4/bin/\"\nfi\n"
      ),
    ),
  ];

  for (name, content) in scripts {
    let path = tools.join(name);
    fs::write(&path, content).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
  }

  (tools.join("conda"), log)
}

/// Point the manifest at a fake conda.
#[cfg(unix)]
pub fn manifest_with_conda(env: &TestEnv, conda: &Path) {
  env.write_file("mbuild.toml", &format!("[venv]\nconda = \"{}\"\n", conda.display()));
}
