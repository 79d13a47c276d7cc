//! Test fixtures for monark-build-lib.

use std::fs;
use std::path::{Path, PathBuf};

use crate::layout::Layout;
use crate::manifest::Manifest;

/// Lay out a minimal repository: `monark_processing/a.py` and `README.md`.
pub fn sample_repo(root: &Path) -> Layout {
  let layout = Layout::new(root, Manifest::default());
  fs::create_dir_all(layout.project_dir()).unwrap();
  fs::write(layout.project_dir().join("a.py"), "print('monark')\n").unwrap();
  fs::write(root.join("README.md"), "# monark\n").unwrap();
  layout
}

/// Lines appended to a fake tool log.
pub fn read_log(path: &Path) -> Vec<String> {
  fs::read_to_string(path)
    .unwrap_or_default()
    .lines()
    .map(str::to_string)
    .collect()
}

/// Shell-script stand-ins for conda, the environment's python and the
/// SDK's entry-point generator. Every invocation is appended to `log`.
#[cfg(unix)]
pub struct FakeTools {
  pub conda: PathBuf,
  pub log: PathBuf,
}

#[cfg(unix)]
impl FakeTools {
  pub fn install(dir: &Path) -> Self {
    let tools = dir.join("fake-tools");
    fs::create_dir_all(&tools).unwrap();
    let log = tools.join("calls.log");
    let log_str = log.display();
    let tools_str = tools.display();

    write_script(
      &tools.join("python"),
      &format!("#!/bin/sh\necho \"python $*\" >> '{log_str}'\n"),
    );
    write_script(
      &tools.join("pp_sdk"),
      &format!(
        "#!/bin/sh\necho \"pp_sdk $*\" >> '{log_str}'\nmkdir -p lib/python3.9/site-packages/postprocessing_sdk/pp_cmd\n"
      ),
    );

    let conda = tools.join("conda");
    write_script(
      &conda,
      &format!(
        r#"#!/bin/sh
echo "conda $*" >> '{log_str}'
case "$1" in
  create)
    mkdir -p "$4/bin"
    cp '{tools_str}/python' '{tools_str}/pp_sdk' "$4/bin/"
    ;;
  install)
    if [ "$4" = "python==fail" ]; then
      echo "PackagesNotFoundError: $4" >&2
      exit 2
    fi
    ;;
esac
"#
      ),
    );

    Self { conda, log }
  }
}

#[cfg(unix)]
fn write_script(path: &Path, content: &str) {
  use std::os::unix::fs::PermissionsExt;

  fs::write(path, content).unwrap();
  fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}
