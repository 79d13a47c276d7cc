#![cfg(unix)]

use std::fs;

use predicates::prelude::*;
use serial_test::serial;

use super::common::{TestEnv, fake_conda, manifest_with_conda};

fn log_lines(path: &std::path::Path) -> Vec<String> {
  fs::read_to_string(path)
    .unwrap_or_default()
    .lines()
    .map(str::to_string)
    .collect()
}

#[test]
#[serial]
fn venv_runs_conda_then_pip() {
  let env = TestEnv::new();
  let (conda, log) = fake_conda(&env);
  manifest_with_conda(&env, &conda);

  env
    .mbuild_cmd()
    .arg("venv")
    .assert()
    .success()
    .stdout(predicate::str::contains("Creating environment"))
    .stdout(predicate::str::contains("Installing package"))
    .stdout(predicate::str::contains("Environment created"));

  let calls = log_lines(&log);
  assert_eq!(calls.len(), 3);
  assert!(calls[0].starts_with("conda create --copy -p "));
  assert!(calls[1].ends_with("python==3.9.7 -y"));
  assert!(calls[2].starts_with("python -m pip install --no-input "));
  assert!(calls[2].ends_with("@develop"));
}

#[test]
#[serial]
fn venv_is_skipped_when_present() {
  let env = TestEnv::new();
  let (conda, log) = fake_conda(&env);
  manifest_with_conda(&env, &conda);
  fs::create_dir_all(env.path("venv")).unwrap();

  env
    .mbuild_cmd()
    .arg("venv")
    .assert()
    .success()
    .stdout(predicate::str::contains("already exists"));

  assert!(log_lines(&log).is_empty());
}

#[test]
#[serial]
fn venv_fails_when_conda_missing() {
  let env = TestEnv::new();
  env.write_file("mbuild.toml", "[venv]\nconda = \"/nonexistent/conda\"\n");

  env
    .mbuild_cmd()
    .arg("venv")
    .assert()
    .failure()
    .stderr(predicate::str::contains("failed to start"));

  assert!(!env.path("venv").exists());
}

#[test]
#[serial]
fn pinned_revision_required() {
  let env = TestEnv::new();
  env.write_file("mbuild.toml", "[venv]\nrequire_pinned = true\n");

  env
    .mbuild_cmd()
    .arg("venv")
    .assert()
    .failure()
    .stderr(predicate::str::contains("moving reference"));
}

#[test]
#[serial]
fn dev_links_working_copy_and_writes_config() {
  let env = TestEnv::new();
  let (conda, log) = fake_conda(&env);
  manifest_with_conda(&env, &conda);

  env
    .mbuild_cmd()
    .arg("dev")
    .assert()
    .success()
    .stdout(predicate::str::contains("Development environment ready"));

  let link = env.path("venv/lib/python3.9/site-packages/postprocessing_sdk/pp_cmd/monark_processing");
  assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
  assert!(link.join("a.py").is_file());
  assert!(env.path("otl_v1_config.ini").is_file());
  assert!(log_lines(&log).contains(&"pp_sdk createlinks".to_string()));
}

#[test]
#[serial]
fn dev_twice_refuses_to_overwrite_link() {
  let env = TestEnv::new();
  let (conda, _log) = fake_conda(&env);
  manifest_with_conda(&env, &conda);

  env.mbuild_cmd().arg("dev").assert().success();
  env
    .mbuild_cmd()
    .arg("dev")
    .assert()
    .failure()
    .stderr(predicate::str::contains("refusing to overwrite"));
}

#[test]
#[serial]
fn pp_cmd_alias_generates_links() {
  let env = TestEnv::new();
  let (conda, log) = fake_conda(&env);
  manifest_with_conda(&env, &conda);

  env.mbuild_cmd().arg("pp_cmd").assert().success();

  assert!(log_lines(&log).contains(&"pp_sdk createlinks".to_string()));
}
