use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn clean_removes_build_archive_and_venv() {
  let env = TestEnv::new();
  env.mbuild_cmd().args(["pack", "--branch", "main"]).assert().success();
  std::fs::create_dir_all(env.path("venv/bin")).unwrap();

  env
    .mbuild_cmd()
    .arg("clean")
    .assert()
    .success()
    .stdout(predicate::str::contains("Removed 3 item(s)"))
    .stdout(predicate::str::contains("Clean tests"));

  assert!(!env.path("make_build").exists());
  assert!(!env.path("venv").exists());
  assert!(env.archives().is_empty());
  assert!(env.path("monark_processing/a.py").exists());
}

#[test]
fn clean_twice_is_idempotent() {
  let env = TestEnv::new();
  env.mbuild_cmd().arg("build").assert().success();

  env.mbuild_cmd().arg("clean").assert().success();
  env
    .mbuild_cmd()
    .arg("clean")
    .assert()
    .success()
    .stdout(predicate::str::contains("Nothing to clean"));
}

#[test]
fn clean_pack_only_touches_archives() {
  let env = TestEnv::new();
  env.mbuild_cmd().args(["pack", "--branch", "main"]).assert().success();

  env.mbuild_cmd().arg("clean_pack").assert().success();

  assert!(env.archives().is_empty());
  assert!(env.path("make_build/monark_processing").is_dir());
}

#[test]
fn clean_build_only_touches_staging() {
  let env = TestEnv::new();
  env.mbuild_cmd().args(["pack", "--branch", "main"]).assert().success();

  env.mbuild_cmd().arg("clean-build").assert().success();

  assert!(!env.path("make_build").exists());
  assert_eq!(env.archives().len(), 1);
}

#[test]
fn clean_venv_on_missing_env_succeeds() {
  let env = TestEnv::empty();

  env.mbuild_cmd().arg("clean_venv").assert().success();
}

#[test]
fn clean_json_lists_removed_paths() {
  let env = TestEnv::new();
  env.mbuild_cmd().arg("build").assert().success();

  env
    .mbuild_cmd()
    .args(["clean-build", "-o", "json"])
    .assert()
    .success()
    .stdout(predicate::str::contains("\"removed\""))
    .stdout(predicate::str::contains("make_build"));
}

#[test]
fn clean_json_reports_test_step() {
  let env = TestEnv::new();
  env.mbuild_cmd().arg("build").assert().success();

  env
    .mbuild_cmd()
    .args(["clean", "-o", "json"])
    .assert()
    .success()
    .stdout(predicate::str::contains("\"clean_test\": \"placeholder\""))
    .stdout(predicate::str::contains("Clean tests").not());
}

#[test]
fn clean_build_json_has_no_test_step() {
  let env = TestEnv::new();

  env
    .mbuild_cmd()
    .args(["clean-build", "-o", "json"])
    .assert()
    .success()
    .stdout(predicate::str::contains("clean_test").not());
}

#[test]
fn clean_removes_interrupted_pack_leftovers() {
  let env = TestEnv::new();
  env.write_file(".mbuild-k3j2h1.tar.gz", "partial");

  env.mbuild_cmd().arg("clean_pack").assert().success();

  assert!(!env.path(".mbuild-k3j2h1.tar.gz").exists());
}
