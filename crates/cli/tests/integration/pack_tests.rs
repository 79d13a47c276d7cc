use std::fs;

use predicates::prelude::*;

use super::common::{PROJECT, TestEnv};

#[test]
fn build_stages_project_and_docs() {
  let env = TestEnv::new();

  env
    .mbuild_cmd()
    .arg("build")
    .assert()
    .success()
    .stdout(predicate::str::contains("Build complete"));

  assert!(env.path(&format!("make_build/{PROJECT}/a.py")).is_file());
  assert!(env.path(&format!("make_build/{PROJECT}/README.md")).is_file());
}

#[test]
fn build_fails_without_project() {
  let env = TestEnv::empty();

  env
    .mbuild_cmd()
    .arg("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("project directory not found"));
}

#[test]
fn pack_names_archive_after_version_and_branch() {
  let env = TestEnv::new();

  env
    .mbuild_cmd()
    .args(["pack", "--branch", "remotes/origin/feature/login"])
    .assert()
    .success()
    .stdout(predicate::str::contains("monark_processing-0.0.1-feature_login.tar.gz"))
    .stdout(predicate::str::contains("SHA-256"));

  assert_eq!(env.archives(), vec!["monark_processing-0.0.1-feature_login.tar.gz"]);
}

#[test]
fn pack_twice_keeps_single_archive() {
  let env = TestEnv::new();

  for _ in 0..2 {
    env.mbuild_cmd().args(["pack", "--branch", "main"]).assert().success();
  }

  assert_eq!(env.archives(), vec!["monark_processing-0.0.1-main.tar.gz"]);
}

#[test]
fn pack_replaces_legacy_archive() {
  let env = TestEnv::new();
  env.write_file("monark_processing.tar.gz", "legacy");

  env.mbuild_cmd().args(["pack", "--branch", "main"]).assert().success();

  assert_eq!(env.archives(), vec!["monark_processing-0.0.1-main.tar.gz"]);
}

#[test]
fn version_override_from_flag_and_env() {
  let env = TestEnv::new();

  env
    .mbuild_cmd()
    .args(["pack", "--branch", "main", "--set-version", "1.4.0"])
    .assert()
    .success();
  assert_eq!(env.archives(), vec!["monark_processing-1.4.0-main.tar.gz"]);

  env
    .mbuild_cmd()
    .env("MBUILD_VERSION", "2.0.0")
    .env("MBUILD_BRANCH", "develop")
    .arg("pack")
    .assert()
    .success();
  assert_eq!(env.archives(), vec!["monark_processing-2.0.0-develop.tar.gz"]);
}

#[test]
fn invalid_version_is_rejected() {
  let env = TestEnv::new();

  env
    .mbuild_cmd()
    .args(["pack", "--branch", "main", "--set-version", "latest"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid version 'latest'"));

  assert!(env.archives().is_empty());
}

#[test]
fn manifest_version_is_used() {
  let env = TestEnv::new();
  env.write_file("mbuild.toml", "[project]\nversion = \"0.3.0\"\n");

  env.mbuild_cmd().args(["pack", "--branch", "main"]).assert().success();

  assert_eq!(env.archives(), vec!["monark_processing-0.3.0-main.tar.gz"]);
}

#[test]
fn pack_json_output() {
  let env = TestEnv::new();

  let output = env
    .mbuild_cmd()
    .args(["pack", "--branch", "main", "-o", "json"])
    .output()
    .unwrap();

  assert!(output.status.success());
  let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(value["branch"], "main");
  assert_eq!(value["archive"]["file_name"], "monark_processing-0.0.1-main.tar.gz");
  assert_eq!(value["archive"]["sha256"].as_str().unwrap().len(), 64);
}

#[test]
fn branch_override_is_normalised() {
  let env = TestEnv::new();

  env
    .mbuild_cmd()
    .args(["branch", "--branch", "origin/release/1.0"])
    .assert()
    .success()
    .stdout("release_1.0\n");
}

#[test]
fn pack_contents_are_rooted_at_project() {
  let env = TestEnv::new();
  env.mbuild_cmd().args(["pack", "--branch", "main"]).assert().success();

  let file = fs::File::open(env.path("monark_processing-0.0.1-main.tar.gz")).unwrap();
  let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(file));
  let mut files: Vec<String> = archive
    .entries()
    .unwrap()
    .map(|e| e.unwrap())
    .filter(|e| e.header().entry_type().is_file())
    .map(|e| e.path().unwrap().to_string_lossy().replace('\\', "/"))
    .collect();
  files.sort();

  assert_eq!(files, vec!["monark_processing/README.md", "monark_processing/a.py"]);
}

#[test]
fn staging_dir_at_root_is_refused() {
  let env = TestEnv::new();
  env.write_file("mbuild.toml", "[build]\nstaging_dir = \".\"\n");

  env
    .mbuild_cmd()
    .arg("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("build.staging_dir"));

  assert!(env.path("monark_processing/a.py").is_file());
  assert!(env.path("README.md").is_file());
}
