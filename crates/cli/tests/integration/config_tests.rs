use std::fs;

use predicates::prelude::*;

use super::common::TestEnv;

const DEFAULT_CONFIG: &str = "[spark]
base_address = http://localhost
username = admin
password = 12345678

[caching]
login_cache_ttl = 86400
default_request_cache_ttl = 100
default_job_timeout = 100
";

#[test]
fn config_writes_default_template() {
  let env = TestEnv::new();

  env
    .mbuild_cmd()
    .arg("config")
    .assert()
    .success()
    .stdout(predicate::str::contains("Wrote"));

  assert_eq!(fs::read_to_string(env.path("otl_v1_config.ini")).unwrap(), DEFAULT_CONFIG);
}

#[test]
fn config_target_alias_works() {
  let env = TestEnv::new();

  env.mbuild_cmd().arg("otl_v1_config.ini").assert().success();

  assert!(env.path("otl_v1_config.ini").is_file());
}

#[test]
fn config_leaves_existing_file_alone() {
  let env = TestEnv::new();
  env.write_file("otl_v1_config.ini", "[spark]\nbase_address = http://prod\n");

  env
    .mbuild_cmd()
    .arg("config")
    .assert()
    .success()
    .stdout(predicate::str::contains("left unchanged"));

  assert_eq!(
    fs::read_to_string(env.path("otl_v1_config.ini")).unwrap(),
    "[spark]\nbase_address = http://prod\n"
  );
}

#[test]
fn config_honours_manifest_values() {
  let env = TestEnv::new();
  env.write_file(
    "mbuild.toml",
    "[service_config]\npath = \"conf/otl.ini\"\n\n[service_config.caching]\ndefault_job_timeout = 300\n",
  );

  env.mbuild_cmd().arg("config").assert().success();

  let content = fs::read_to_string(env.path("conf/otl.ini")).unwrap();
  assert!(content.contains("default_job_timeout = 300\n"));
  assert!(content.contains("login_cache_ttl = 86400\n"));
}

#[test]
fn malformed_manifest_is_reported() {
  let env = TestEnv::new();
  env.write_file("mbuild.toml", "[project]\nnmae = \"typo\"\n");

  env
    .mbuild_cmd()
    .arg("config")
    .assert()
    .failure()
    .stderr(predicate::str::contains("failed to parse manifest"));
}
