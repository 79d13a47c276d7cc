/// Manifest written by `mbuild init`. Parses to `Manifest::default()`.
pub const MANIFEST_TEMPLATE: &str = r#"# mbuild manifest
#
# Every key is optional; the values below are the built-in defaults.

[project]
# Directory at the repository root that gets packaged.
name = "monark_processing"
# Embedded in archive names. Override per build with --set-version or MBUILD_VERSION.
version = "0.0.1"
# Top-level files with these extensions are copied into the packaged project.
docs = ["md"]

[build]
staging_dir = "make_build"
output_dir = "."

[venv]
path = "venv"
conda = "conda"
python = "3.9.7"
# Reject package revisions that are branch names.
require_pinned = false

[venv.package]
name = "postprocessing_sdk"
url = "git+ssh://git@github.com/ISGNeuroTeam/postprocessing_sdk.git"
# A branch name is not reproducible; prefer a tag or a commit id.
rev = "develop"

[venv.links]
program = "bin/pp_sdk"
args = ["createlinks"]
commands_dir = "lib/python3.9/site-packages/postprocessing_sdk/pp_cmd"

[service_config]
path = "otl_v1_config.ini"

[service_config.spark]
base_address = "http://localhost"
username = "admin"
password = "12345678"

[service_config.caching]
login_cache_ttl = 86400
default_request_cache_ttl = 100
default_job_timeout = 100
"#;
