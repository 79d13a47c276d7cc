/// Default manifest file name, looked up at the repository root.
pub const MANIFEST_FILENAME: &str = "mbuild.toml";

/// Advisory lock held by mutating commands.
pub const LOCK_FILENAME: &str = ".mbuild.lock";

/// Suffix of every archive the orchestrator produces.
pub const ARCHIVE_SUFFIX: &str = ".tar.gz";

pub const DEFAULT_PROJECT_NAME: &str = "monark_processing";
pub const DEFAULT_VERSION: &str = "0.0.1";
pub const DEFAULT_STAGING_DIR: &str = "make_build";
pub const DEFAULT_VENV_DIR: &str = "venv";
pub const DEFAULT_CONDA: &str = "conda";
pub const DEFAULT_PYTHON: &str = "3.9.7";

pub const DEFAULT_PACKAGE_NAME: &str = "postprocessing_sdk";
pub const DEFAULT_PACKAGE_URL: &str = "git+ssh://git@github.com/ISGNeuroTeam/postprocessing_sdk.git";
pub const DEFAULT_PACKAGE_REV: &str = "develop";

pub const DEFAULT_LINKS_PROGRAM: &str = "bin/pp_sdk";
pub const DEFAULT_COMMANDS_DIR: &str = "lib/python3.9/site-packages/postprocessing_sdk/pp_cmd";

pub const DEFAULT_SERVICE_CONFIG: &str = "otl_v1_config.ini";

/// Length of the hash prefix shown in human-readable output.
pub const HASH_DISPLAY_LEN: usize = 12;
