//! monark-build-lib: packaging and environment orchestration for Python
//! post-processing commands.
//!
//! The crate turns a declarative `mbuild.toml` into filesystem actions:
//! - `stage` / `archive`: copy the project into a staging dir and pack it
//!   into a versioned, branch-tagged tarball
//! - `venv`: provision an isolated conda environment and link the project
//!   into it for local development
//! - `service_config`: scaffold the runtime configuration file
//! - `clean`: remove everything the above produce

pub mod archive;
pub mod clean;
pub mod consts;
pub mod layout;
pub mod manifest;
pub mod service_config;
pub mod stage;
pub mod util;
pub mod vcs;
pub mod venv;
pub mod workspace_lock;
