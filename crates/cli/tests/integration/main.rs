//! CLI integration tests for mbuild.

mod common;

mod clean_tests;
mod config_tests;
mod pack_tests;
mod venv_tests;
