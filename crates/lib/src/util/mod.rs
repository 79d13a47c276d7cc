//! Shared utilities.
//!
//! Filesystem helpers used by staging, archiving and provisioning, and
//! content hashing for build reports.

pub mod fs;
pub mod hash;

#[cfg(test)]
pub mod testutil;
