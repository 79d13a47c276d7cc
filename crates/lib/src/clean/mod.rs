//! Removal of everything the orchestrator produces.
//!
//! Each step is idempotent; `clean_all` is their union.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::archive::{ArchiveError, clean_archives};
use crate::layout::Layout;
use crate::stage::{StageError, clean_staging};
use crate::venv::{VenvError, destroy};

#[derive(Debug, Error)]
pub enum CleanError {
  #[error(transparent)]
  Stage(#[from] StageError),

  #[error(transparent)]
  Archive(#[from] ArchiveError),

  #[error(transparent)]
  Venv(#[from] VenvError),
}

#[derive(Debug, Default, Serialize)]
pub struct CleanReport {
  pub removed: Vec<PathBuf>,
}

impl CleanReport {
  pub fn is_empty(&self) -> bool {
    self.removed.is_empty()
  }
}

pub fn clean_build(layout: &Layout) -> Result<CleanReport, CleanError> {
  let removed = clean_staging(layout)?;
  Ok(CleanReport {
    removed: if removed { vec![layout.staging_dir()] } else { Vec::new() },
  })
}

pub fn clean_pack(layout: &Layout) -> Result<CleanReport, CleanError> {
  Ok(CleanReport {
    removed: clean_archives(layout)?,
  })
}

pub fn clean_venv(layout: &Layout) -> Result<CleanReport, CleanError> {
  let removed = destroy(layout)?;
  Ok(CleanReport {
    removed: if removed { vec![layout.venv_dir()] } else { Vec::new() },
  })
}

/// Remove staging dir, archives and environment.
///
/// Test artifacts have no cleanup step yet, so `clean_test` contributes
/// nothing.
pub fn clean_all(layout: &Layout) -> Result<CleanReport, CleanError> {
  let mut report = CleanReport::default();
  report.removed.extend(clean_build(layout)?.removed);
  report.removed.extend(clean_pack(layout)?.removed);
  report.removed.extend(clean_venv(layout)?.removed);

  info!(removed = report.removed.len(), "clean complete");
  Ok(report)
}
