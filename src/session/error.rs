//! Errors surfaced by the session manager.

use std::path::PathBuf;

use thiserror::Error;

use crate::hir::FrontEndError;
use crate::project::ProjectError;

/// Failures the protocol layer reports to the user.
///
/// Mode-entry failures leave the manager in Explore mode.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("document not open or loaded: {0}")]
    DocumentNotFound(PathBuf),

    #[error("no top-level modules found in {0}")]
    NoTopModules(PathBuf),

    #[error(transparent)]
    BuildFile(#[from] ProjectError),

    #[error(transparent)]
    FrontEnd(#[from] FrontEndError),
}
