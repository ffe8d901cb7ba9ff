//! Core logic for doccgen: run `xcodebuild docbuild` for a scheme, then move
//! the resulting `.doccarchive` out of derived data into the working
//! directory.
//!
//! Each step returns its own error type. [generate] chains them and stops at
//! the first failure; deciding what a failure means for the process is left to
//! the caller.
//!
//! **This crate is not semver compliant**. The version is locked to the root
//! `doccgen` crate version. If you choose to depend directly on this crate, you
//! do so at your own risk of breakage.

mod archive;
mod xcodebuild;

pub use archive::{ArchivePaths, RelocateError};
pub use xcodebuild::{BuildCommand, BuildError, DERIVED_DATA_PATH};

use doccgen_config::Config;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Build documentation for the configured scheme and move the archive to
/// `<working_dir>/<scheme>.doccarchive`. The archive is only looked for if the
/// build succeeds. Return the final path of the archive.
pub fn generate(
    config: &Config,
    working_dir: &Path,
) -> Result<PathBuf, GenerateError> {
    BuildCommand::new(config).run(working_dir)?;

    let paths = ArchivePaths::new(working_dir, &config.scheme);
    let destination = paths.relocate()?.to_owned();

    info!(path = %destination.display(), "Done creating documentation");
    Ok(destination)
}

/// Any error that can stop [generate]
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Relocate(#[from] RelocateError),
}
