//! Locate the archive produced by the build and move it into place

use crate::xcodebuild::DERIVED_DATA_PATH;
use doccgen_config::Scheme;
use std::{
    error::Error,
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{info, warn};

/// Where `xcodebuild` puts products for a Debug simulator build, relative to
/// the derived data directory
const PRODUCTS_PATH: &str = "Build/Products/Debug-iphonesimulator";
/// Extension of a DocC archive bundle
const ARCHIVE_EXTENSION: &str = "doccarchive";

/// Source and destination of the documentation archive for one scheme. Both
/// paths are derived from the scheme name, relative to the working directory.
#[derive(Clone, Debug, PartialEq)]
pub struct ArchivePaths {
    /// Where the build leaves the archive
    pub built: PathBuf,
    /// Where we move it to
    pub destination: PathBuf,
}

impl ArchivePaths {
    pub fn new(working_dir: &Path, scheme: &Scheme) -> Self {
        let file_name = archive_file_name(scheme);
        Self {
            built: working_dir
                .join(DERIVED_DATA_PATH)
                .join(PRODUCTS_PATH)
                .join(&file_name),
            destination: working_dir.join(file_name),
        }
    }

    /// Move the built archive to its destination. The built archive must
    /// exist; if it doesn't, nothing is moved. An archive left at the
    /// destination by a previous run is replaced, but only removed once the
    /// new one is in place. Any error from the rename itself is fatal.
    pub fn relocate(&self) -> Result<&Path, RelocateError> {
        if let Err(error) = fs::symlink_metadata(&self.built) {
            return Err(if error.kind() == io::ErrorKind::NotFound {
                RelocateError::NotFound {
                    path: self.built.clone(),
                    error,
                }
            } else {
                RelocateError::Io {
                    path: self.built.clone(),
                    error,
                }
            });
        }

        let backup = self.set_aside_destination()?;

        info!(
            from = %self.built.display(),
            to = %self.destination.display(),
            "Moving documentation archive",
        );
        if let Err(error) = fs::rename(&self.built, &self.destination) {
            // Put the previous archive back so a failed run loses nothing
            if let Some(backup) = &backup
                && let Err(error) = fs::rename(backup, &self.destination)
            {
                warn!(
                    error = &error as &dyn Error,
                    path = %backup.display(),
                    "Error restoring previous documentation archive",
                );
            }
            return Err(RelocateError::Rename {
                from: self.built.clone(),
                to: self.destination.clone(),
                error,
            });
        }

        if let Some(backup) = backup
            && let Err(error) = remove(&backup)
        {
            // New archive is already in place, so this isn't worth failing
            warn!(
                error = &error as &dyn Error,
                path = %backup.display(),
                "Error removing previous documentation archive",
            );
        }
        Ok(&self.destination)
    }

    /// Path that an existing archive is moved to while the new one replaces it
    fn backup_path(&self) -> PathBuf {
        let mut path = self.destination.clone().into_os_string();
        path.push(".old");
        path.into()
    }

    /// Move a stale archive from a previous run out of the way. Renaming a
    /// directory onto a non-empty directory fails, so this has to go first.
    /// Return where it went, if there was one.
    fn set_aside_destination(&self) -> Result<Option<PathBuf>, RelocateError> {
        match fs::symlink_metadata(&self.destination) {
            Ok(_) => {}
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Ok(None);
            }
            Err(error) => {
                return Err(RelocateError::Io {
                    path: self.destination.clone(),
                    error,
                });
            }
        }

        let backup = self.backup_path();
        warn!(
            path = %self.destination.display(),
            "Replacing existing documentation archive",
        );
        // Leftover from a run that died midway
        match remove(&backup) {
            Ok(()) => {}
            Err(error) if error.kind() == io::ErrorKind::NotFound => {}
            Err(error) => {
                return Err(RelocateError::Io {
                    path: backup,
                    error,
                });
            }
        }
        fs::rename(&self.destination, &backup).map_err(|error| {
            RelocateError::Rename {
                from: self.destination.clone(),
                to: backup.clone(),
                error,
            }
        })?;
        Ok(Some(backup))
    }
}

/// Remove a file or directory tree
fn remove(path: &Path) -> io::Result<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

/// `<scheme>.doccarchive`
fn archive_file_name(scheme: &Scheme) -> String {
    format!("{scheme}.{ARCHIVE_EXTENSION}")
}

/// Error moving the archive into place
#[derive(Debug, Error)]
pub enum RelocateError {
    /// Build succeeded but didn't produce an archive where we expected it
    #[error("Documentation archive not found at `{}`", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        error: io::Error,
    },

    #[error("Error accessing `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        error: io::Error,
    },

    #[error("Error moving `{}` to `{}`", .from.display(), .to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        error: io::Error,
    },
}
