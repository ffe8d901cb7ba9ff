//! Run configuration. Everything comes from environment variables, which are
//! read exactly once at startup into a [Config]. From there the config is
//! passed by reference to each step of the pipeline; nothing downstream should
//! touch the environment again.
//!
//! **This crate is not semver compliant**. The version is locked to the root
//! `doccgen` crate version. If you choose to depend directly on this crate, you
//! do so at your own risk of breakage.

use std::{env, ffi::OsString, path::PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Name of the Xcode scheme to build documentation for. Required
pub const SCHEME_ENV_VAR: &str = "SCHEME";
/// Root of the Xcode installation (the `.app` bundle)
pub const XCODE_PATH_ENV_VAR: &str = "XCODE_PATH";
/// Destination descriptor passed to `xcodebuild -destination`
pub const DESTINATION_ENV_VAR: &str = "DESTINATION";

/// Used when `$XCODE_PATH` isn't set
pub const DEFAULT_XCODE_PATH: &str = "/Applications/Xcode.app";
/// Used when `$DESTINATION` isn't set
pub const DEFAULT_DESTINATION: &str = "platform=iOS Simulator,name=iPhone 13";

/// Configuration for a single run. Immutable once resolved
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Scheme to build. Also determines the archive name
    pub scheme: Scheme,
    /// Root of the Xcode installation. The `xcodebuild` executable is found
    /// relative to this
    pub xcode_path: PathBuf,
    /// Build destination, e.g. `platform=iOS Simulator,name=iPhone 13`. This
    /// is passed through as-is; we don't validate the syntax
    pub destination: String,
}

impl Config {
    /// Resolve configuration from the process environment. An empty variable
    /// is treated the same as an unset one. Defaults are logged when applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(|name| env::var_os(name))
    }

    /// Resolve configuration from any variable source. `XCODE_PATH` is taken
    /// as raw bytes since it's a path; the other two must be valid unicode.
    fn resolve(
        lookup: impl Fn(&str) -> Option<OsString>,
    ) -> Result<Self, ConfigError> {
        let var = |name: &'static str| -> Result<Option<String>, ConfigError> {
            non_empty(lookup(name))
                .map(|value| {
                    value
                        .into_string()
                        .map_err(|_| ConfigError::NotUnicode { name })
                })
                .transpose()
        };

        let scheme = var(SCHEME_ENV_VAR)?
            .map(Scheme::from)
            .ok_or(ConfigError::SchemeMissing)?;

        let xcode_path = non_empty(lookup(XCODE_PATH_ENV_VAR))
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                info!(
                    "No Xcode path provided; using {DEFAULT_XCODE_PATH} \
                    (set `${XCODE_PATH_ENV_VAR}` to override)"
                );
                DEFAULT_XCODE_PATH.into()
            });

        let destination = var(DESTINATION_ENV_VAR)?.unwrap_or_else(|| {
            info!(
                "No destination provided; using {DEFAULT_DESTINATION} \
                (set `${DESTINATION_ENV_VAR}` to override)"
            );
            DEFAULT_DESTINATION.into()
        });

        let config = Self {
            scheme,
            xcode_path,
            destination,
        };
        debug!(?config, "Resolved configuration");
        Ok(config)
    }
}

/// Name of an Xcode scheme. The scheme is used both as a build argument and to
/// derive the archive file name, so it gets its own type.
#[derive(
    Clone,
    Debug,
    derive_more::Deref,
    derive_more::Display,
    Eq,
    derive_more::From,
    Hash,
    PartialEq,
)]
#[deref(forward)]
pub struct Scheme(String);

impl From<&str> for Scheme {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

/// Error resolving [Config]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No scheme provided; set `${}`", SCHEME_ENV_VAR)]
    SchemeMissing,

    /// Variable is set, but we need it as a string and it isn't one
    #[error("`${name}` is not valid unicode")]
    NotUnicode { name: &'static str },
}

/// Empty variables count as unset
fn non_empty(value: Option<OsString>) -> Option<OsString> {
    value.filter(|value| !value.is_empty())
}
