//! Common utilities that aren't specific to one other subcrate. Logging setup
//! and error tracing live here so the config, core, and CLI crates all report
//! things the same way.
//!
//! **This crate is not semver compliant**. The version is locked to the root
//! `doccgen` crate version. If you choose to depend directly on this crate, you
//! do so at your own risk of breakage.

#[cfg(any(test, feature = "test"))]
mod test_util;

#[cfg(any(test, feature = "test"))]
pub use test_util::*;

use anyhow::Context;
use std::{
    error::Error,
    io::{self, IsTerminal},
    ops::Deref,
};
use tracing::error;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, prelude::*};

/// Extension trait for results whose error derefs to a boxed std error, e.g.
/// `anyhow::Result`
pub trait ResultTraced<T, E>: Sized {
    /// If this is an error, trace it. Return the same result.
    #[must_use]
    fn traced(self) -> Self;
}

impl<T, E> ResultTraced<T, E> for Result<T, E>
where
    E: Deref<Target = dyn Error + Send + Sync>,
{
    fn traced(self) -> Self {
        self.inspect_err(|err| error!(error = err.deref()))
    }
}

/// Set up tracing to log to stderr. Stdout is left alone so it stays clean for
/// anything downstream of us. The filter is read from `RUST_LOG`, and defaults
/// to `info` so the default substitutions and the build command line are
/// always visible. Colors are only used when stderr is a terminal.
pub fn initialize_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()
        .context("Error parsing `RUST_LOG`")?;
    let stderr_subscriber = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .with_filter(filter);
    tracing_subscriber::registry()
        .with(stderr_subscriber)
        .try_init()
        .context("Error initializing logging")
}
