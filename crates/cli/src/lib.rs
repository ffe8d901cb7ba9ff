#![forbid(unsafe_code)]
#![deny(clippy::all)]

//! Command line interface for doccgen.
//!
//! **This crate is not semver compliant**. The version is locked to the root
//! `doccgen` crate version. If you choose to depend directly on this crate, you
//! do so at your own risk of breakage.

mod util;

pub use util::print_error;

use anyhow::Context;
use clap::Parser;
use doccgen_config::Config;
use std::env;
use tracing::debug;

const COMMAND_NAME: &str = "doccgen";

/// Generate a DocC documentation archive for an Xcode scheme
#[derive(Debug, Parser)]
#[clap(
    author,
    version,
    about,
    name = COMMAND_NAME,
    long_about = "Generate a DocC documentation archive for an Xcode scheme.

Runs `xcodebuild docbuild` with derived data in `./DerivedData`, then moves \
the resulting archive to `./<SCHEME>.doccarchive`.

All configuration is read from the environment:

  SCHEME       Scheme to document (required)
  XCODE_PATH   Xcode installation [default: /Applications/Xcode.app]
  DESTINATION  Build destination \
[default: platform=iOS Simulator,name=iPhone 13]

Set RUST_LOG to control log verbosity (default: info)."
)]
pub struct Args {}

impl Args {
    /// Alias for [clap::Parser::parse]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Resolve configuration, build, and relocate the archive. Everything
    /// happens relative to the current directory.
    pub fn execute(self) -> anyhow::Result<()> {
        let config = Config::from_env()?;
        let working_dir = env::current_dir()
            .context("Error getting current directory")?;
        debug!(
            working_dir = %working_dir.display(),
            "Generating documentation"
        );
        doccgen_core::generate(&config, &working_dir)?;
        Ok(())
    }
}
