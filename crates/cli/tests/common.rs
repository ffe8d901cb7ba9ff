#![expect(dead_code)]

use assert_cmd::{Command, cargo::cargo_bin_cmd};
use doccgen_util::{TempDir, build_archive_script, fake_xcode, temp_dir};
use std::{
    fs,
    ops::Deref,
    path::{Path, PathBuf},
};

/// Name of the file where the fake `xcodebuild` records its arguments
const ARGS_FILE: &str = "xcodebuild-args.txt";

/// Get a command to run doccgen. This will also return the working directory
/// it runs in. The configuration variables are cleared so each test sets
/// exactly what it needs.
pub fn doccgen() -> (Command, TempDir) {
    let working_dir = temp_dir();
    let mut command = cargo_bin_cmd!("doccgen_cli");
    command
        .current_dir(working_dir.deref())
        .env_remove("SCHEME")
        .env_remove("XCODE_PATH")
        .env_remove("DESTINATION");
    (command, working_dir)
}

/// What the fake `xcodebuild` should do after recording its arguments
#[derive(Copy, Clone, Debug)]
pub enum Build {
    /// Produce an archive for the scheme and exit successfully
    Success,
    /// Exit successfully without producing anything
    NoArchive,
    /// Produce an archive, but print an error and exit with 65
    Failure,
}

/// Install a fake Xcode under the working directory and point `XCODE_PATH` at
/// it. The fake `xcodebuild` writes its arguments to a file, one per line,
/// then behaves according to `build`.
pub fn install_xcode(
    command: &mut Command,
    working_dir: &Path,
    scheme: &str,
    build: Build,
) -> PathBuf {
    let make_archive = build_archive_script(scheme);
    let behavior = match build {
        Build::Success => make_archive,
        Build::NoArchive => "exit 0".to_owned(),
        Build::Failure => format!(
            "{make_archive}\necho 'error: Scheme {scheme} is not \
            currently configured' >&2\nexit 65"
        ),
    };
    let root = fake_xcode(
        working_dir,
        &format!("printf '%s\\n' \"$@\" > {ARGS_FILE}\n{behavior}"),
    );
    command.env("XCODE_PATH", &root);
    root
}

/// Arguments the fake `xcodebuild` was invoked with, or `None` if it was never
/// invoked
pub fn xcodebuild_args(working_dir: &Path) -> Option<Vec<String>> {
    let content = fs::read_to_string(working_dir.join(ARGS_FILE)).ok()?;
    Some(content.lines().map(String::from).collect())
}

/// Path where a successful run leaves the archive
pub fn final_archive(working_dir: &Path, scheme: &str) -> PathBuf {
    working_dir.join(format!("{scheme}.doccarchive"))
}

/// Path where the build leaves the archive
pub fn built_archive(working_dir: &Path, scheme: &str) -> PathBuf {
    working_dir.join(format!(
        "DerivedData/Build/Products/Debug-iphonesimulator/{scheme}.doccarchive"
    ))
}
