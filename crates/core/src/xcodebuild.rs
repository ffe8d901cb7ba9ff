//! Invoke `xcodebuild` to generate a documentation archive

use doccgen_config::Config;
use itertools::Itertools;
use std::{
    fmt::{self, Display},
    io,
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};
use thiserror::Error;
use tracing::{debug, debug_span, info};

/// Location of the `xcodebuild` executable, relative to the Xcode root
const XCODEBUILD_PATH: &str = "Contents/Developer/usr/bin/xcodebuild";
/// Scratch directory for build products, relative to the working directory
pub const DERIVED_DATA_PATH: &str = "DerivedData";

/// A fully resolved `xcodebuild docbuild` invocation. This is built from the
/// config without touching the system, so what gets logged is exactly what
/// gets run.
#[derive(Clone, Debug, PartialEq)]
pub struct BuildCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl BuildCommand {
    pub fn new(config: &Config) -> Self {
        let program = config.xcode_path.join(XCODEBUILD_PATH);
        let args = vec![
            "docbuild".to_owned(),
            "-scheme".to_owned(),
            config.scheme.to_string(),
            "-derivedDataPath".to_owned(),
            DERIVED_DATA_PATH.to_owned(),
            "-destination".to_owned(),
            config.destination.clone(),
        ];
        Self { program, args }
    }

    /// Path to the `xcodebuild` executable
    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Run the build in the given directory, blocking until it exits. Stdout
    /// and stderr are both captured; stderr is attached to the error if the
    /// build fails.
    pub fn run(&self, working_dir: &Path) -> Result<(), BuildError> {
        let _span = debug_span!("xcodebuild", ?working_dir).entered();
        info!("Running {self}");

        let output = Command::new(&self.program)
            .args(&self.args)
            .current_dir(working_dir)
            .output()
            .map_err(|error| BuildError::Spawn {
                command: self.to_string(),
                error,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            debug!(%stdout, "Build output");
            return Err(BuildError::Failed {
                command: self.to_string(),
                status: output.status,
                stderr: stderr.trim().to_owned(),
            });
        }

        debug!(%stdout, %stderr, "Build success");
        Ok(())
    }
}

/// Space-separated command line, as it would be typed. Arguments are not
/// quoted, so this is for logging only.
impl Display for BuildCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        if !self.args.is_empty() {
            write!(f, " {}", self.args.iter().format(" "))?;
        }
        Ok(())
    }
}

/// Error running `xcodebuild`
#[derive(Debug, Error)]
pub enum BuildError {
    /// Process couldn't be started at all, e.g. the executable is missing
    #[error("Error executing `{command}`")]
    Spawn {
        command: String,
        #[source]
        error: io::Error,
    },

    /// Process ran but exited unsuccessfully
    #[error("`{command}` failed with {status}{}", stderr_suffix(.stderr))]
    Failed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(":\n{stderr}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doccgen_config::{DEFAULT_DESTINATION, DEFAULT_XCODE_PATH};
    #[cfg(unix)]
    use doccgen_util::fake_xcode;
    use doccgen_util::{TempDir, assert_err, temp_dir};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    #[cfg(unix)]
    use std::fs;

    fn config(xcode_path: &str, destination: &str) -> Config {
        Config {
            scheme: "Foo".into(),
            xcode_path: xcode_path.into(),
            destination: destination.into(),
        }
    }

    #[rstest]
    #[case::defaults(
        DEFAULT_XCODE_PATH,
        DEFAULT_DESTINATION,
        "/Applications/Xcode.app/Contents/Developer/usr/bin/xcodebuild \
        docbuild -scheme Foo -derivedDataPath DerivedData \
        -destination platform=iOS Simulator,name=iPhone 13"
    )]
    #[case::custom(
        "/opt/Xcode-beta.app",
        "platform=macOS",
        "/opt/Xcode-beta.app/Contents/Developer/usr/bin/xcodebuild \
        docbuild -scheme Foo -derivedDataPath DerivedData \
        -destination platform=macOS"
    )]
    fn test_command_line(
        #[case] xcode_path: &str,
        #[case] destination: &str,
        #[case] expected: &str,
    ) {
        let command = BuildCommand::new(&config(xcode_path, destination));
        assert_eq!(command.to_string(), expected);
    }

    /// The destination stays a single argument even though it has spaces
    #[test]
    fn test_args() {
        let command =
            BuildCommand::new(&config(DEFAULT_XCODE_PATH, DEFAULT_DESTINATION));
        assert_eq!(
            command.program(),
            Path::new(
                "/Applications/Xcode.app/Contents/Developer/usr/bin/xcodebuild"
            )
        );
        assert_eq!(
            command.args(),
            [
                "docbuild",
                "-scheme",
                "Foo",
                "-derivedDataPath",
                "DerivedData",
                "-destination",
                "platform=iOS Simulator,name=iPhone 13",
            ]
        );
    }

    /// Arguments reach the process intact, and it runs in the working dir
    #[cfg(unix)]
    #[rstest]
    fn test_run_success(temp_dir: TempDir) {
        let xcode = fake_xcode(
            &temp_dir,
            "pwd > pwd.txt; printf '%s\\n' \"$@\" > args.txt",
        );
        let command = BuildCommand::new(&config(
            xcode.to_str().unwrap(),
            DEFAULT_DESTINATION,
        ));
        command.run(&temp_dir).unwrap();

        let pwd = fs::read_to_string(temp_dir.join("pwd.txt")).unwrap();
        assert_eq!(
            fs::canonicalize(pwd.trim()).unwrap(),
            fs::canonicalize(&*temp_dir).unwrap()
        );
        let args = fs::read_to_string(temp_dir.join("args.txt")).unwrap();
        assert_eq!(args.lines().collect::<Vec<_>>(), command.args());
    }

    /// Non-zero exit is an error, and includes the tool's stderr
    #[cfg(unix)]
    #[rstest]
    fn test_run_failure(temp_dir: TempDir) {
        let xcode = fake_xcode(
            &temp_dir,
            "echo 'scheme Foo is not configured' >&2; exit 65",
        );
        let command = BuildCommand::new(&config(
            xcode.to_str().unwrap(),
            "platform=macOS",
        ));
        let result = command.run(&temp_dir);
        assert!(matches!(
            &result,
            Err(BuildError::Failed { status, .. }) if status.code() == Some(65)
        ));
        assert_err!(result, "scheme Foo is not configured");
    }

    /// Missing executable fails to spawn
    #[rstest]
    fn test_run_missing_executable(temp_dir: TempDir) {
        let command = BuildCommand::new(&config(
            temp_dir.join("Nope.app").to_str().unwrap(),
            "platform=macOS",
        ));
        let result = command.run(&temp_dir);
        assert!(matches!(&result, Err(BuildError::Spawn { .. })));
        assert_err!(result, "Error executing");
    }
}
