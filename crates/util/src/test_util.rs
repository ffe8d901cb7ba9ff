use crate::ResultTraced;
use anyhow::Context;
use rstest::fixture;
use std::{
    env, fs,
    ops::Deref,
    path::{Path, PathBuf},
};
use uuid::Uuid;

/// Create a new temporary folder. This will include a random subfolder to
/// guarantee uniqueness for this test.
#[fixture]
pub fn temp_dir() -> TempDir {
    TempDir::new()
}

/// Guard for a temporary directory. Create the directory on creation, delete
/// it on drop.
#[derive(Debug)]
pub struct TempDir(PathBuf);

impl TempDir {
    fn new() -> Self {
        let path = env::temp_dir().join(Uuid::new_v4().to_string());
        fs::create_dir(&path).unwrap();
        Self(path)
    }
}

impl Deref for TempDir {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        // Clean up
        let _ = fs::remove_dir_all(&self.0)
            .with_context(|| {
                format!(
                    "Error deleting temporary directory `{}`",
                    self.0.display()
                )
            })
            .traced();
    }
}

/// Install a fake Xcode under `<dir>/Xcode.app` whose `xcodebuild` runs the
/// given shell script body. Return the Xcode root, to be used as the Xcode
/// path.
#[cfg(unix)]
pub fn fake_xcode(dir: &Path, script: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let root = dir.join("Xcode.app");
    let bin_dir = root.join("Contents/Developer/usr/bin");
    fs::create_dir_all(&bin_dir).unwrap();
    let executable = bin_dir.join("xcodebuild");
    fs::write(&executable, format!("#!/bin/sh\n{script}\n")).unwrap();
    fs::set_permissions(&executable, fs::Permissions::from_mode(0o755))
        .unwrap();
    root
}

/// Shell script body that creates an archive where a real docbuild would,
/// relative to the working directory
pub fn build_archive_script(scheme: &str) -> String {
    format!(
        "mkdir -p DerivedData/Build/Products/Debug-iphonesimulator/\
        {scheme}.doccarchive/data"
    )
}

/// Assert a result is the `Err` variant and the stringified error contains
/// the given message. The error is formatted with its whole source chain, so
/// the message can come from any cause.
#[macro_export]
macro_rules! assert_err {
    ($result:expr, $msg:expr) => {{
        let error = $result.unwrap_err();
        let msg = $msg;
        let mut actual = error.to_string();
        let mut source = ::std::error::Error::source(&error);
        while let Some(cause) = source {
            actual.push_str(": ");
            actual.push_str(&cause.to_string());
            source = cause.source();
        }
        assert!(
            actual.contains(msg),
            "Expected error message to contain {msg:?}, but was: {actual:?}"
        )
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io;

    /// Directory is created up front and removed when the guard drops
    #[rstest]
    fn test_temp_dir_cleanup(temp_dir: TempDir) {
        let path = temp_dir.to_path_buf();
        fs::write(path.join("file.txt"), "hello").unwrap();
        assert!(path.is_dir());
        drop(temp_dir);
        assert!(!path.exists());
    }

    #[test]
    fn test_assert_err() {
        let result: Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::NotFound, "gone fishing"));
        assert_err!(result, "gone fishing");
    }
}
