//! Test utilities for extbuild-lib.
//!
//! Helpers for tests that stand in fake compilers and runners for the real
//! executables.

use std::path::{Path, PathBuf};

/// Writes an executable `/bin/sh` script named `name` into `dir`.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
  use std::os::unix::fs::PermissionsExt;

  let path = dir.join(name);
  std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
  std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  path
}

/// Returns true if `program` can be spawned from PATH.
pub fn on_path(program: &str) -> bool {
  std::process::Command::new(program)
    .arg("--version")
    .stdout(std::process::Stdio::null())
    .stderr(std::process::Stdio::null())
    .status()
    .is_ok()
}
