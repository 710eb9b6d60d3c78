//! Host compiler identity and the advisory ABI check.

use std::collections::HashMap;
use std::process::Command;
use std::sync::{LazyLock, Mutex};

use regex::Regex;
use tracing::warn;

use crate::consts::{DEFAULT_CXX, ENV_CXX, MINIMUM_GCC_VERSION};

/// Versions are sometimes reported as "major.x" rather than semver.
static VERSION_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(\d+)\.(\d+|x)").expect("version pattern is valid"));

/// Results of [`check_compiler_abi_compatibility`], per compiler, for the rest
/// of the process.
static ABI_CHECKS: LazyLock<Mutex<HashMap<String, bool>>> = LazyLock::new(Default::default);

/// The host C++ compiler: `CXX` if set, otherwise `c++`.
pub fn host_compiler() -> String {
  match std::env::var(ENV_CXX) {
    Ok(cxx) if !cxx.is_empty() => cxx,
    _ => DEFAULT_CXX.to_string(),
  }
}

/// Checks whether `compiler` is likely ABI-compatible with GCC 4.9 or newer.
///
/// Only GCC identifies itself in a way this check understands; every other
/// compiler gets a warning. The result is advisory and never stops a build.
pub fn check_compiler_abi_compatibility(compiler: &str) -> bool {
  let output = match Command::new(compiler).arg("--version").output() {
    Ok(output) => output,
    Err(e) => {
      warn!(compiler = %compiler, error = %e, "error checking compiler version");
      warn_abi_incompatible(compiler);
      return false;
    }
  };

  let info = String::from_utf8_lossy(&output.stdout).to_lowercase();
  match gcc_version(&info) {
    Some(version) if version >= MINIMUM_GCC_VERSION => true,
    Some((major, minor)) => {
      warn_abi_incompatible(&format!("{} {}.{}", compiler, major, minor));
      false
    }
    None => {
      warn_abi_incompatible(compiler);
      false
    }
  }
}

/// [`check_compiler_abi_compatibility`], run at most once per compiler.
///
/// Later calls return the first result without spawning the compiler or
/// warning again.
pub fn compiler_abi_compatible(compiler: &str) -> bool {
  let mut checks = ABI_CHECKS.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
  *checks
    .entry(compiler.to_string())
    .or_insert_with(|| check_compiler_abi_compatibility(compiler))
}

/// Extracts `(major, minor)` from lowercase `--version` output if it names gcc.
fn gcc_version(info: &str) -> Option<(u32, u32)> {
  if !info.contains("gcc") {
    return None;
  }
  let caps = VERSION_RE.captures(info)?;
  let major = caps[1].parse().ok()?;
  let minor = match &caps[2] {
    "x" => 0,
    minor => minor.parse().ok()?,
  };
  Some((major, minor))
}

fn warn_abi_incompatible(compiler: &str) {
  warn!(
    compiler = %compiler,
    "compiler may be ABI-incompatible; use a compiler that is ABI-compatible with GCC {}.{} and above \
     (see https://gcc.gnu.org/onlinedocs/libstdc++/manual/abi.html)",
    MINIMUM_GCC_VERSION.0,
    MINIMUM_GCC_VERSION.1
  );
}
