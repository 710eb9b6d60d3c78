//! CUDA install root discovery.
//!
//! The root is looked up once per process through [`cuda_home`]. A missing
//! install is not an error here; it only becomes one when a device build asks
//! for a CUDA path (see [`join_cuda_home`]).

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use tracing::debug;

use crate::consts::{ENV_CUDA_HOME, ENV_CUDA_PATH};
use crate::error::ConfigError;
use crate::platform::os::Os;

#[cfg(windows)]
const WINDOWS_CUDA_ROOT: &str = "C:/Program Files/NVIDIA GPU Computing Toolkit/CUDA";

static CUDA_HOME: OnceLock<Option<PathBuf>> = OnceLock::new();

/// The CUDA install root, resolved on first call and fixed for the rest of the
/// process.
pub fn cuda_home() -> Option<&'static Path> {
  CUDA_HOME.get_or_init(find_cuda_home).as_deref()
}

/// Resolves the CUDA install root without caching.
///
/// Tried in order:
/// 1. `CUDA_HOME`, then `CUDA_PATH`
/// 2. the platform's default install location, if it exists
/// 3. the grandparent of `nvcc` as reported by `which`/`where`
pub fn find_cuda_home() -> Option<PathBuf> {
  let os = Os::current_or_linux();
  locate(os, default_install_root())
}

fn locate(os: Os, default_root: Option<PathBuf>) -> Option<PathBuf> {
  if let Some(home) = from_env() {
    debug!(path = %home.display(), "CUDA root from environment");
    return Some(home);
  }

  if let Some(root) = default_root.filter(|root| root.exists()) {
    debug!(path = %root.display(), "CUDA root at default location");
    return Some(root);
  }

  let found = from_which(os);
  match &found {
    Some(root) => debug!(path = %root.display(), "CUDA root from nvcc on PATH"),
    None => debug!("no CUDA installation found"),
  }
  found
}

fn from_env() -> Option<PathBuf> {
  [ENV_CUDA_HOME, ENV_CUDA_PATH]
    .into_iter()
    .filter_map(std::env::var_os)
    .find(|value| !value.is_empty())
    .map(PathBuf::from)
}

#[cfg(windows)]
fn default_install_root() -> Option<PathBuf> {
  newest_versioned_dir(Path::new(WINDOWS_CUDA_ROOT))
}

#[cfg(not(windows))]
fn default_install_root() -> Option<PathBuf> {
  Some(PathBuf::from("/usr/local/cuda"))
}

/// Picks the highest `v<major>.<minor>` entry of `parent`.
#[cfg_attr(not(windows), allow(dead_code))]
fn newest_versioned_dir(parent: &Path) -> Option<PathBuf> {
  let entries = std::fs::read_dir(parent).ok()?;
  entries
    .filter_map(|entry| entry.ok())
    .filter_map(|entry| {
      let name = entry.file_name();
      let version = parse_version_dir(name.to_str()?)?;
      Some((version, entry.path()))
    })
    .max_by_key(|(version, _)| *version)
    .map(|(_, path)| path)
}

fn parse_version_dir(name: &str) -> Option<(u32, u32)> {
  let (major, minor) = name.strip_prefix('v')?.split_once('.')?;
  Some((major.parse().ok()?, minor.parse().ok()?))
}

fn from_which(os: Os) -> Option<PathBuf> {
  let output = Command::new(os.which_command())
    .arg("nvcc")
    .stderr(Stdio::null())
    .output()
    .ok()?;
  if !output.status.success() {
    return None;
  }

  let stdout = String::from_utf8_lossy(&output.stdout);
  let nvcc = stdout.lines().map(str::trim).find(|line| !line.is_empty())?;
  Path::new(nvcc).parent()?.parent().map(Path::to_path_buf)
}

/// Joins `parts` onto the CUDA root, failing if there is none.
pub fn join_cuda_home(home: Option<&Path>, parts: &[&str]) -> Result<PathBuf, ConfigError> {
  let mut path = home.ok_or(ConfigError::CudaHomeNotFound)?.to_path_buf();
  path.extend(parts);
  Ok(path)
}
