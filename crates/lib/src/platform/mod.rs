//! Platform detection.
//!
//! Identifies the running OS and carries the per-OS facts the build
//! description depends on (shared library suffix, linker opt-ins, PATH lookup).

pub mod os;
pub mod paths;

use os::Os;

/// Returns the platform triple for the current system (e.g., "aarch64-darwin")
///
/// Returns `None` if the current OS is not supported
pub fn platform_triple() -> Option<String> {
  Os::current().map(|os| format!("{}-{}", std::env::consts::ARCH, os))
}
