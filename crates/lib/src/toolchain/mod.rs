//! Compiler toolchain resolution.
//!
//! # Submodules
//!
//! - [`locate`] - CUDA install root discovery
//! - [`compiler`] - host compiler selection and ABI check

pub mod compiler;
pub mod locate;

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::headers::bundled_include_dir;
use crate::platform::os::Os;
use crate::platform::paths::runtime_include_dirs;

pub use compiler::{check_compiler_abi_compatibility, compiler_abi_compatible, host_compiler};
pub use locate::{cuda_home, find_cuda_home, join_cuda_home};

/// Everything the build description needs to know about the machine.
///
/// [`Toolchain::detect`] reads it from the environment; constructing it by
/// hand describes a build for another machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
  /// Host C++ compiler, also used as the linker.
  pub cxx: String,
  /// CUDA install root, if one was found.
  pub cuda_home: Option<PathBuf>,
  /// Directories the bundled headers are installed into before a build.
  pub bundled_includes: Vec<PathBuf>,
  /// Headers of the host runtime, searched last.
  pub runtime_includes: Vec<PathBuf>,
  /// Target OS; decides the library suffix and linker opt-ins.
  pub os: Os,
}

impl Toolchain {
  pub fn detect() -> Self {
    Self {
      cxx: host_compiler(),
      cuda_home: cuda_home().map(Path::to_path_buf),
      bundled_includes: vec![bundled_include_dir()],
      runtime_includes: runtime_include_dirs(),
      os: Os::current_or_linux(),
    }
  }

  /// Path of `nvcc`, or [`ConfigError::CudaHomeNotFound`].
  pub fn nvcc(&self) -> Result<PathBuf, ConfigError> {
    let exe = self.os.exe_name("nvcc");
    join_cuda_home(self.cuda_home.as_deref(), &["bin", &exe])
  }

  pub fn cuda_include_dir(&self) -> Result<PathBuf, ConfigError> {
    join_cuda_home(self.cuda_home.as_deref(), &["include"])
  }

  pub fn cuda_lib_dir(&self) -> Result<PathBuf, ConfigError> {
    join_cuda_home(self.cuda_home.as_deref(), &["lib64"])
  }

  /// File name of the linked artifact for `name`.
  pub fn artifact_file_name(&self, name: &str) -> String {
    format!("{}.{}", name, self.os.shared_lib_extension())
  }
}
