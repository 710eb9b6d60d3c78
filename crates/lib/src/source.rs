//! Source classification.
//!
//! Decides which compiler a source file goes through. Only the extension is
//! consulted; the file is never opened.

use std::path::{Path, PathBuf};

/// Extensions compiled by nvcc rather than the host compiler.
pub const CUDA_EXTENSIONS: [&str; 2] = ["cu", "cuh"];

/// Returns true if `path` is a CUDA source.
pub fn is_cuda_file(path: &Path) -> bool {
  path
    .extension()
    .and_then(|ext| ext.to_str())
    .is_some_and(|ext| CUDA_EXTENSIONS.contains(&ext))
}

/// Sources split by compiler, each side in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classified {
  pub host: Vec<PathBuf>,
  pub device: Vec<PathBuf>,
}

impl Classified {
  pub fn any_device(&self) -> bool {
    !self.device.is_empty()
  }
}

pub fn classify<P: AsRef<Path>>(sources: &[P]) -> Classified {
  let mut classified = Classified::default();
  for source in sources {
    let source = source.as_ref();
    if is_cuda_file(source) {
      classified.device.push(source.to_path_buf());
    } else {
      classified.host.push(source.to_path_buf());
    }
  }
  classified
}
