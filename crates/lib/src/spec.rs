//! Build requests.
//!
//! [`LoadOptions`] is what a caller hands to [`crate::load::load`];
//! [`BuildSpec`] is the validated form the rest of the pipeline works on.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::ConfigError;
use crate::platform::paths::absolute;
use crate::source::is_cuda_file;

/// Options for building and loading one extension.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
  /// Name of the extension. Must match the name passed to
  /// `EXTBUILD_EXTENSION` in the sources.
  pub name: String,
  /// Relative or absolute paths of the C++/CUDA sources.
  pub sources: Vec<PathBuf>,
  /// Extra flags for the host compiler.
  pub extra_cflags: Vec<String>,
  /// Extra flags for nvcc.
  pub extra_cuda_cflags: Vec<String>,
  /// Extra flags for the linker.
  pub extra_ldflags: Vec<String>,
  /// Extra include directories, searched first.
  pub extra_include_paths: Vec<PathBuf>,
  /// Use this directory as the workspace instead of `<root>/<name>`.
  pub build_directory: Option<PathBuf>,
  /// Log each pipeline step at info level instead of debug.
  pub verbose: bool,
}

impl LoadOptions {
  pub fn new<P: Into<PathBuf>>(name: impl Into<String>, sources: impl IntoIterator<Item = P>) -> Self {
    Self {
      name: name.into(),
      sources: sources.into_iter().map(Into::into).collect(),
      ..Default::default()
    }
  }
}

/// A validated build request with absolute paths.
///
/// Two specs with equal fields always produce the same build description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildSpec {
  pub name: String,
  pub sources: Vec<PathBuf>,
  pub extra_cflags: Vec<String>,
  pub extra_cuda_cflags: Vec<String>,
  pub extra_ldflags: Vec<String>,
  pub extra_include_paths: Vec<PathBuf>,
}

impl BuildSpec {
  /// Validates `options` and resolves every path against the current directory.
  pub fn from_options(options: &LoadOptions) -> Result<Self, ConfigError> {
    validate_name(&options.name)?;
    if options.sources.is_empty() {
      return Err(ConfigError::NoSources(options.name.clone()));
    }

    Ok(Self {
      name: options.name.clone(),
      sources: resolve_all(&options.sources)?,
      extra_cflags: options.extra_cflags.clone(),
      extra_cuda_cflags: options.extra_cuda_cflags.clone(),
      extra_ldflags: options.extra_ldflags.clone(),
      extra_include_paths: resolve_all(&options.extra_include_paths)?,
    })
  }

  /// True if any source goes through nvcc.
  pub fn with_cuda(&self) -> bool {
    self.sources.iter().any(|source| is_cuda_file(source))
  }
}

fn resolve_all(paths: &[PathBuf]) -> Result<Vec<PathBuf>, ConfigError> {
  paths.iter().map(|path| resolve(path)).collect()
}

fn resolve(path: &Path) -> Result<PathBuf, ConfigError> {
  absolute(path).map_err(|source| ConfigError::ResolvePath {
    path: path.to_path_buf(),
    source,
  })
}

/// The name becomes a directory, a file stem and part of a C symbol.
pub fn validate_name(name: &str) -> Result<(), ConfigError> {
  let invalid = |reason| ConfigError::InvalidName {
    name: name.to_string(),
    reason,
  };

  let mut chars = name.chars();
  let Some(first) = chars.next() else {
    return Err(invalid("name is empty"));
  };
  if name.contains(['/', '\\']) {
    return Err(invalid("name contains a path separator"));
  }
  if !(first.is_ascii_alphabetic() || first == '_') || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
    return Err(invalid("name must be a C identifier"));
  }
  Ok(())
}
