//! Error taxonomy for building and loading extensions.
//!
//! Three kinds of failure reach the caller, and none of them is retried:
//! - [`ConfigError`]: the environment cannot build at all (no runner, no CUDA
//!   install) or the request itself is malformed.
//! - [`BuildError`]: the runner ran and failed; carries the full build log.
//! - [`LoadError`]: the build succeeded but the artifact could not be bound.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The environment or the request cannot produce a build.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("ninja is required to load extensions, but `{runner}` could not be run: {source}")]
  RunnerNotInstalled {
    runner: String,
    #[source]
    source: io::Error,
  },

  #[error("`{runner} --version` exited with code {code:?}")]
  RunnerUnusable { runner: String, code: Option<i32> },

  #[error("CUDA_HOME environment variable is not set. Please set it to your CUDA install root.")]
  CudaHomeNotFound,

  #[error("invalid extension name `{name}`: {reason}")]
  InvalidName { name: String, reason: &'static str },

  #[error("no sources given for extension `{0}`")]
  NoSources(String),

  #[error(
    "object file `{object}` would be produced by both {} and {}; rename one of the sources",
    first.display(),
    second.display()
  )]
  ObjectNameCollision {
    object: String,
    first: PathBuf,
    second: PathBuf,
  },

  #[error("failed to resolve path {}: {source}", path.display())]
  ResolvePath { path: PathBuf, source: io::Error },
}

/// The runner exited unsuccessfully.
#[derive(Debug, Error)]
#[error("error building extension '{name}': {log}")]
pub struct BuildError {
  pub name: String,
  /// Combined stdout and stderr of the runner.
  pub log: String,
  pub code: Option<i32>,
}

/// The artifact could not be found or bound into the process.
#[derive(Debug, Error)]
pub enum LoadError {
  #[error("no shared library for extension `{name}` in {}", dir.display())]
  NotFound { name: String, dir: PathBuf },

  #[error("failed to read workspace {}: {source}", dir.display())]
  ReadDir { dir: PathBuf, source: io::Error },

  #[error("failed to load {}: {source}", path.display())]
  Open {
    path: PathBuf,
    #[source]
    source: libloading::Error,
  },

  #[error("{} does not export `{symbol}`; was it built with EXTBUILD_EXTENSION?", path.display())]
  MissingEntryPoint {
    path: PathBuf,
    symbol: String,
    #[source]
    source: libloading::Error,
  },

  #[error("extension `{name}` failed to initialize (returned {code})")]
  InitFailed { name: String, code: i32 },
}

/// Any failure of the load pipeline.
#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Build(#[from] BuildError),

  #[error(transparent)]
  Load(#[from] LoadError),

  #[error("io error at {}: {source}", path.display())]
  Io { path: PathBuf, source: io::Error },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
