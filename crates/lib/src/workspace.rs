//! Per-extension build directories.
//!
//! Every extension builds in its own workspace, `<root>/<name>`, which holds
//! the build description, the object files and the linked library. A
//! workspace is created on first use and reused afterwards; nothing here ever
//! deletes one. Two concurrent builds of the same name share a workspace and
//! are not safe; different names never interact.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::consts::BUILD_FILE_NAME;
use crate::error::Error;
use crate::platform::paths::extensions_root;

/// Returns the workspace for `name`, creating it if needed.
///
/// An explicit directory is returned as given; the caller is responsible for
/// it existing.
pub fn resolve(name: &str, explicit: Option<&Path>) -> Result<PathBuf, Error> {
  if let Some(dir) = explicit {
    return Ok(dir.to_path_buf());
  }

  let root = extensions_root();
  debug!(root = %root.display(), "using extensions root");

  let workspace = root.join(name);
  if !workspace.exists() {
    debug!(path = %workspace.display(), "creating extension directory");
  }
  fs::create_dir_all(&workspace).map_err(|source| Error::Io {
    path: workspace.clone(),
    source,
  })?;

  Ok(workspace)
}

/// Path of the build description inside `workspace`.
pub fn build_file_path(workspace: &Path) -> PathBuf {
  workspace.join(BUILD_FILE_NAME)
}
