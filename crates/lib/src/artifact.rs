//! Binding compiled artifacts into the process.
//!
//! A loaded [`Extension`] is registered under its name in a process-wide
//! registry and shared through `Arc`. The library stays mapped as long as any
//! handle to it is alive. A failed load is final; callers rebuild and load
//! again.

use std::collections::HashMap;
use std::ffi::c_int;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex};

use libloading::{Library, Symbol};
use tracing::{debug, info};

use crate::consts::ENTRY_SYMBOL_PREFIX;
use crate::error::LoadError;

static REGISTRY: LazyLock<Mutex<HashMap<String, Arc<Extension>>>> = LazyLock::new(Default::default);

type EntryPoint = unsafe extern "C" fn() -> c_int;

/// A shared library built and initialized by extbuild.
#[derive(Debug)]
pub struct Extension {
  name: String,
  path: PathBuf,
  library: Library,
}

impl Extension {
  pub fn name(&self) -> &str {
    &self.name
  }

  /// The file the library was loaded from.
  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Looks up an exported symbol.
  ///
  /// # Safety
  ///
  /// `T` must match the type the library actually exports under `symbol`.
  pub unsafe fn get<T>(&self, symbol: &str) -> Result<Symbol<'_, T>, libloading::Error> {
    unsafe { self.library.get(symbol.as_bytes()) }
  }
}

/// Name of the entry point an artifact for `name` must export.
pub fn entry_symbol(name: &str) -> String {
  format!("{}{}", ENTRY_SYMBOL_PREFIX, name)
}

/// Finds the shared library for `name` in `dir`.
///
/// `ext` is the library suffix the build used (`so`, `dylib` or `dll`).
/// `<name>.<ext>` is preferred; otherwise any `<name>.*.<ext>` is accepted
/// (first in sorted order), to allow tagged suffixes.
pub fn find_artifact(name: &str, dir: &Path, ext: &str) -> Result<PathBuf, LoadError> {
  let exact = dir.join(format!("{}.{}", name, ext));
  if exact.is_file() {
    return Ok(exact);
  }

  let prefix = format!("{}.", name);
  let suffix = format!(".{}", ext);
  let entries = std::fs::read_dir(dir).map_err(|source| LoadError::ReadDir {
    dir: dir.to_path_buf(),
    source,
  })?;

  let mut candidates: Vec<PathBuf> = entries
    .filter_map(|entry| entry.ok())
    .filter(|entry| {
      let file_name = entry.file_name();
      let file_name = file_name.to_string_lossy();
      file_name.starts_with(&prefix) && file_name.ends_with(&suffix)
    })
    .map(|entry| entry.path())
    .filter(|path| path.is_file())
    .collect();
  candidates.sort();

  candidates.into_iter().next().ok_or_else(|| LoadError::NotFound {
    name: name.to_string(),
    dir: dir.to_path_buf(),
  })
}

#[cfg(unix)]
fn open_library(path: &Path) -> Result<Library, libloading::Error> {
  use libloading::os::unix::{Library as UnixLibrary, RTLD_LOCAL, RTLD_NOW};

  // RTLD_NOW so unresolved symbols fail here rather than on first call.
  unsafe { UnixLibrary::open(Some(path), RTLD_NOW | RTLD_LOCAL) }.map(Library::from)
}

#[cfg(not(unix))]
fn open_library(path: &Path) -> Result<Library, libloading::Error> {
  unsafe { Library::new(path) }
}

/// Loads the artifact for `name` from `dir`, runs its entry point and
/// registers it.
///
/// A previous registration under the same name is replaced; handles to it stay
/// valid.
pub fn load_artifact(name: &str, dir: &Path, ext: &str) -> Result<Arc<Extension>, LoadError> {
  let path = find_artifact(name, dir, ext)?;
  debug!(path = %path.display(), "loading extension {}", name);

  let library = open_library(&path).map_err(|source| LoadError::Open {
    path: path.clone(),
    source,
  })?;

  let symbol = entry_symbol(name);
  let code = {
    let entry: Symbol<'_, EntryPoint> =
      unsafe { library.get(symbol.as_bytes()) }.map_err(|source| LoadError::MissingEntryPoint {
        path: path.clone(),
        symbol: symbol.clone(),
        source,
      })?;
    unsafe { entry() }
  };
  if code != 0 {
    return Err(LoadError::InitFailed {
      name: name.to_string(),
      code,
    });
  }

  let extension = Arc::new(Extension {
    name: name.to_string(),
    path,
    library,
  });
  REGISTRY
    .lock()
    .unwrap_or_else(|poisoned| poisoned.into_inner())
    .insert(name.to_string(), Arc::clone(&extension));

  info!(path = %extension.path.display(), "loaded extension {}", name);
  Ok(extension)
}

/// The extension most recently loaded under `name`, if any.
pub fn loaded(name: &str) -> Option<Arc<Extension>> {
  REGISTRY
    .lock()
    .unwrap_or_else(|poisoned| poisoned.into_inner())
    .get(name)
    .cloned()
}
