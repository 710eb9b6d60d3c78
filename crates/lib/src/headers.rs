//! Headers shipped with extbuild.
//!
//! The headers are compiled into the library and written out under the
//! extensions root before a build, so a relocated binary still finds them.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Error;
use crate::platform::paths::extensions_root;

/// `extbuild/extension.h`, which defines the `EXTBUILD_EXTENSION` entry macro.
pub const EXTENSION_H: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/include/extbuild/extension.h"));

const BUNDLED: [(&str, &str); 1] = [("extbuild/extension.h", EXTENSION_H)];

/// Include directory the bundled headers are installed into:
/// `<extensions root>/include`.
pub fn bundled_include_dir() -> PathBuf {
  extensions_root().join("include")
}

/// Writes the bundled headers under `dir`.
///
/// Files whose contents already match are left alone, so their mtimes stay
/// put and Ninja does not recompile every object that includes them.
pub fn install(dir: &Path) -> Result<(), Error> {
  for (relative, contents) in BUNDLED {
    let path = dir.join(relative);
    if fs::read_to_string(&path).is_ok_and(|existing| existing == contents) {
      continue;
    }

    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).map_err(|source| Error::Io {
        path: parent.to_path_buf(),
        source,
      })?;
    }
    fs::write(&path, contents).map_err(|source| Error::Io {
      path: path.clone(),
      source,
    })?;
    debug!(path = %path.display(), "installed bundled header");
  }
  Ok(())
}
