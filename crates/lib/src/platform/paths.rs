use std::path::{Path, PathBuf};

use crate::consts::{ENV_EXTENSIONS_DIR, ENV_RUNTIME_INCLUDE, EXTENSIONS_DIR_NAME};

/// Returns the root directory under which every extension workspace lives.
///
/// `EXTBUILD_EXTENSIONS_DIR` replaces the default `<tmp>/extbuild_extensions`.
pub fn extensions_root() -> PathBuf {
  match std::env::var_os(ENV_EXTENSIONS_DIR) {
    Some(dir) if !dir.is_empty() => PathBuf::from(dir),
    _ => default_extensions_root(),
  }
}

/// `/tmp/extbuild_extensions` on Unix, `%TEMP%\extbuild_extensions` on Windows.
pub fn default_extensions_root() -> PathBuf {
  std::env::temp_dir().join(EXTENSIONS_DIR_NAME)
}

/// Header directories of the host runtime, from `EXTBUILD_RUNTIME_INCLUDE`.
///
/// The variable is a platform path list (`:` on Unix, `;` on Windows).
pub fn runtime_include_dirs() -> Vec<PathBuf> {
  match std::env::var_os(ENV_RUNTIME_INCLUDE) {
    Some(list) => std::env::split_paths(&list).filter(|p| !p.as_os_str().is_empty()).collect(),
    None => Vec::new(),
  }
}

/// Makes `path` absolute against the current directory without touching the
/// filesystem, so paths that do not exist yet are accepted.
pub fn absolute(path: &Path) -> std::io::Result<PathBuf> {
  let abs = std::path::absolute(path)?;
  Ok(dunce::simplified(&abs).to_path_buf())
}

#[cfg(test)]
#[cfg(not(windows))]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn env_var_overrides_extensions_root() {
    temp_env::with_var(ENV_EXTENSIONS_DIR, Some("/custom/extensions"), || {
      assert_eq!(extensions_root(), PathBuf::from("/custom/extensions"));
    });
  }

  #[test]
  #[serial]
  fn empty_env_var_falls_back_to_temp_dir() {
    temp_env::with_var(ENV_EXTENSIONS_DIR, Some(""), || {
      assert_eq!(extensions_root(), std::env::temp_dir().join(EXTENSIONS_DIR_NAME));
    });
  }

  #[test]
  #[serial]
  fn runtime_include_dirs_split_on_path_separator() {
    temp_env::with_var(ENV_RUNTIME_INCLUDE, Some("/opt/rt/include::/usr/include/rt"), || {
      assert_eq!(
        runtime_include_dirs(),
        vec![PathBuf::from("/opt/rt/include"), PathBuf::from("/usr/include/rt")]
      );
    });
  }

  #[test]
  #[serial]
  fn runtime_include_dirs_empty_when_unset() {
    temp_env::with_var_unset(ENV_RUNTIME_INCLUDE, || {
      assert!(runtime_include_dirs().is_empty());
    });
  }

  #[test]
  fn absolute_resolves_relative_against_cwd() {
    let cwd = std::env::current_dir().unwrap();
    assert_eq!(absolute(Path::new("demo.cpp")).unwrap(), cwd.join("demo.cpp"));
    assert_eq!(absolute(Path::new("/abs/demo.cpp")).unwrap(), PathBuf::from("/abs/demo.cpp"));
  }
}
