//! Ninja invocation.
//!
//! Runs the build runner in a workspace and turns its exit status into a
//! result. The runner's combined output is the only diagnostic available, so
//! a failed build carries all of it.

use std::ffi::{OsStr, OsString};
use std::io::{self, Read};
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::consts::{DEFAULT_NINJA, ENV_NINJA};
use crate::error::{BuildError, ConfigError, Error};

/// The build runner executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Runner {
  program: OsString,
}

impl Default for Runner {
  fn default() -> Self {
    Self::new(DEFAULT_NINJA)
  }
}

impl Runner {
  pub fn new(program: impl Into<OsString>) -> Self {
    Self {
      program: program.into(),
    }
  }

  /// `EXTBUILD_NINJA` if set, otherwise `ninja` from PATH.
  pub fn from_env() -> Self {
    match std::env::var_os(ENV_NINJA) {
      Some(program) if !program.is_empty() => Self::new(program),
      _ => Self::default(),
    }
  }

  pub fn program(&self) -> &OsStr {
    &self.program
  }

  fn display_name(&self) -> String {
    self.program.to_string_lossy().into_owned()
  }

  /// Checks that the runner can be executed at all.
  ///
  /// Must pass before a build is attempted: a missing runner is a
  /// configuration problem, not a build failure.
  pub fn check_available(&self) -> Result<(), ConfigError> {
    let status = Command::new(&self.program)
      .arg("--version")
      .stdin(Stdio::null())
      .stdout(Stdio::null())
      .stderr(Stdio::null())
      .status()
      .map_err(|source| ConfigError::RunnerNotInstalled {
        runner: self.display_name(),
        source,
      })?;

    if !status.success() {
      return Err(ConfigError::RunnerUnusable {
        runner: self.display_name(),
        code: status.code(),
      });
    }
    Ok(())
  }

  /// Runs `<runner> -v` in `workspace` and waits for it to exit.
  ///
  /// Returns the combined stdout and stderr. There is no timeout.
  pub fn run(&self, name: &str, workspace: &Path) -> Result<String, Error> {
    info!(runner = %self.display_name(), workspace = %workspace.display(), "building extension {}", name);

    let io_err = |source: io::Error| Error::Io {
      path: workspace.to_path_buf(),
      source,
    };

    let (mut reader, writer) = io::pipe().map_err(io_err)?;
    let mut command = Command::new(&self.program);
    command
      .arg("-v")
      .current_dir(workspace)
      .stdin(Stdio::null())
      .stdout(writer.try_clone().map_err(io_err)?)
      .stderr(writer);

    let mut child = command.spawn().map_err(|source| match source.kind() {
      io::ErrorKind::NotFound => Error::Config(ConfigError::RunnerNotInstalled {
        runner: self.display_name(),
        source,
      }),
      _ => io_err(source),
    })?;
    // The command holds copies of the write end; reading only reaches EOF
    // once every copy is closed.
    drop(command);

    let mut output = Vec::new();
    reader.read_to_end(&mut output).map_err(io_err)?;
    let status = child.wait().map_err(io_err)?;
    let log = String::from_utf8_lossy(&output).into_owned();

    if !status.success() {
      debug!(log = %log, "build output");
      return Err(Error::Build(BuildError {
        name: name.to_string(),
        log,
        code: status.code(),
      }));
    }

    debug!(log = %log, "build succeeded");
    Ok(log)
  }
}

/// Checks the runner configured in the environment.
pub fn check_runner_available() -> Result<(), ConfigError> {
  Runner::from_env().check_available()
}
