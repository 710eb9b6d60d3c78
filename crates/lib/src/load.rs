//! Build-and-load pipeline.
//!
//! [`load`] is the entry point for callers: it builds an extension from
//! sources, reusing whatever Ninja considers up to date, and binds the result
//! into the process. Each call runs synchronously:
//!
//! 1. check that the runner exists
//! 2. resolve the workspace
//! 3. check the host compiler (advisory, once per compiler)
//! 4. install the bundled headers
//! 5. write `build.ninja` (always; Ninja decides what is stale)
//! 6. run Ninja
//! 7. load the artifact

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use crate::artifact::{Extension, load_artifact};
use crate::error::Result;
use crate::headers;
use crate::invoke::Runner;
use crate::ninja;
use crate::source::classify;
use crate::spec::{BuildSpec, LoadOptions};
use crate::toolchain::{Toolchain, compiler_abi_compatible};
use crate::workspace;

/// What a successful build produced.
#[derive(Debug, Clone)]
pub struct BuildOutput {
  pub spec: BuildSpec,
  pub workspace: PathBuf,
  pub build_file: PathBuf,
  /// Combined runner output.
  pub log: String,
}

fn step(verbose: bool, message: std::fmt::Arguments<'_>) {
  if verbose {
    info!("{}", message);
  } else {
    debug!("{}", message);
  }
}

/// Builds the extension described by `options` without loading it.
pub fn build(options: &LoadOptions) -> Result<BuildOutput> {
  build_with(options, &Toolchain::detect(), &Runner::from_env())
}

/// [`build`] with an explicit toolchain and runner.
pub fn build_with(options: &LoadOptions, toolchain: &Toolchain, runner: &Runner) -> Result<BuildOutput> {
  runner.check_available()?;

  let spec = BuildSpec::from_options(options)?;
  let verbose = options.verbose;

  let workspace = workspace::resolve(&spec.name, options.build_directory.as_deref())?;
  step(verbose, format_args!("Using {} as build directory for {}", workspace.display(), spec.name));

  let classified = classify(&spec.sources);
  if classified.any_device() {
    step(
      verbose,
      format_args!(
        "Detected {} CUDA file(s) among {} sources, linking against cudart",
        classified.device.len(),
        spec.sources.len()
      ),
    );
  }
  compiler_abi_compatible(&toolchain.cxx);

  for dir in &toolchain.bundled_includes {
    headers::install(dir)?;
  }

  let build_file = workspace::build_file_path(&workspace);
  step(verbose, format_args!("Emitting ninja build file {}", build_file.display()));
  ninja::write(&build_file, &spec, toolchain)?;

  step(verbose, format_args!("Building extension module {}", spec.name));
  let log = runner.run(&spec.name, &workspace)?;

  Ok(BuildOutput {
    spec,
    workspace,
    build_file,
    log,
  })
}

/// Builds the extension described by `options` and loads it.
///
/// The returned handle is also registered under the extension's name (see
/// [`crate::artifact::loaded`]).
pub fn load(options: &LoadOptions) -> Result<Arc<Extension>> {
  load_with(options, &Toolchain::detect(), &Runner::from_env())
}

/// [`load`] with an explicit toolchain and runner.
pub fn load_with(options: &LoadOptions, toolchain: &Toolchain, runner: &Runner) -> Result<Arc<Extension>> {
  let output = build_with(options, toolchain, runner)?;

  step(options.verbose, format_args!("Loading extension module {}", output.spec.name));
  let ext = toolchain.os.shared_lib_extension();
  Ok(load_artifact(&output.spec.name, &output.workspace, ext)?)
}
