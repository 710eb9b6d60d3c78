//! Implementation of the `extbuild build` command.
//!
//! Runs the full pipeline for one extension. Unless `--no-load` is given the
//! artifact is loaded into this process, which runs its entry point; that is
//! the only way to know the extension is usable.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use extbuild_lib::BuildSpec;
use extbuild_lib::artifact::load_artifact;
use extbuild_lib::invoke::Runner;
use extbuild_lib::load::build_with;
use extbuild_lib::toolchain::Toolchain;

use super::ExtensionArgs;
use crate::output::{OutputFormat, format_duration, print_json, print_stat, print_success};

#[derive(Debug, Serialize)]
struct BuildSummary {
  name: String,
  workspace: PathBuf,
  artifact: Option<PathBuf>,
  loaded: bool,
  /// Only known when the build ran without loading.
  #[serde(skip_serializing_if = "Option::is_none")]
  spec: Option<BuildSpec>,
  duration_ms: u128,
}

pub fn cmd_build(args: &ExtensionArgs, verbose: bool, no_load: bool, output: OutputFormat) -> Result<()> {
  let start = Instant::now();
  let options = args.to_options(verbose);
  debug!(?options, "build requested");

  let toolchain = Toolchain::detect();
  let built = build_with(&options, &toolchain, &Runner::from_env())
    .with_context(|| format!("Failed to build extension '{}'", args.name))?;
  if verbose {
    eprint!("{}", built.log);
  }

  let summary = if no_load {
    BuildSummary {
      name: built.spec.name.clone(),
      workspace: built.workspace,
      artifact: None,
      loaded: false,
      spec: Some(built.spec),
      duration_ms: start.elapsed().as_millis(),
    }
  } else {
    let extension = load_artifact(&built.spec.name, &built.workspace, toolchain.os.shared_lib_extension())
      .with_context(|| format!("Failed to load extension '{}'", args.name))?;
    BuildSummary {
      name: extension.name().to_string(),
      workspace: built.workspace,
      artifact: Some(extension.path().to_path_buf()),
      loaded: true,
      spec: None,
      duration_ms: start.elapsed().as_millis(),
    }
  };

  if output.is_json() {
    print_json(&summary)?;
    return Ok(());
  }

  if summary.loaded {
    print_success(&format!("Loaded extension '{}'", summary.name));
  } else {
    print_success(&format!("Built extension '{}'", summary.name));
  }
  print_stat("Workspace", &summary.workspace.display().to_string());
  if let Some(artifact) = &summary.artifact {
    print_stat("Artifact", &artifact.display().to_string());
  }
  print_stat("Duration", &format_duration(start.elapsed()));

  Ok(())
}
