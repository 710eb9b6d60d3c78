use std::path::Path;

use anyhow::{Context, Result};

use extbuild_lib::BuildSpec;
use extbuild_lib::ninja::render;
use extbuild_lib::toolchain::Toolchain;

use super::ExtensionArgs;
use crate::output::print_success;

/// Prints the build description `build` would write, without running anything.
pub fn cmd_emit(args: &ExtensionArgs, out: Option<&Path>) -> Result<()> {
  let spec = BuildSpec::from_options(&args.to_options(false))?;
  let description = render(&spec, &Toolchain::detect())?;

  match out {
    Some(path) => {
      std::fs::write(path, &description).with_context(|| format!("Failed to write {}", path.display()))?;
      print_success(&format!("Wrote {}", path.display()));
    }
    None => print!("{}", description),
  }

  Ok(())
}
