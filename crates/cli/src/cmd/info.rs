use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use extbuild_lib::invoke::Runner;
use extbuild_lib::platform::paths::extensions_root;
use extbuild_lib::platform::platform_triple;
use extbuild_lib::toolchain::Toolchain;

use crate::output::{OutputFormat, print_json, print_stat, print_warning};

#[derive(Debug, Serialize)]
struct InfoReport {
  platform: Option<String>,
  cxx: String,
  cuda_home: Option<PathBuf>,
  nvcc: Option<PathBuf>,
  ninja: String,
  ninja_available: bool,
  extensions_root: PathBuf,
  include_dirs: Vec<PathBuf>,
}

impl InfoReport {
  fn collect() -> Self {
    let toolchain = Toolchain::detect();
    let runner = Runner::from_env();
    let include_dirs = toolchain
      .bundled_includes
      .iter()
      .chain(&toolchain.runtime_includes)
      .cloned()
      .collect();

    Self {
      platform: platform_triple(),
      nvcc: toolchain.nvcc().ok(),
      cxx: toolchain.cxx,
      cuda_home: toolchain.cuda_home,
      ninja: runner.program().to_string_lossy().into_owned(),
      ninja_available: runner.check_available().is_ok(),
      extensions_root: extensions_root(),
      include_dirs,
    }
  }
}

fn or_none(path: Option<&PathBuf>) -> String {
  path.map(|p| p.display().to_string()).unwrap_or_else(|| "(not found)".to_string())
}

pub fn cmd_info(output: OutputFormat) -> Result<()> {
  let report = InfoReport::collect();

  if output.is_json() {
    return print_json(&report);
  }

  println!("Toolchain:");
  print_stat("Platform", report.platform.as_deref().unwrap_or("(unsupported)"));
  print_stat("C++ compiler", &report.cxx);
  print_stat("CUDA home", &or_none(report.cuda_home.as_ref()));
  print_stat("nvcc", &or_none(report.nvcc.as_ref()));
  print_stat("Ninja", &report.ninja);
  print_stat("Extensions root", &report.extensions_root.display().to_string());
  for dir in &report.include_dirs {
    print_stat("Include", &dir.display().to_string());
  }

  if !report.ninja_available {
    print_warning(&format!("`{}` could not be run; builds will fail", report.ninja));
  }

  Ok(())
}
