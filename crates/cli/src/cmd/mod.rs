mod build;
mod emit;
mod info;

use std::path::PathBuf;

use clap::Args;
use extbuild_lib::LoadOptions;

pub use build::cmd_build;
pub use emit::cmd_emit;
pub use info::cmd_info;

/// What to build; shared by `build` and `emit`.
#[derive(Args, Debug)]
pub struct ExtensionArgs {
  /// Extension name; must be a C identifier
  pub name: String,

  /// C++ (.cpp, .cc, ...) and CUDA (.cu) sources
  #[arg(required = true)]
  pub sources: Vec<PathBuf>,

  /// Extra host compiler flag (repeatable)
  #[arg(long = "cflag", value_name = "FLAG", allow_hyphen_values = true)]
  pub cflags: Vec<String>,

  /// Extra nvcc flag (repeatable)
  #[arg(long = "cuda-cflag", value_name = "FLAG", allow_hyphen_values = true)]
  pub cuda_cflags: Vec<String>,

  /// Extra linker flag (repeatable)
  #[arg(long = "ldflag", value_name = "FLAG", allow_hyphen_values = true)]
  pub ldflags: Vec<String>,

  /// Extra include directory, searched first (repeatable)
  #[arg(short = 'I', long = "include", value_name = "DIR")]
  pub include: Vec<PathBuf>,

  /// Build in this directory instead of the per-name workspace
  #[arg(long, value_name = "DIR")]
  pub build_dir: Option<PathBuf>,
}

impl ExtensionArgs {
  pub fn to_options(&self, verbose: bool) -> LoadOptions {
    LoadOptions {
      name: self.name.clone(),
      sources: self.sources.clone(),
      extra_cflags: self.cflags.clone(),
      extra_cuda_cflags: self.cuda_cflags.clone(),
      extra_ldflags: self.ldflags.clone(),
      extra_include_paths: self.include.clone(),
      build_directory: self.build_dir.clone(),
      verbose,
    }
  }
}
