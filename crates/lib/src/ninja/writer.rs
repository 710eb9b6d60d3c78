//! Build description synthesis.
//!
//! Turns a [`BuildSpec`] into a `build.ninja` that compiles every source to an
//! object file and links them into one shared library. Host sources go
//! through the `compile` rule (with header dependency tracking), CUDA sources
//! through `cuda_compile`. Ninja decides what is stale, so the file is
//! rewritten on every load; the output depends only on the inputs, which
//! keeps a rewrite from invalidating Ninja's state.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::consts::{CXX_STANDARD_FLAG, NINJA_REQUIRED_VERSION};
use crate::error::{ConfigError, Error};
use crate::ninja::syntax::{NinjaWriter, escape_path, escape_value, shell_quote, windows_quote};
use crate::platform::os::Os;
use crate::source::is_cuda_file;
use crate::spec::BuildSpec;
use crate::toolchain::Toolchain;

pub const COMPILE_RULE: &str = "compile";
pub const CUDA_COMPILE_RULE: &str = "cuda_compile";
pub const LINK_RULE: &str = "link";

const CUDA_PIC_FLAG: &str = "--compiler-options '-fPIC'";

/// One `build` statement compiling a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEdge {
  pub object: String,
  pub rule: &'static str,
  pub source: PathBuf,
}

/// Maps each source to its object file and compile rule, in source order.
///
/// The object name is the source's file stem plus `.o`. Two sources with the
/// same stem would overwrite each other's object, so that is rejected.
pub fn object_edges(sources: &[PathBuf]) -> Result<Vec<ObjectEdge>, ConfigError> {
  let mut seen: HashMap<String, &PathBuf> = HashMap::new();
  let mut edges = Vec::with_capacity(sources.len());

  for source in sources {
    let stem = source.file_stem().unwrap_or(source.as_os_str()).to_string_lossy();
    let object = format!("{}.o", stem);

    if let Some(first) = seen.get(&object) {
      return Err(ConfigError::ObjectNameCollision {
        object,
        first: first.to_path_buf(),
        second: source.clone(),
      });
    }
    seen.insert(object.clone(), source);

    let rule = if is_cuda_file(source) {
      CUDA_COMPILE_RULE
    } else {
      COMPILE_RULE
    };
    edges.push(ObjectEdge {
      object,
      rule,
      source: source.clone(),
    });
  }

  Ok(edges)
}

/// Include directories in search order, duplicates dropped.
///
/// Caller paths come first, then bundled headers, CUDA headers (device builds
/// only) and the host runtime's headers.
pub fn include_dirs(spec: &BuildSpec, toolchain: &Toolchain) -> Result<Vec<PathBuf>, ConfigError> {
  let mut candidates: Vec<PathBuf> = spec.extra_include_paths.clone();
  candidates.extend(toolchain.bundled_includes.iter().cloned());
  if spec.with_cuda() {
    candidates.push(toolchain.cuda_include_dir()?);
  }
  candidates.extend(toolchain.runtime_includes.iter().cloned());

  let mut seen = HashSet::new();
  Ok(candidates.into_iter().filter(|dir| seen.insert(dir.clone())).collect())
}

/// Quotes a path for the command line Ninja runs on `os`.
fn quote_path(os: Os, path: &Path) -> String {
  let path = path.display().to_string();
  match os {
    Os::Windows => windows_quote(&path),
    Os::Linux | Os::MacOs => shell_quote(&path),
  }
}

pub fn cflags(spec: &BuildSpec, includes: &[PathBuf], os: Os) -> Vec<String> {
  let mut flags = vec![
    "-fPIC".to_string(),
    CXX_STANDARD_FLAG.to_string(),
    format!("-DARTIFACT_NAME={}", spec.name),
  ];
  flags.extend(includes.iter().map(|dir| format!("-I{}", quote_path(os, dir))));
  flags.extend(spec.extra_cflags.iter().cloned());
  flags
}

pub fn cuda_flags(spec: &BuildSpec) -> Vec<String> {
  let mut flags = vec![CUDA_PIC_FLAG.to_string()];
  flags.extend(spec.extra_cuda_cflags.iter().cloned());
  flags
}

pub fn ldflags(spec: &BuildSpec, toolchain: &Toolchain) -> Result<Vec<String>, ConfigError> {
  let mut flags = vec!["-shared".to_string()];
  flags.extend(spec.extra_ldflags.iter().cloned());
  if spec.with_cuda() {
    flags.push(format!("-L{}", quote_path(toolchain.os, &toolchain.cuda_lib_dir()?)));
    flags.push("-lcudart".to_string());
  }
  flags.extend(toolchain.os.undefined_symbols_flags().iter().map(|f| f.to_string()));
  Ok(flags)
}

fn join_flags(flags: &[String]) -> String {
  escape_value(&flags.join(" "))
}

/// Renders the build description for `spec`.
///
/// Fails with [`ConfigError::CudaHomeNotFound`] if `spec` has CUDA sources
/// and `toolchain` has no CUDA root.
pub fn render(spec: &BuildSpec, toolchain: &Toolchain) -> Result<String, ConfigError> {
  let with_cuda = spec.with_cuda();
  let edges = object_edges(&spec.sources)?;
  let includes = include_dirs(spec, toolchain)?;
  let mut w = NinjaWriter::new();

  w.variable("ninja_required_version", NINJA_REQUIRED_VERSION);
  w.variable("cxx", &escape_value(&toolchain.cxx));
  if with_cuda {
    w.variable("nvcc", &escape_value(&quote_path(toolchain.os, &toolchain.nvcc()?)));
  }
  w.end_block();

  w.variable("cflags", &join_flags(&cflags(spec, &includes, toolchain.os)));
  if with_cuda {
    w.variable("cuda_flags", &join_flags(&cuda_flags(spec)));
  }
  w.variable("ldflags", &join_flags(&ldflags(spec, toolchain)?));
  w.end_block();

  w.rule(COMPILE_RULE, "$cxx -MMD -MF $out.d $cflags -c $in -o $out")
    .depfile("$out.d", "gcc")
    .end_block();
  if with_cuda {
    w.rule(CUDA_COMPILE_RULE, "$nvcc $cuda_flags -c $in -o $out").end_block();
  }
  w.rule(LINK_RULE, "$cxx $ldflags $in -o $out").end_block();

  for edge in &edges {
    let source = escape_path(&edge.source.display().to_string());
    w.build(&escape_path(&edge.object), edge.rule, &[source]);
  }
  w.end_block();

  let library = escape_path(&toolchain.artifact_file_name(&spec.name));
  let objects: Vec<String> = edges.iter().map(|edge| escape_path(&edge.object)).collect();
  w.build(&library, LINK_RULE, objects.as_slice()).end_block();

  w.default_target(&library).end_block();

  Ok(w.finish())
}

/// Renders the description for `spec` and writes it to `path`.
pub fn write(path: &Path, spec: &BuildSpec, toolchain: &Toolchain) -> Result<(), Error> {
  let contents = render(spec, toolchain)?;
  fs::write(path, contents).map_err(|source| Error::Io {
    path: path.to_path_buf(),
    source,
  })?;
  debug!(path = %path.display(), name = %spec.name, "wrote build description");
  Ok(())
}
