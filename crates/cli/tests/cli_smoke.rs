//! CLI smoke tests for extbuild.
//!
//! These run the binary end to end. Builds that need a real compiler and
//! Ninja are skipped when those are not installed.

use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::TempDir;

/// Get a Command for the extbuild binary with a scrubbed environment.
fn extbuild_cmd(root: &Path) -> Command {
  let mut cmd = cargo_bin_cmd!("extbuild");
  cmd
    .env("EXTBUILD_EXTENSIONS_DIR", root.join("extensions"))
    .env_remove("EXTBUILD_NINJA")
    .env_remove("EXTBUILD_RUNTIME_INCLUDE")
    .env_remove("RUST_LOG");
  cmd
}

fn on_path(program: &str) -> bool {
  std::process::Command::new(program)
    .arg("--version")
    .stdout(std::process::Stdio::null())
    .stderr(std::process::Stdio::null())
    .status()
    .is_ok()
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  let temp = TempDir::new().unwrap();
  extbuild_cmd(temp.path())
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
  let temp = TempDir::new().unwrap();
  extbuild_cmd(temp.path())
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("extbuild"));
}

#[test]
fn subcommand_help_works() {
  let temp = TempDir::new().unwrap();
  for cmd in &["build", "emit", "info"] {
    extbuild_cmd(temp.path())
      .arg(cmd)
      .arg("--help")
      .assert()
      .success()
      .stdout(predicate::str::contains("Usage"));
  }
}

#[test]
fn build_requires_sources() {
  let temp = TempDir::new().unwrap();
  extbuild_cmd(temp.path()).args(["build", "demo"]).assert().failure();
}

// =============================================================================
// emit
// =============================================================================

#[test]
#[cfg(target_os = "linux")]
fn emit_host_only_description() {
  let temp = TempDir::new().unwrap();

  extbuild_cmd(temp.path())
    .current_dir(temp.path())
    .env("CXX", "g++")
    .args(["emit", "demo", "demo.cpp", "--cflag", "-O2"])
    .assert()
    .success()
    .stdout(predicate::str::starts_with("ninja_required_version = 1.3\n"))
    .stdout(predicate::str::contains("cxx = g++\n"))
    .stdout(predicate::str::contains("-DARTIFACT_NAME=demo"))
    .stdout(predicate::str::contains(" -O2\n"))
    .stdout(predicate::str::contains("rule compile\n"))
    .stdout(predicate::str::contains("  depfile = $out.d\n  deps = gcc\n"))
    .stdout(predicate::str::contains("build demo.so: link demo.o\n"))
    .stdout(predicate::str::contains("default demo.so\n"))
    .stdout(predicate::str::contains("cuda_compile").not())
    .stdout(predicate::str::contains("nvcc").not());
}

#[test]
#[cfg(target_os = "linux")]
fn emit_mixed_description_uses_cuda_home() {
  let temp = TempDir::new().unwrap();

  extbuild_cmd(temp.path())
    .current_dir(temp.path())
    .env("CUDA_HOME", "/opt/cuda")
    .args(["emit", "mixed", "host.cpp", "kernel.cu"])
    .assert()
    .success()
    .stdout(predicate::str::contains("nvcc = /opt/cuda/bin/nvcc\n"))
    .stdout(predicate::str::contains("-I/opt/cuda/include"))
    .stdout(predicate::str::contains("-L/opt/cuda/lib64 -lcudart"))
    .stdout(predicate::str::contains("rule cuda_compile\n"))
    .stdout(predicate::str::contains("build kernel.o: cuda_compile "))
    .stdout(predicate::str::contains("build mixed.so: link host.o kernel.o\n"));
}

#[test]
fn emit_writes_file() {
  let temp = TempDir::new().unwrap();
  let out = temp.path().join("build.ninja");

  extbuild_cmd(temp.path())
    .current_dir(temp.path())
    .args(["emit", "demo", "demo.cpp", "--out"])
    .arg(&out)
    .assert()
    .success()
    .stdout(predicate::str::contains("Wrote"));

  let contents = std::fs::read_to_string(&out).unwrap();
  assert!(contents.starts_with("ninja_required_version = 1.3\n"));
}

#[test]
fn emit_rejects_invalid_name() {
  let temp = TempDir::new().unwrap();

  extbuild_cmd(temp.path())
    .current_dir(temp.path())
    .args(["emit", "my-ext", "demo.cpp"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid extension name"));
}

#[test]
fn emit_rejects_object_collision() {
  let temp = TempDir::new().unwrap();

  extbuild_cmd(temp.path())
    .current_dir(temp.path())
    .args(["emit", "demo", "a/util.cpp", "b/util.cpp"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("util.o"));
}

// =============================================================================
// build
// =============================================================================

#[test]
#[serial]
fn build_with_missing_runner_fails() {
  let temp = TempDir::new().unwrap();
  std::fs::write(temp.path().join("demo.cpp"), "int x;\n").unwrap();

  extbuild_cmd(temp.path())
    .current_dir(temp.path())
    .env("EXTBUILD_NINJA", temp.path().join("no-such-ninja"))
    .args(["build", "demo", "demo.cpp"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("ninja is required"));

  assert!(!temp.path().join("extensions").join("demo").join("build.ninja").exists());
}

#[test]
#[serial]
#[cfg(unix)]
fn build_and_load_real_extension() {
  if !on_path("ninja") || !on_path("c++") {
    return;
  }
  let temp = TempDir::new().unwrap();
  std::fs::write(
    temp.path().join("answer.cpp"),
    "#include <extbuild/extension.h>\nEXTBUILD_EXTENSION { return 0; }\n",
  )
  .unwrap();

  extbuild_cmd(temp.path())
    .current_dir(temp.path())
    .args(["build", "answer", "answer.cpp"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Loaded extension 'answer'"));

  extbuild_cmd(temp.path())
    .current_dir(temp.path())
    .args(["build", "answer", "answer.cpp", "--no-load", "--format", "json"])
    .assert()
    .success()
    .stdout(predicate::str::contains("\"loaded\": false"))
    .stdout(predicate::str::contains("\"extra_cflags\": []"));
}

#[test]
#[serial]
#[cfg(unix)]
fn verbose_build_prints_runner_log_when_loading() {
  if !on_path("ninja") || !on_path("c++") {
    return;
  }
  let temp = TempDir::new().unwrap();
  std::fs::write(
    temp.path().join("chatty.cpp"),
    "#include <extbuild/extension.h>\nEXTBUILD_EXTENSION { return 0; }\n",
  )
  .unwrap();

  extbuild_cmd(temp.path())
    .current_dir(temp.path())
    .args(["build", "chatty", "chatty.cpp", "--verbose"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Loaded extension 'chatty'"))
    .stderr(predicate::str::contains("-c "))
    .stderr(predicate::str::contains("chatty.cpp"));
}

#[test]
#[serial]
#[cfg(unix)]
fn build_failure_reports_compiler_output() {
  if !on_path("ninja") || !on_path("c++") {
    return;
  }
  let temp = TempDir::new().unwrap();
  std::fs::write(temp.path().join("broken.cpp"), "this is not c++\n").unwrap();

  extbuild_cmd(temp.path())
    .current_dir(temp.path())
    .args(["build", "broken", "broken.cpp"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("error building extension 'broken'"))
    .stderr(predicate::str::contains("broken.cpp"));
}

// =============================================================================
// info
// =============================================================================

#[test]
fn info_text_runs() {
  let temp = TempDir::new().unwrap();
  extbuild_cmd(temp.path())
    .arg("info")
    .assert()
    .success()
    .stdout(predicate::str::contains("Toolchain:"))
    .stdout(predicate::str::contains("Extensions root"));
}

#[test]
fn info_json_reports_environment() {
  let temp = TempDir::new().unwrap();
  let output = extbuild_cmd(temp.path())
    .env("CXX", "clang++")
    .env("CUDA_HOME", temp.path().join("cuda"))
    .args(["info", "--format", "json"])
    .output()
    .unwrap();
  assert!(output.status.success());

  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(report["cxx"], "clang++");
  assert_eq!(
    report["cuda_home"].as_str().unwrap(),
    temp.path().join("cuda").to_str().unwrap()
  );
  assert_eq!(
    report["extensions_root"].as_str().unwrap(),
    temp.path().join("extensions").to_str().unwrap()
  );
  assert_eq!(report["ninja"], "ninja");
}
