//! Minimal Ninja file emitter.
//!
//! Statements are grouped into blocks; every block is followed by one blank
//! line. See <https://ninja-build.org/manual.html#ref_lexer> for the escaping
//! rules.

use std::fmt::Write as _;

/// Escapes a path for use in a `build` statement.
pub fn escape_path(path: &str) -> String {
  let mut escaped = String::with_capacity(path.len());
  for c in path.chars() {
    match c {
      '$' => escaped.push_str("$$"),
      ' ' => escaped.push_str("$ "),
      ':' => escaped.push_str("$:"),
      c => escaped.push(c),
    }
  }
  escaped
}

/// Escapes a variable value. Only `$` is special on the right of `=`.
pub fn escape_value(value: &str) -> String {
  value.replace('$', "$$")
}

/// Quotes one argument for `/bin/sh`, which is how Ninja runs commands on
/// Unix. Arguments made only of safe characters are returned unchanged.
pub fn shell_quote(arg: &str) -> String {
  let safe = !arg.is_empty()
    && arg
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || "-_./=+:,@%".contains(c));
  if safe {
    return arg.to_string();
  }
  format!("'{}'", arg.replace('\'', "'\\''"))
}

/// Quotes one argument for a Windows command line. Ninja hands commands to
/// `CreateProcess` there, which splits on unquoted whitespace.
pub fn windows_quote(arg: &str) -> String {
  if !arg.is_empty() && !arg.contains([' ', '\t', '"']) {
    return arg.to_string();
  }
  format!("\"{}\"", arg.replace('"', "\\\""))
}

/// Accumulates Ninja statements into a string.
#[derive(Debug, Default)]
pub struct NinjaWriter {
  out: String,
}

impl NinjaWriter {
  pub fn new() -> Self {
    Self { out: String::new() }
  }

  /// `key = value`, with the value written as given.
  pub fn variable(&mut self, key: &str, value: &str) -> &mut Self {
    let _ = writeln!(self.out, "{} = {}", key, value);
    self
  }

  pub fn rule(&mut self, name: &str, command: &str) -> &mut Self {
    let _ = writeln!(self.out, "rule {}", name);
    let _ = writeln!(self.out, "  command = {}", command);
    self
  }

  /// Adds `depfile`/`deps` to the rule just written.
  pub fn depfile(&mut self, depfile: &str, deps: &str) -> &mut Self {
    let _ = writeln!(self.out, "  depfile = {}", depfile);
    let _ = writeln!(self.out, "  deps = {}", deps);
    self
  }

  /// `build <output>: <rule> <inputs...>`; output and inputs must be escaped.
  pub fn build<S: AsRef<str>>(&mut self, output: &str, rule: &str, inputs: &[S]) -> &mut Self {
    let _ = write!(self.out, "build {}: {}", output, rule);
    for input in inputs {
      let _ = write!(self.out, " {}", input.as_ref());
    }
    self.out.push('\n');
    self
  }

  /// `default <target>`
  pub fn default_target(&mut self, target: &str) -> &mut Self {
    let _ = writeln!(self.out, "default {}", target);
    self
  }

  /// Closes the current block.
  pub fn end_block(&mut self) -> &mut Self {
    self.out.push('\n');
    self
  }

  pub fn finish(self) -> String {
    self.out
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn escape_path_handles_specials() {
    assert_eq!(escape_path("/src/my file.cpp"), "/src/my$ file.cpp");
    assert_eq!(escape_path("C:/src/a.cpp"), "C$:/src/a.cpp");
    assert_eq!(escape_path("/src/$HOME.cpp"), "/src/$$HOME.cpp");
    assert_eq!(escape_path("/plain/a.cpp"), "/plain/a.cpp");
  }

  #[test]
  fn shell_quote_wraps_only_when_needed() {
    assert_eq!(shell_quote("/opt/cuda/include"), "/opt/cuda/include");
    assert_eq!(shell_quote("/tmp/my inc"), "'/tmp/my inc'");
    assert_eq!(shell_quote("/tmp/it's"), "'/tmp/it'\\''s'");
    assert_eq!(shell_quote(""), "''");
  }

  #[test]
  fn windows_quote_wraps_only_when_needed() {
    assert_eq!(windows_quote("C:/cuda/bin/nvcc.exe"), "C:/cuda/bin/nvcc.exe");
    assert_eq!(
      windows_quote("C:/Program Files/NVIDIA GPU Computing Toolkit/CUDA/v12.4"),
      "\"C:/Program Files/NVIDIA GPU Computing Toolkit/CUDA/v12.4\""
    );
  }

  #[test]
  fn escape_value_only_touches_dollar() {
    assert_eq!(escape_value("-DX=$Y -I/a b"), "-DX=$$Y -I/a b");
  }

  #[test]
  fn blocks_are_separated_by_blank_lines() {
    let mut w = NinjaWriter::new();
    w.variable("cxx", "c++").end_block();
    w.rule("compile", "$cxx -c $in -o $out").depfile("$out.d", "gcc").end_block();
    w.build("a.o", "compile", &["/src/a.cpp"]).end_block();
    w.default_target("a.o").end_block();

    assert_eq!(
      w.finish(),
      "cxx = c++\n\n\
       rule compile\n  command = $cxx -c $in -o $out\n  depfile = $out.d\n  deps = gcc\n\n\
       build a.o: compile /src/a.cpp\n\n\
       default a.o\n\n"
    );
  }
}
