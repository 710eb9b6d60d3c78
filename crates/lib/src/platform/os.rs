use std::fmt;

/// Operating system variants extbuild knows how to link for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
  Linux,
  MacOs,
  Windows,
}

impl Os {
  /// Detect the current operating system at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::OS {
      "linux" => Some(Self::Linux),
      "macos" => Some(Self::MacOs),
      "windows" => Some(Self::Windows),
      _ => None,
    }
  }

  /// The current OS, treating unknown Unix-likes as Linux.
  pub fn current_or_linux() -> Self {
    Self::current().unwrap_or(Self::Linux)
  }

  /// Returns the lowercase string identifier for this OS
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Linux => "linux",
      Self::MacOs => "darwin",
      Self::Windows => "windows",
    }
  }

  /// File extension of a shared library, without the leading dot.
  pub fn shared_lib_extension(&self) -> &'static str {
    match self {
      Self::Linux => "so",
      Self::MacOs => "dylib",
      Self::Windows => "dll",
    }
  }

  /// Linker flags needed to leave symbols unresolved until load time.
  ///
  /// The darwin linker rejects undefined symbols in a shared library unless
  /// told otherwise; the others accept them by default.
  pub fn undefined_symbols_flags(&self) -> &'static [&'static str] {
    match self {
      Self::MacOs => &["-undefined dynamic_lookup"],
      Self::Linux | Self::Windows => &[],
    }
  }

  /// Name of the utility that finds an executable on PATH.
  pub fn which_command(&self) -> &'static str {
    match self {
      Self::Windows => "where",
      Self::Linux | Self::MacOs => "which",
    }
  }

  /// Executable file name for a program on this OS.
  pub fn exe_name(&self, program: &str) -> String {
    match self {
      Self::Windows => format!("{}.exe", program),
      Self::Linux | Self::MacOs => program.to_string(),
    }
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
