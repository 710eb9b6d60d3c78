mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::{ExtensionArgs, cmd_build, cmd_emit, cmd_info};
use crate::output::{OutputFormat, print_error};

/// extbuild - just-in-time C++/CUDA extension builder
#[derive(Parser)]
#[command(name = "extbuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Log each build step
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build an extension and load it to check its entry point
  Build {
    #[command(flatten)]
    extension: ExtensionArgs,

    /// Stop after the build; do not load the artifact
    #[arg(long)]
    no_load: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
  },

  /// Print the build description for an extension without building it
  Emit {
    #[command(flatten)]
    extension: ExtensionArgs,

    /// Write the description to this file instead of stdout
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,
  },

  /// Show the detected toolchain
  Info {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
  },
}

fn init_logging(verbose: bool) {
  let default_level = if verbose { "info" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  let result = match cli.command {
    Commands::Build {
      extension,
      no_load,
      format,
    } => cmd_build(&extension, cli.verbose, no_load, format),
    Commands::Emit { extension, out } => cmd_emit(&extension, out.as_deref()),
    Commands::Info { format } => cmd_info(format),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}
