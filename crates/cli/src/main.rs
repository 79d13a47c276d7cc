use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;
mod output;

use cmd::{CleanTarget, Context};
use output::{OutputFormat, print_error};

/// mbuild - package and provision Python post-processing commands
#[derive(Parser)]
#[command(name = "mbuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Repository root (default: current directory)
  #[arg(long, global = true, env = "MBUILD_ROOT")]
  root: Option<PathBuf>,

  /// Manifest path, relative to the root (default: mbuild.toml if present)
  #[arg(long, global = true, env = "MBUILD_MANIFEST")]
  manifest: Option<PathBuf>,

  /// Version embedded in archive names, overriding the manifest
  #[arg(long = "set-version", global = true, env = "MBUILD_VERSION")]
  set_version: Option<String>,

  /// Branch name to use instead of asking git
  #[arg(long, global = true, env = "MBUILD_BRANCH")]
  branch: Option<String>,

  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Print the list of targets
  Usage,

  /// Stage the project into the build directory
  Build,

  /// Stage the project and pack it into a versioned archive
  Pack,

  /// Delete archives of the project
  #[command(alias = "clean_pack")]
  CleanPack,

  /// Delete the build directory
  #[command(alias = "clean_build")]
  CleanBuild,

  /// Delete the build directory, archives and environment
  Clean,

  /// Run tests
  Test,

  /// Delete test artifacts
  #[command(alias = "clean_test")]
  CleanTest,

  /// Create the conda environment and install the SDK
  Venv {
    /// Rebuild the environment even if it exists
    #[arg(short, long)]
    force: bool,
  },

  /// Delete the conda environment
  #[command(alias = "clean_venv")]
  CleanVenv,

  /// Create the environment if needed and generate command entry points
  #[command(alias = "pp_cmd")]
  PpCmd,

  /// Write the default service config if it does not exist
  #[command(alias = "otl_v1_config.ini")]
  Config,

  /// Prepare a development environment linked to the working copy
  Dev,

  /// Print the branch token used in archive names
  Branch,

  /// Write a default mbuild.toml
  Init,
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{err:#}"));
      ExitCode::FAILURE
    }
  }
}

fn run(cli: Cli) -> anyhow::Result<()> {
  let Some(command) = cli.command else {
    cmd::print_usage();
    return Ok(());
  };

  // These do not need a manifest.
  match command {
    Commands::Usage => {
      cmd::print_usage();
      return Ok(());
    }
    Commands::Test => {
      cmd::cmd_test();
      return Ok(());
    }
    Commands::CleanTest => {
      cmd::cmd_clean_test();
      return Ok(());
    }
    Commands::Init => return cmd::cmd_init(cli.root.as_deref()),
    _ => {}
  }

  let ctx = Context::load(
    cli.root.as_deref(),
    cli.manifest.as_deref(),
    cli.set_version.as_deref(),
    cli.branch,
    cli.output,
  )?;

  match command {
    Commands::Build => cmd::cmd_build(&ctx),
    Commands::Pack => cmd::cmd_pack(&ctx),
    Commands::CleanPack => cmd::cmd_clean(&ctx, CleanTarget::Pack),
    Commands::CleanBuild => cmd::cmd_clean(&ctx, CleanTarget::Build),
    Commands::Clean => cmd::cmd_clean(&ctx, CleanTarget::All),
    Commands::Venv { force } => cmd::cmd_venv(&ctx, force),
    Commands::CleanVenv => cmd::cmd_clean(&ctx, CleanTarget::Venv),
    Commands::PpCmd => cmd::cmd_pp_cmd(&ctx),
    Commands::Config => cmd::cmd_config(&ctx),
    Commands::Dev => cmd::cmd_dev(&ctx),
    Commands::Branch => cmd::cmd_branch(&ctx),
    Commands::Usage | Commands::Test | Commands::CleanTest | Commands::Init => unreachable!("handled above"),
  }
}
