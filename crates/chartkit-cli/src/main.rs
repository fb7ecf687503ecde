//! chartkit CLI - synthesize Kubernetes manifests from typed charts

use chartkit_core::OutputFormat;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod error;
mod exit_codes;
mod sample;
mod util;

use error::Result;

#[derive(Parser)]
#[command(name = "chartkit")]
#[command(author = "chartkit Contributors")]
#[command(version)]
#[command(about = "Synthesize Kubernetes manifests from typed charts", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

/// Document format on the command line
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum FormatArg {
    #[default]
    Yaml,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Yaml => OutputFormat::Yaml,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize the sample app into an output directory
    Synth {
        /// Output directory
        #[arg(short, long, env = "CHARTKIT_OUTDIR", default_value = "dist")]
        output_dir: PathBuf,

        /// Document format
        #[arg(long, value_enum, default_value_t = FormatArg::Yaml)]
        format: FormatArg,
    },

    /// List the charts of the sample app without writing anything
    List {
        /// Document format used for the file names
        #[arg(long, value_enum, default_value_t = FormatArg::Yaml)]
        format: FormatArg,
    },

    /// List the resources found in a synthesized output directory
    Inspect {
        /// Output directory to read
        #[arg(default_value = "dist")]
        dir: PathBuf,
    },
}

/// Install the log subscriber; `RUST_LOG` wins over `--debug`
fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Synth { output_dir, format } => commands::synth::run(&output_dir, format.into()),
        Commands::List { format } => commands::list::run(format.into()),
        Commands::Inspect { dir } => commands::inspect::run(&dir),
    }
}

fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();

    if cli.debug {
        // SAFETY: We're the only thread at this point (start of main)
        unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
    }
    init_tracing(cli.debug);

    if let Err(err) = run(cli) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }

    std::process::exit(exit_codes::SUCCESS);
}
