mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "terraloom")]
#[command(about = "Declare an Alibaba Cloud topology and synthesize it to Terraform JSON", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the resource graph and write the synthesized stack
    Synth {
        /// Stack file (default: discovered from the current directory)
        #[arg(short, long, env = "TERRALOOM_STACK_PATH")]
        file: Option<PathBuf>,
        /// Output directory
        #[arg(short, long, default_value = "terraloom.out")]
        out: PathBuf,
    },
    /// Build the resource graph without writing anything
    Validate {
        /// Stack file (default: discovered from the current directory)
        #[arg(short, long, env = "TERRALOOM_STACK_PATH")]
        file: Option<PathBuf>,
    },
    /// Show version information
    Version,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Synth { file, out } => commands::synth::handle(file, &out),
        Commands::Validate { file } => commands::validate::handle(file),
        Commands::Version => {
            println!("terraloom {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
