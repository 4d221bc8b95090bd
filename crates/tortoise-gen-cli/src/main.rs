use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tortoise_gen_config::SchemaFormat;
use tracing_subscriber::EnvFilter;

mod commands;
mod utils;
use commands::{CheckArgs, GenerateArgs, cmd_check, cmd_generate, cmd_init, cmd_json_schema};

/// tortoise-gen command-line interface.
#[derive(Parser, Debug)]
#[command(name = "tortoise-gen", author, version, about)]
struct Cli {
    /// Show debug logs.
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize tortoise-gen.json with defaults.
    Init,
    /// Load and validate the schema and render the models without writing.
    Check {
        /// Schema format; overrides detection by file extension.
        #[arg(long, value_enum)]
        format: Option<SchemaFormat>,
    },
    /// Generate the models module.
    Generate {
        /// Schema file; overrides the config.
        #[arg(long)]
        schema: Option<PathBuf>,
        /// Schema format; overrides detection by file extension.
        #[arg(long, value_enum)]
        format: Option<SchemaFormat>,
        /// Output directory; overrides the config and the generator block.
        #[arg(short = 'o', long = "out")]
        out: Option<PathBuf>,
        /// Print the models module instead of writing files.
        #[arg(long)]
        dry_run: bool,
    },
    /// Emit JSON Schemas for schema documents and the config file.
    JsonSchema {
        #[arg(short = 'o', long = "out", default_value = "schemas")]
        out: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tortoise_gen={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Init => cmd_init(),
        Commands::Check { format } => cmd_check(CheckArgs { format }),
        Commands::Generate {
            schema,
            format,
            out,
            dry_run,
        } => cmd_generate(GenerateArgs {
            schema,
            format,
            out,
            dry_run,
        }),
        Commands::JsonSchema { out } => cmd_json_schema(out),
    }
}
