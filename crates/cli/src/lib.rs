mod resolve;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "deployscope",
    version,
    about = "Resolves manifest Class-Path dependencies of nested deployments",
    long_about = "Deployscope scans deployment archives, follows the Class-Path entries of every \
                  manifest it finds and reports the module dependencies each deployable unit \
                  needs, including modules created for jars that no unit exposes."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the class path of one or more deployments
    #[command(
        long_about = "Builds the deployment tree of each path (an exploded .ear directory or a \
                      single archive), resolves every unit's Class-Path entries and prints \
                      dependencies, created modules and ignored entries."
    )]
    Resolve {
        /// Deployment paths to resolve
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,

        /// JSON resolver configuration
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = deployscope_runtime::init_logging("cli", false);

    match cli.command {
        Commands::Resolve {
            paths,
            config,
            format,
        } => resolve::run(paths, config, format),
    }
}
