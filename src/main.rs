//! Stackflame CLI
//!
//! Converts JVM thread and core dumps into weighted call trees for
//! flame-graph rendering.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use stackflame::commands::{execute_analyze, execute_validate, validate_args, AnalyzeArgs};
use stackflame::{AnalysisSettings, LeafValuePolicy};

/// Stackflame - flame graph analysis for JVM thread and core dumps
#[derive(Parser, Debug)]
#[command(name = "stackflame")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a dump file into a flame graph tree
    Analyze {
        /// Path to the dump file (IBM javacore, IBM SystemOut hang
        /// report, or OpenJDK thread dump)
        input: PathBuf,

        /// Output path for the tree JSON
        #[arg(short, long, default_value = "flamegraph.json")]
        output: PathBuf,

        /// Also write collapsed stacks to this path
        #[arg(long)]
        folded: Option<PathBuf>,

        /// Also render an SVG flamegraph to this path
        #[arg(short, long)]
        flamegraph: Option<PathBuf>,

        /// Flamegraph title (defaults to the input file name)
        #[arg(long)]
        title: Option<String>,

        /// Inject "waiting on" / "parked" annotation frames
        #[arg(long)]
        waiting_on: bool,

        /// Inject "locked" / "entered lock" annotation frames
        #[arg(long)]
        entered_lock: bool,

        /// Count every leaf as one sample instead of its accumulated
        /// self count
        #[arg(long)]
        unit_leaves: bool,
    },

    /// Validate a previously written tree JSON file
    Validate {
        /// Path to the tree JSON file
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Analyze {
            input,
            output,
            folded,
            flamegraph,
            title,
            waiting_on,
            entered_lock,
            unit_leaves,
        } => {
            let args = AnalyzeArgs {
                input,
                output_json: output,
                output_folded: folded,
                output_svg: flamegraph,
                title,
                settings: AnalysisSettings {
                    include_wait_or_park_annotations: waiting_on,
                    include_lock_annotations: entered_lock,
                },
                leaf_policy: if unit_leaves {
                    LeafValuePolicy::UnitLeaves
                } else {
                    LeafValuePolicy::CountedLeaves
                },
            };

            // Validate args first
            validate_args(&args)?;

            // Execute analysis
            execute_analyze(args)?;
        }

        Commands::Validate { file } => {
            execute_validate(&file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Display version information
fn display_version() {
    println!("Stackflame v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Flame graph analysis for JVM thread and core dumps.");
}
