//! # CLI Argument Definitions

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "formwork")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Validate JSON input against declarative form definitions")]
pub struct Cli {
    /// Configuration file (defaults to an optional `formwork.toml` in the working directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate input against a definition; exits with 1 when the input is invalid
    Validate {
        /// Form definition file (.toml, .json or .yaml)
        #[arg(short, long)]
        definition: PathBuf,

        /// Model as inline JSON or a path to a JSON file
        #[arg(short, long, default_value = "{}")]
        model: String,

        /// Submitted input as inline JSON or a path to a JSON file
        #[arg(short, long)]
        input: String,

        /// Print the model with the input written back instead of the error map
        #[arg(long)]
        sync: bool,
    },
    /// Print the compiled property tree of a definition
    Inspect {
        /// Form definition file (.toml, .json or .yaml)
        #[arg(short, long)]
        definition: PathBuf,
    },
}
