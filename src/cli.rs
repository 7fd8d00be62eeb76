// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: One subcommand per lifecycle operation, plus detect.

use clap::{Parser, Subcommand};
use hatch::runtime::{Operation, RuntimeIdentity};
use hatch::types::{ContainerName, ImageRef};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hatch")]
#[command(about = "Container lifecycle operations for whichever engine this host runs")]
#[command(version)]
pub struct Cli {
    /// Use this runtime instead of detecting one. Wins over HATCH_RUNTIME and
    /// the config file.
    #[arg(long, global = true)]
    pub runtime: Option<RuntimeIdentity>,

    /// Path to a config file (default: hatch.yml in the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the detected platform and the transport that would be used
    Detect,

    /// Show container status
    Status { name: ContainerName },

    /// Start a container
    Start { name: ContainerName },

    /// Stop a container
    Stop { name: ContainerName },

    /// Create a container from an image
    Create { name: ContainerName, image: ImageRef },

    /// List containers
    List,

    /// Show full container details
    Inspect { name: ContainerName },

    /// Restart a container
    Restart { name: ContainerName },

    /// Remove a container
    Remove { name: ContainerName },

    /// Fetch container logs
    Logs { name: ContainerName },
}

impl Commands {
    /// The lifecycle operation this command runs, if any.
    pub fn operation(&self) -> Option<Operation<'_>> {
        let op = match self {
            Commands::Detect => return None,
            Commands::Status { name } => Operation::Status(name),
            Commands::Start { name } => Operation::Start(name),
            Commands::Stop { name } => Operation::Stop(name),
            Commands::Create { name, image } => Operation::Create { name, image },
            Commands::List => Operation::List,
            Commands::Inspect { name } => Operation::Inspect(name),
            Commands::Restart { name } => Operation::Restart(name),
            Commands::Remove { name } => Operation::Remove(name),
            Commands::Logs { name } => Operation::Logs(name),
        };
        Some(op)
    }
}
