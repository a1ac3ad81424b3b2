use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "drive-duper")]
#[command(about = "Delete local media already stored on your cloud drive", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Interactively sweep a local directory (the default)
    Sweep,
    /// Print configuration values
    PrintConfig,
}
