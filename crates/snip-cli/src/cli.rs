use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "snip")]
#[command(about = "Trim filler from prompts before they are sent", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze text and report what would be removed
    Analyze {
        /// File to read; stdin when omitted
        file: Option<PathBuf>,

        /// Emit the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the cleaned text
    Clean {
        /// File to read; stdin when omitted
        file: Option<PathBuf>,
    },

    /// Start the control API server
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },
}
