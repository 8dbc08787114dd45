//! CLI command definitions for the `mindmate` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod key;
pub mod screen;
pub mod session;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// MindMate chat session engine.
#[derive(Parser)]
#[command(name = "mindmate", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (defaults to the configured port).
        #[arg(long, short)]
        port: Option<u16>,

        /// Host to bind to (defaults to the configured host).
        #[arg(long)]
        host: Option<String>,
    },

    /// Mint an API credential. The key is shown once.
    #[command(name = "issue-key")]
    IssueKey {
        /// Pseudonym to bind the key to (random when omitted).
        #[arg(long)]
        pseudonym: Option<String>,
    },

    /// Run the crisis detector over a piece of text.
    Screen {
        /// Text to screen.
        text: String,
    },

    /// List the sessions of a pseudonym.
    Sessions {
        /// Owner pseudonym.
        #[arg(long)]
        pseudonym: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
