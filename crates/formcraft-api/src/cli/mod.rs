//! CLI command definitions for the `formcraft` binary.

pub mod check;
pub mod fill;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Fill, inspect and serve multi-step forms.
#[derive(Parser)]
#[command(name = "formcraft", version, about, long_about = None)]
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

    /// Base URL of the form store and quotation service.
    #[arg(long, env = "FORMCRAFT_API_URL", global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fill a form interactively in the terminal.
    Fill {
        /// Form config or record JSON file.
        #[arg(required_unless_present = "form_id", conflicts_with = "form_id")]
        config: Option<PathBuf>,

        /// Load a persisted form by id instead of a file.
        #[arg(long)]
        form_id: Option<String>,

        /// Read persisted forms from this directory instead of the API.
        #[arg(long, requires = "form_id")]
        forms_dir: Option<PathBuf>,

        /// Skip the quotation request on documentInfo steps.
        #[arg(long)]
        offline: bool,
    },

    /// Inspect a form config: step table, staging and warnings.
    Check {
        /// Form config or record JSON file.
        config: PathBuf,
    },

    /// Start the session REST API server.
    Serve {
        /// Port to listen on (defaults to `server.port` in config.toml).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to `server.host` in config.toml).
        #[arg(long)]
        host: Option<String>,

        /// Export spans through OpenTelemetry (stdout exporter).
        #[arg(long)]
        otel: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
