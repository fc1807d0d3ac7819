//! portcullis unified CLI.
//!
//! Simulates the impact of conditional access policies on subject access.
//!
//! # Quick Start
//!
//! ```bash
//! # Evaluate access for a subject using the default dataset files
//! portcullis simulate user1
//!
//! # Explicit dataset paths, a fixed evaluation time, and the audit trace
//! portcullis simulate user1 -p policies.json -u users.json -c context.json \
//!     --at 09:30 --trace
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use portcullis_loader::{DEFAULT_CONTEXT_FILE, DEFAULT_POLICY_FILE, DEFAULT_SUBJECT_FILE};

/// portcullis - conditional access policy decisions.
#[derive(Parser)]
#[command(name = "portcullis")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information.
    Version,

    /// Evaluate whether a subject is granted access.
    Simulate {
        /// The id of the subject to evaluate access for.
        subject_id: String,

        /// Path to the policy JSON file.
        #[arg(short = 'p', long = "policies", default_value = DEFAULT_POLICY_FILE)]
        policy_file: PathBuf,

        /// Path to the subject directory JSON file.
        #[arg(short = 'u', long = "users", default_value = DEFAULT_SUBJECT_FILE)]
        subject_file: PathBuf,

        /// Path to the context JSON file.
        #[arg(short = 'c', long = "context", default_value = DEFAULT_CONTEXT_FILE)]
        context_file: PathBuf,

        /// Evaluate at this time of day (HH:MM) instead of the current time.
        #[arg(long)]
        at: Option<String>,

        /// Print one line per policy considered, with its disposition.
        #[arg(long)]
        trace: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Version => {
            commands::version::run();
            Ok(())
        }
        Commands::Simulate {
            subject_id,
            policy_file,
            subject_file,
            context_file,
            at,
            trace,
        } => commands::simulate::run(
            &subject_id,
            &policy_file,
            &subject_file,
            &context_file,
            at.as_deref(),
            trace,
        ),
    }
}
