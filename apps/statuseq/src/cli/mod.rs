//! # statuseq CLI Module
//!
//! This module implements the CLI interface for statuseq.
//!
//! ## Available Commands
//!
//! - `compare` - Compare the statuses of two resource documents
//! - `check-config` - Print the effective configuration
//! - `server` - Start the HTTP server

mod commands;

use crate::config::AppConfig;
use clap::{Parser, Subcommand};
use statuseq_core::StatusEqError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// statuseq - semantic status comparison
///
/// Decides whether two snapshots of a resource's status are equivalent,
/// ignoring condition ordering and volatile condition fields.
#[derive(Parser, Debug)]
#[command(name = "statuseq")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Path to the configuration file (default: statuseq.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare the statuses of two resource documents
    Compare {
        /// Document observed before the operation (JSON or YAML)
        #[arg(long)]
        old: PathBuf,

        /// Document observed after the operation (JSON or YAML)
        #[arg(long)]
        new: PathBuf,

        /// Decode known kinds into their typed representation
        #[arg(short, long)]
        typed: bool,

        /// Print the field-level diff when the statuses differ
        #[arg(short = 'd', long)]
        show_diff: bool,
    },

    /// Load and print the effective configuration
    CheckConfig,

    /// Start HTTP server
    Server {
        /// Host to bind to (overrides the configuration file)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides the configuration file)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

impl Commands {
    /// Whether this command starts the long-running server.
    #[must_use]
    pub const fn is_server(&self) -> bool {
        matches!(self, Self::Server { .. })
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// How a successfully executed command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command completed; for `compare`, the statuses are equal.
    Success,
    /// `compare` found the statuses different.
    StatusChanged,
}

impl Outcome {
    /// Process exit code: 0 on success, 2 when the statuses differ.
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::StatusChanged => 2,
        }
    }
}

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<Outcome, StatusEqError> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Compare {
            old,
            new,
            typed,
            show_diff,
        }) => cmd_compare(&config, &old, &new, typed, show_diff, json_mode),
        Some(Commands::Server { host, port }) => cmd_server(config, host, port).await,
        Some(Commands::CheckConfig) | None => cmd_check_config(&config, json_mode),
    }
}

// =============================================================================
// TESTS
// =============================================================================
