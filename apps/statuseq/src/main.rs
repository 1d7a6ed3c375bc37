//! # statuseq
//!
//! The main binary for the statuseq status comparison engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                apps/statuseq (THE BINARY)             │
//! │                                                       │
//! │  ┌─────────────┐    ┌─────────────┐    ┌──────────┐   │
//! │  │    CLI      │    │  HTTP API   │    │  Config  │   │
//! │  │   (clap)    │    │   (axum)    │    │  (toml)  │   │
//! │  └──────┬──────┘    └──────┬──────┘    └────┬─────┘   │
//! │         └──────────────────┼────────────────┘         │
//! │                            ▼                          │
//! │                   ┌────────────────┐                  │
//! │                   │ statuseq-core  │                  │
//! │                   │  (THE ENGINE)  │                  │
//! │                   └────────────────┘                  │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Compare two snapshots (exit 0 = equal, 2 = differ, 1 = error)
//! statuseq compare --old before.yaml --new after.yaml --show-diff
//!
//! # Start the HTTP server
//! statuseq server --host 0.0.0.0 --port 8080
//! ```

use clap::Parser;
use statuseq::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    init_tracing(cli.verbose);

    let is_server = cli.command.as_ref().is_some_and(cli::Commands::is_server);
    if is_server && !cli.quiet {
        print_banner();
    }

    match cli::execute(cli).await {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            tracing::error!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Initialize tracing. `STATUSEQ_LOG_FORMAT=json` enables machine-parseable output.
fn init_tracing(verbose: bool) {
    let log_format = std::env::var("STATUSEQ_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if verbose {
        "statuseq=debug,statuseq_core=debug,tower_http=debug"
    } else {
        "statuseq=info,statuseq_core=warn,tower_http=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    // Logs go to stderr so command output on stdout stays parseable.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

/// Print the statuseq startup banner.
fn print_banner() {
    println!(
        r#"
  ┌─┐┌┬┐┌─┐┌┬┐┬ ┬┌─┐┌─┐┌─┐
  └─┐ │ ├─┤ │ │ │└─┐├┤ │─┼┐
  └─┘ ┴ ┴ ┴ ┴ └─┘└─┘└─┘└─┘└

  Status Equivalence Server v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
