//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use super::Outcome;
use crate::{api, config::AppConfig, loader};
use statuseq_core::{Comparator, Comparison, StatusEqError};
use std::path::Path;

// =============================================================================
// COMPARE COMMAND
// =============================================================================

/// Load two documents and compare their statuses.
pub fn compare_files(
    comparator: &Comparator,
    old: &Path,
    new: &Path,
    typed: bool,
) -> Result<Comparison, StatusEqError> {
    let old_resource = loader::to_resource(loader::load_document(old)?, typed)?;
    let new_resource = loader::to_resource(loader::load_document(new)?, typed)?;
    comparator.compare(&old_resource, &new_resource)
}

/// Compare two resource documents and report the verdict.
pub fn cmd_compare(
    config: &AppConfig,
    old: &Path,
    new: &Path,
    typed: bool,
    show_diff: bool,
    json_mode: bool,
) -> Result<Outcome, StatusEqError> {
    let comparator = Comparator::with_options(config.compare.clone())?;
    let comparison = compare_files(&comparator, old, new, typed)?;

    tracing::debug!(
        old = %old.display(),
        new = %new.display(),
        typed,
        equal = comparison.equal,
        "Comparison finished"
    );

    if json_mode {
        let output = serde_json::json!({
            "equal": comparison.equal,
            "diff": comparison.diff,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
    } else if comparison.equal {
        println!("Statuses are equal");
    } else {
        println!("Statuses differ");
        if show_diff {
            match &comparison.diff {
                Some(diff) if !diff.is_empty() => {
                    println!();
                    println!("{}", diff);
                }
                _ => println!("(no field-level diff available)"),
            }
        }
    }

    Ok(if comparison.equal {
        Outcome::Success
    } else {
        Outcome::StatusChanged
    })
}

// =============================================================================
// CHECK-CONFIG COMMAND
// =============================================================================

/// Print the effective configuration.
pub fn cmd_check_config(config: &AppConfig, json_mode: bool) -> Result<Outcome, StatusEqError> {
    if json_mode {
        let output = serde_json::to_string_pretty(config)
            .map_err(|e| StatusEqError::SerializationError(e.to_string()))?;
        println!("{}", output);
    } else {
        println!("statuseq Configuration");
        println!("======================");
        print!("{}", config.to_toml_string()?);
    }
    Ok(Outcome::Success)
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    config: AppConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<Outcome, StatusEqError> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    println!("statuseq Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:           {}", host);
    println!("  Port:           {}", port);
    println!("  Conditions key: {}", config.compare.conditions_key);
    println!();
    println!("Endpoints:");
    println!("  POST /compare - Compare two resource statuses");
    println!("  GET  /config  - Effective comparison options");
    println!("  GET  /health  - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let state = api::AppState::from_config(&config)?;
    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, state).await?;
    Ok(Outcome::Success)
}
