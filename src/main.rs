//! # APEX Application Exporter
//!
//! Exports Oracle APEX application definitions to SQL files by calling
//! `apex_export.get_application` over a single database connection.
//!
//! The application follows the **Hexagonal Architecture** (Ports and Adapters):
//! the orchestrator only knows the `ApexExportPort` and `ArtifactPort` traits,
//! with Oracle and the local filesystem plugged in as adapters.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ports;

use crate::application::orchestrator::Orchestrator;
use crate::application::runtime;
use crate::config::{AppConfig, CliArgs};
use crate::infrastructure::local_storage::local_artifact_adapter::LocalArtifactAdapter;
use clap::{CommandFactory, Parser};
use log::{error, info};
use std::process;

fn main() {
    // 1. Parse Arguments
    let args = CliArgs::parse();

    // 2. Load Config
    let config = match AppConfig::load(&args) {
        Ok(c) => c,
        Err(e) => {
            runtime::init_logging(args.debug);
            error!("Failed to load config: {}", e);
            process::exit(1);
        }
    };

    // 3. Initialize Logging
    runtime::init_logging(config.debug_mode);
    if config.debug_mode {
        log::debug!("Debug log enabled");
    }
    config.log_summary();

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        let _ = CliArgs::command().print_help();
        process::exit(1);
    }

    // 4. Connect
    let export_port = match runtime::connect(&config) {
        Ok(adapter) => adapter,
        Err(e) => {
            error!("Failed to connect: {}", e);
            process::exit(1);
        }
    };
    let artifact_port = LocalArtifactAdapter::new(config.export.output_dir.clone());

    // 5. Run Orchestrator
    let orchestrator = Orchestrator::new(Box::new(export_port), Box::new(artifact_port), config);

    info!("Starting Export process...");
    let exit_code = match orchestrator.run() {
        Ok(results) => {
            let success_count = results.iter().filter(|r| r.is_success()).count();
            info!(
                "Export finished. {}/{} applications successful.",
                success_count,
                results.len()
            );
            if success_count == results.len() {
                0
            } else {
                1
            }
        }
        Err(e) => {
            error!("Orchestrator failed: {:?}", e);
            1
        }
    };

    // Close the session before exiting.
    drop(orchestrator);
    process::exit(exit_code);
}
