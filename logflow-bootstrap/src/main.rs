// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # LogFlow — composition root
//!
//! Parses and validates the CLI, wires up an [`Engine`] over the built-in
//! plugin registry, and dispatches on the `run`/`validate` subcommand.
//! `run` loads a pipeline config, starts it, and blocks until a shutdown
//! signal is received; `validate` only checks the config file.

use std::process::ExitCode;
use std::time::Duration;

use logflow_bootstrap::cli::ValidatedCommand;
use logflow_bootstrap::exit_code::result_to_exit_code;
use logflow_bootstrap::shutdown::ShutdownCoordinator;
use logflow_domain::{LogFlowError, WorkerCount};
use logflow_runtime::{build_default_registry, load_pipeline_config, logging, Engine};

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let validated = match logflow_bootstrap::bootstrap_cli() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("logflow: {}", err);
            return logflow_bootstrap::exit_code::ExitCode::UsageError.into();
        }
    };

    result_to_exit_code(run(validated.command).await)
}

async fn run(command: ValidatedCommand) -> Result<(), LogFlowError> {
    match command {
        ValidatedCommand::Validate { config } => validate(&config),
        ValidatedCommand::Run { config, worker_threads } => run_pipeline(&config, worker_threads).await,
    }
}

fn validate(config_path: &std::path::Path) -> Result<(), LogFlowError> {
    let config = load_pipeline_config(config_path)?;
    config.validate()?;
    println!("'{}' is valid: {} source(s), {} processor(s), {} sink(s)", config.name, config.sources.len(), config.processors.len(), config.sinks.len());
    Ok(())
}

async fn run_pipeline(config_path: &std::path::Path, worker_threads: Option<usize>) -> Result<(), LogFlowError> {
    let mut config = load_pipeline_config(config_path)?;
    if let Some(threads) = worker_threads {
        config.worker_count = WorkerCount::new(threads);
    }
    config.validate()?;
    let name = config.name.clone();

    let (engine, mut events) = Engine::new(build_default_registry());
    engine.load_pipeline(config, false).await?;

    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            tracing::info!(?event, "pipeline event");
        }
    });

    engine.start_pipeline(&name).await?;
    tracing::info!(pipeline = %name, "pipeline started, awaiting shutdown signal");

    let coordinator = ShutdownCoordinator::new(Duration::from_secs(30));
    let signal_handler = logflow_bootstrap::signals::create_signal_handler();
    let shutdown_coordinator = coordinator.clone();
    signal_handler
        .wait_for_signal(Box::new(move || {
            shutdown_coordinator.initiate_shutdown();
        }))
        .await;

    engine.stop_pipeline(&name).await?;
    coordinator.complete_shutdown();
    tracing::info!(pipeline = %name, "pipeline stopped cleanly");
    Ok(())
}
