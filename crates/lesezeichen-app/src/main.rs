// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Lesezeichen — PDF bookmark filter
//
// Entry point. Initialises logging and dispatches the subcommand. Logs go to
// stderr; stdout is reserved for results and the worker's JSON reply.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use lesezeichen_core::human_errors::humanize_error;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let default_level = if cli.debug { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Command::Filter(args) => commands::filter(args).await,
        Command::Show { input } => commands::show(&input),
        Command::Worker { request } => commands::worker(&request),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "Lesezeichen failed");
            let human = humanize_error(&err);
            eprintln!("{}", human.message);
            eprintln!("{}", human.suggestion);
            ExitCode::FAILURE
        }
    }
}
