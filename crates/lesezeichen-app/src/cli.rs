// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line surface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "lesezeichen", version, about = "Remove unwanted PDF bookmarks")]
pub struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Remove bookmarks whose titles contain a pattern, promoting their children.
    Filter(FilterArgs),

    /// Print the bookmark tree of a PDF.
    Show {
        input: PathBuf,
    },

    /// Process a single request in this process and print a JSON reply.
    #[command(hide = true)]
    Worker {
        #[arg(long)]
        request: String,
    },
}

#[derive(Debug, clap::Args)]
pub struct FilterArgs {
    /// PDF to filter.
    pub input: PathBuf,

    /// Output path. Defaults to `<name>_output.pdf` in the configured work
    /// dir, or next to the input.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Comma-separated title patterns. Repeatable. Replaces the configured list.
    #[arg(long = "filter", short = 'f', value_name = "PATTERNS")]
    pub filters: Vec<String>,

    /// Wall-clock limit in seconds.
    #[arg(long, env = "LESEZEICHEN_TIMEOUT")]
    pub timeout: Option<u64>,

    /// JSON config file.
    #[arg(long, env = "LESEZEICHEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Filter on a thread instead of a worker process.
    #[arg(long)]
    pub in_process: bool,

    /// Print the job outcome as JSON.
    #[arg(long)]
    pub json: bool,
}

impl FilterArgs {
    /// All `-f` values split on commas, or `None` when no flag was given.
    pub fn patterns(&self) -> Option<Vec<String>> {
        if self.filters.is_empty() {
            return None;
        }
        Some(
            self.filters
                .iter()
                .flat_map(|list| list.split(','))
                .map(str::to_string)
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter_args(argv: &[&str]) -> FilterArgs {
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Filter(args) => args,
            other => panic!("expected filter, got {other:?}"),
        }
    }

    #[test]
    fn filter_defaults() {
        let args = filter_args(&["lesezeichen", "filter", "book.pdf"]);
        assert_eq!(args.input, PathBuf::from("book.pdf"));
        assert!(args.output.is_none());
        assert!(args.patterns().is_none());
        assert!(!args.in_process);
    }

    #[test]
    fn repeated_filters_are_merged() {
        let args = filter_args(&[
            "lesezeichen",
            "filter",
            "book.pdf",
            "-f",
            "draft,todo",
            "--filter",
            "scratch",
            "-o",
            "clean.pdf",
        ]);
        assert_eq!(
            args.patterns(),
            Some(vec!["draft".to_string(), "todo".to_string(), "scratch".to_string()])
        );
        assert_eq!(args.output, Some(PathBuf::from("clean.pdf")));
    }

    #[test]
    fn worker_takes_request() {
        let cli = Cli::try_parse_from(["lesezeichen", "worker", "--request", "{}"]).unwrap();
        assert!(matches!(cli.command, Command::Worker { request } if request == "{}"));
    }

    #[test]
    fn show_requires_input() {
        assert!(Cli::try_parse_from(["lesezeichen", "show"]).is_err());
    }
}
