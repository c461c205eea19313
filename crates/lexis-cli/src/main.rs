// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lexis_cli_config::runtime::LoggingConfig;
use lexis_cli_config::{load_config, CliOverrides, LogFormat, LogLevel};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod app;

/// Lexis - fill in stale translations across locale catalogs
#[derive(Parser, Debug)]
#[command(name = "lexis", version, about, long_about = None)]
struct Args {
	/// Path to custom configuration file
	#[arg(short, long, global = true)]
	config: Option<PathBuf>,

	/// Directory holding <language>.json catalogs
	#[arg(long, global = true)]
	catalog_dir: Option<PathBuf>,

	/// Source language code
	#[arg(long, global = true)]
	source: Option<String>,

	/// Target language code (repeatable)
	#[arg(short, long = "target", global = true)]
	targets: Vec<String>,

	/// Log level (overrides config)
	#[arg(short, long, global = true)]
	log_level: Option<String>,

	/// Output logs as JSON (overrides config)
	#[arg(long, global = true)]
	json_logs: bool,

	/// Print the summary as JSON
	#[arg(long, global = true)]
	json: bool,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
	/// Translate stale entries and save the updated catalogs (default)
	Repair,
	/// Report stale entries without translating or writing anything
	Check {
		/// Print every stale path
		#[arg(long)]
		list: bool,
	},
	/// Print the resolved configuration
	Config,
}

impl From<&Args> for CliOverrides {
	fn from(args: &Args) -> Self {
		Self {
			config_file: args.config.clone(),
			catalog_dir: args.catalog_dir.clone(),
			source_language: args.source.clone(),
			target_languages: if args.targets.is_empty() {
				None
			} else {
				Some(args.targets.clone())
			},
			log_level: args.log_level.clone(),
			log_format: if args.json_logs {
				Some("json".to_string())
			} else {
				None
			},
		}
	}
}

fn log_level_to_tracing(level: LogLevel) -> tracing::Level {
	match level {
		LogLevel::Trace => tracing::Level::TRACE,
		LogLevel::Debug => tracing::Level::DEBUG,
		LogLevel::Info => tracing::Level::INFO,
		LogLevel::Warn => tracing::Level::WARN,
		LogLevel::Error => tracing::Level::ERROR,
	}
}

fn init_tracing(logging: &LoggingConfig) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(format!("lexis={}", log_level_to_tracing(logging.level))));

	// stdout carries the summary
	match logging.format {
		LogFormat::Json => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().json().with_writer(std::io::stderr))
				.init();
		}
		LogFormat::Compact => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().compact().with_writer(std::io::stderr))
				.init();
		}
		LogFormat::Pretty => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().with_writer(std::io::stderr))
				.init();
		}
	}
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
	let args = Args::parse();

	let cli_overrides = CliOverrides::from(&args);
	let config = load_config(cli_overrides).context("failed to load configuration")?;

	init_tracing(&config.logging);

	info!(
		translator = %config.translator.kind,
		catalog_dir = %config.catalog.dir.display(),
		"starting lexis"
	);

	let output = app::OutputMode::from_json_flag(args.json);

	match args.command.unwrap_or(Command::Repair) {
		Command::Repair => app::run_repair(&config, output).await,
		Command::Check { list } => app::run_check(&config, output, list),
		Command::Config => app::print_config(&config),
	}
}
