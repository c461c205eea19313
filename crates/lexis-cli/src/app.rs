// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Command implementations.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use lexis_cli_config::{LexisConfig, TranslatorConfig, TranslatorKind};
use lexis_common_catalog::FileCatalogStore;
use lexis_repair::{
	has_failures, LanguageRun, PacingConfig, RepairConfig, RepairPipeline, StaleScan,
	SummaryWriter,
};
use lexis_translate::{GoogleTranslateClient, LibreTranslateClient, Translator};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
	Text,
	Json,
}

impl OutputMode {
	pub fn from_json_flag(json: bool) -> Self {
		if json {
			Self::Json
		} else {
			Self::Text
		}
	}
}

pub fn build_translator(config: &TranslatorConfig) -> Result<Arc<dyn Translator>> {
	let api_key = config.api_key.as_ref().map(|key| key.expose().clone());

	match config.kind {
		TranslatorKind::Google => {
			let Some(api_key) = api_key else {
				bail!(
					"Google translator requires an API key. Set LEXIS_TRANSLATE_API_KEY or GOOGLE_TRANSLATE_API_KEY"
				);
			};
			let client = GoogleTranslateClient::new(api_key, config.timeout())
				.context("failed to create Google translation client")?
				.with_base_url(config.base_url.clone());
			Ok(Arc::new(client))
		}
		TranslatorKind::LibreTranslate => {
			let client = LibreTranslateClient::new(config.base_url.clone(), api_key, config.timeout())
				.context("failed to create LibreTranslate client")?;
			Ok(Arc::new(client))
		}
	}
}

pub fn repair_config(config: &LexisConfig) -> RepairConfig {
	RepairConfig::new(
		config.catalog.source_language.clone(),
		config.catalog.target_languages.clone(),
	)
	.with_batch_size(config.repair.batch_size)
	.with_min_length(config.repair.min_length)
	.with_exclusions(config.repair.exclusions.iter().cloned())
	.with_max_concurrent_languages(config.repair.max_concurrent_languages)
	.with_pacing(PacingConfig {
		inter_batch_delay: config.pacing.inter_batch_delay(),
		cooldown: config.pacing.cooldown(),
		cooldown_backoff_factor: config.pacing.cooldown_backoff_factor,
		max_cooldown: config.pacing.max_cooldown(),
	})
}

fn file_store(config: &LexisConfig) -> Arc<FileCatalogStore> {
	Arc::new(FileCatalogStore::new(config.catalog.dir.clone()))
}

pub async fn run_repair(config: &LexisConfig, output: OutputMode) -> Result<ExitCode> {
	let translator = build_translator(&config.translator)?;
	let runs = repair_with(config, translator, output, io::stdout()).await;
	Ok(exit_code(&runs))
}

pub(crate) async fn repair_with<W: Write>(
	config: &LexisConfig,
	translator: Arc<dyn Translator>,
	output: OutputMode,
	out: W,
) -> Vec<LanguageRun> {
	let runs = RepairPipeline::new(file_store(config), translator, repair_config(config))
		.run()
		.await;

	let mut writer = SummaryWriter::new(out);
	match output {
		OutputMode::Text => writer.write_runs(&runs),
		OutputMode::Json => writer.write_json(&runs),
	}

	runs
}

fn exit_code(runs: &[LanguageRun]) -> ExitCode {
	if has_failures(runs) {
		warn!("one or more languages could not be saved");
		ExitCode::FAILURE
	} else {
		info!("repair complete");
		ExitCode::SUCCESS
	}
}

/// Dry run: no API key needed, nothing is written.
pub fn run_check(config: &LexisConfig, output: OutputMode, list: bool) -> Result<ExitCode> {
	check_with(config, output, list, io::stdout());
	Ok(ExitCode::SUCCESS)
}

pub(crate) fn check_with<W: Write>(config: &LexisConfig, output: OutputMode, list: bool, out: W) {
	let checks = StaleScan::new(file_store(config), repair_config(config)).check();

	let mut writer = SummaryWriter::new(out);
	match output {
		OutputMode::Text => writer.write_checks(&checks, list),
		OutputMode::Json => writer.write_json(&checks),
	}
}

pub fn print_config(config: &LexisConfig) -> Result<ExitCode> {
	let rendered = config.to_toml().context("failed to render configuration")?;
	let mut stdout = io::stdout();
	stdout
		.write_all(rendered.as_bytes())
		.and_then(|()| stdout.flush())
		.context("failed to write configuration")?;
	Ok(ExitCode::SUCCESS)
}
