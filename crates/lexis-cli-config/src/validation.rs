// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration validation rules.

use std::collections::HashSet;

use tracing::warn;

use crate::runtime::{LexisConfig, TranslatorKind};
use crate::ConfigError;

pub const MAX_BATCH_SIZE: usize = 128;

/// Validate the configuration.
///
/// Returns Ok(()) if valid, or ConfigError::InvalidValue with details.
pub fn validate_config(config: &LexisConfig) -> Result<(), ConfigError> {
	validate_catalog(config)?;
	validate_repair(config)?;
	validate_pacing(config)?;
	validate_translator(config)?;

	Ok(())
}

fn validate_catalog(config: &LexisConfig) -> Result<(), ConfigError> {
	let catalog = &config.catalog;

	if catalog.source_language.is_empty() {
		return Err(ConfigError::invalid_value(
			"catalog.source_language",
			"cannot be empty",
		));
	}

	let mut seen = HashSet::new();
	for target in &catalog.target_languages {
		if target.is_empty() {
			return Err(ConfigError::invalid_value(
				"catalog.target_languages",
				"language codes cannot be empty",
			));
		}
		if !seen.insert(target.as_str()) {
			return Err(ConfigError::invalid_value(
				"catalog.target_languages",
				format!("'{target}' is listed more than once"),
			));
		}
	}

	if seen.contains(catalog.source_language.as_str()) {
		return Err(ConfigError::invalid_value(
			"catalog.target_languages",
			format!(
				"source language '{}' cannot also be a target",
				catalog.source_language
			),
		));
	}

	if catalog.target_languages.is_empty() {
		warn!("no target languages configured, nothing will be repaired");
	}

	Ok(())
}

fn validate_repair(config: &LexisConfig) -> Result<(), ConfigError> {
	let repair = &config.repair;

	if repair.batch_size == 0 {
		return Err(ConfigError::invalid_value(
			"repair.batch_size",
			"must be at least 1",
		));
	}

	if repair.batch_size > MAX_BATCH_SIZE {
		return Err(ConfigError::invalid_value(
			"repair.batch_size",
			format!("must be at most {MAX_BATCH_SIZE}"),
		));
	}

	if repair.max_concurrent_languages == 0 {
		return Err(ConfigError::invalid_value(
			"repair.max_concurrent_languages",
			"must be at least 1",
		));
	}

	Ok(())
}

fn validate_pacing(config: &LexisConfig) -> Result<(), ConfigError> {
	let pacing = &config.pacing;

	if !(1.0..=10.0).contains(&pacing.cooldown_backoff_factor) {
		return Err(ConfigError::invalid_value(
			"pacing.cooldown_backoff_factor",
			"must be between 1.0 and 10.0",
		));
	}

	if pacing.cooldown_ms > pacing.max_cooldown_ms {
		return Err(ConfigError::invalid_value(
			"pacing.cooldown_ms",
			"cannot be greater than max_cooldown_ms",
		));
	}

	Ok(())
}

fn validate_translator(config: &LexisConfig) -> Result<(), ConfigError> {
	let translator = &config.translator;

	if translator.base_url.trim().is_empty() {
		return Err(ConfigError::invalid_value(
			"translator.base_url",
			"base_url cannot be empty",
		));
	}

	if translator.timeout_secs == 0 {
		return Err(ConfigError::invalid_value(
			"translator.timeout_secs",
			"must be greater than 0",
		));
	}

	if translator.kind == TranslatorKind::Google && translator.api_key.is_none() {
		warn!("Google translator has no api_key configured");
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::layer::ConfigLayer;
	use crate::paths::PathsConfig;

	fn minimal_config() -> LexisConfig {
		LexisConfig::from_layer(ConfigLayer::default(), PathsConfig::default()).unwrap()
	}

	#[test]
	fn test_minimal_config_is_valid() {
		assert!(validate_config(&minimal_config()).is_ok());
	}

	#[test]
	fn test_batch_size_bounds() {
		let mut config = minimal_config();
		config.repair.batch_size = 0;
		assert!(validate_config(&config)
			.unwrap_err()
			.to_string()
			.contains("batch_size"));

		config.repair.batch_size = 129;
		assert!(validate_config(&config).is_err());

		config.repair.batch_size = 128;
		assert!(validate_config(&config).is_ok());
	}

	#[test]
	fn test_empty_source_fails() {
		let mut config = minimal_config();
		config.catalog.source_language = String::new();
		assert!(validate_config(&config).is_err());
	}

	#[test]
	fn test_duplicate_targets_fail() {
		let mut config = minimal_config();
		config.catalog.target_languages = vec!["es".to_string(), "es".to_string()];
		let err = validate_config(&config).unwrap_err();
		assert!(err.to_string().contains("more than once"));
	}

	#[test]
	fn test_source_in_targets_fails() {
		let mut config = minimal_config();
		config.catalog.target_languages = vec!["es".to_string(), "en".to_string()];
		let err = validate_config(&config).unwrap_err();
		assert!(err.to_string().contains("cannot also be a target"));
	}

	#[test]
	fn test_backoff_factor_range() {
		let mut config = minimal_config();
		config.pacing.cooldown_backoff_factor = 0.5;
		assert!(validate_config(&config).is_err());
		config.pacing.cooldown_backoff_factor = 10.5;
		assert!(validate_config(&config).is_err());
		config.pacing.cooldown_backoff_factor = 2.0;
		assert!(validate_config(&config).is_ok());
	}

	#[test]
	fn test_cooldown_above_max_fails() {
		let mut config = minimal_config();
		config.pacing.cooldown_ms = 60_000;
		config.pacing.max_cooldown_ms = 30_000;
		assert!(validate_config(&config).is_err());
	}

	#[test]
	fn test_zero_concurrency_fails() {
		let mut config = minimal_config();
		config.repair.max_concurrent_languages = 0;
		assert!(validate_config(&config).is_err());
	}

	#[test]
	fn test_empty_base_url_fails() {
		let mut config = minimal_config();
		config.translator.base_url = " ".to_string();
		let err = validate_config(&config).unwrap_err();
		assert!(err.to_string().contains("base_url"));
	}
}
