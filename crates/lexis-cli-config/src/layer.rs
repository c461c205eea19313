// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration layer for merging from multiple sources.

use std::path::PathBuf;

use serde::Deserialize;

use crate::secret::SecretString;

/// Partial configuration layer - all fields are Option for merging.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigLayer {
	#[serde(default)]
	pub catalog: Option<CatalogLayer>,
	#[serde(default)]
	pub repair: Option<RepairLayer>,
	#[serde(default)]
	pub pacing: Option<PacingLayer>,
	#[serde(default)]
	pub translator: Option<TranslatorLayer>,
	#[serde(default)]
	pub logging: Option<LoggingLayer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogLayer {
	#[serde(default)]
	pub dir: Option<PathBuf>,
	#[serde(default)]
	pub source_language: Option<String>,
	#[serde(default)]
	pub target_languages: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepairLayer {
	#[serde(default)]
	pub batch_size: Option<usize>,
	#[serde(default)]
	pub min_length: Option<usize>,
	#[serde(default)]
	pub exclusions: Option<Vec<String>>,
	#[serde(default)]
	pub max_concurrent_languages: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PacingLayer {
	#[serde(default)]
	pub inter_batch_delay_ms: Option<u64>,
	#[serde(default)]
	pub cooldown_ms: Option<u64>,
	#[serde(default)]
	pub cooldown_backoff_factor: Option<f64>,
	#[serde(default)]
	pub max_cooldown_ms: Option<u64>,
}

#[derive(Clone, Default, Deserialize)]
pub struct TranslatorLayer {
	#[serde(default, rename = "type")]
	pub kind: Option<String>,
	#[serde(default)]
	pub api_key: Option<SecretString>,
	#[serde(default)]
	pub base_url: Option<String>,
	#[serde(default)]
	pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for TranslatorLayer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TranslatorLayer")
			.field("kind", &self.kind)
			.field("api_key", &self.api_key)
			.field("base_url", &self.base_url)
			.field("timeout_secs", &self.timeout_secs)
			.finish()
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingLayer {
	#[serde(default)]
	pub level: Option<String>,
	#[serde(default)]
	pub format: Option<String>,
}

impl ConfigLayer {
	/// Merge another layer into this one. Other layer takes precedence.
	pub fn merge(&mut self, other: ConfigLayer) {
		merge_option(&mut self.catalog, other.catalog, CatalogLayer::merge);
		merge_option(&mut self.repair, other.repair, RepairLayer::merge);
		merge_option(&mut self.pacing, other.pacing, PacingLayer::merge);
		merge_option(&mut self.translator, other.translator, TranslatorLayer::merge);
		merge_option(&mut self.logging, other.logging, LoggingLayer::merge);
	}
}

fn merge_option<T, F>(target: &mut Option<T>, source: Option<T>, merge_fn: F)
where
	F: FnOnce(&mut T, T),
{
	match (target.as_mut(), source) {
		(Some(t), Some(s)) => merge_fn(t, s),
		(None, Some(s)) => *target = Some(s),
		_ => {}
	}
}

fn replace<T>(target: &mut Option<T>, source: Option<T>) {
	if source.is_some() {
		*target = source;
	}
}

impl CatalogLayer {
	fn merge(&mut self, other: CatalogLayer) {
		replace(&mut self.dir, other.dir);
		replace(&mut self.source_language, other.source_language);
		replace(&mut self.target_languages, other.target_languages);
	}
}

impl RepairLayer {
	fn merge(&mut self, other: RepairLayer) {
		replace(&mut self.batch_size, other.batch_size);
		replace(&mut self.min_length, other.min_length);
		replace(&mut self.exclusions, other.exclusions);
		replace(
			&mut self.max_concurrent_languages,
			other.max_concurrent_languages,
		);
	}
}

impl PacingLayer {
	fn merge(&mut self, other: PacingLayer) {
		replace(&mut self.inter_batch_delay_ms, other.inter_batch_delay_ms);
		replace(&mut self.cooldown_ms, other.cooldown_ms);
		replace(
			&mut self.cooldown_backoff_factor,
			other.cooldown_backoff_factor,
		);
		replace(&mut self.max_cooldown_ms, other.max_cooldown_ms);
	}
}

impl TranslatorLayer {
	fn merge(&mut self, other: TranslatorLayer) {
		replace(&mut self.kind, other.kind);
		replace(&mut self.api_key, other.api_key);
		replace(&mut self.base_url, other.base_url);
		replace(&mut self.timeout_secs, other.timeout_secs);
	}
}

impl LoggingLayer {
	fn merge(&mut self, other: LoggingLayer) {
		replace(&mut self.level, other.level);
		replace(&mut self.format, other.format);
	}
}
