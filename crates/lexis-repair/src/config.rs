// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeSet;
use std::time::Duration;

pub const DEFAULT_BATCH_SIZE: usize = 5;
pub const DEFAULT_MIN_LENGTH: usize = 4;

/// Delays applied between translation calls.
#[derive(Debug, Clone, PartialEq)]
pub struct PacingConfig {
	pub inter_batch_delay: Duration,
	pub cooldown: Duration,
	/// Growth applied to the cooldown on consecutive combined-call errors.
	/// `1.0` keeps it fixed.
	pub cooldown_backoff_factor: f64,
	pub max_cooldown: Duration,
}

impl Default for PacingConfig {
	fn default() -> Self {
		Self {
			inter_batch_delay: Duration::from_millis(500),
			cooldown: Duration::from_millis(2000),
			cooldown_backoff_factor: 1.0,
			max_cooldown: Duration::from_secs(30),
		}
	}
}

impl PacingConfig {
	/// No delays at all.
	pub fn immediate() -> Self {
		Self {
			inter_batch_delay: Duration::ZERO,
			cooldown: Duration::ZERO,
			cooldown_backoff_factor: 1.0,
			max_cooldown: Duration::ZERO,
		}
	}
}

/// Everything a repair run needs to know.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairConfig {
	pub source_language: String,
	pub target_languages: Vec<String>,
	pub batch_size: usize,
	/// Strings of at most this many characters are never stale.
	pub min_length: usize,
	/// Strings that are legitimately identical across languages.
	pub exclusions: BTreeSet<String>,
	pub max_concurrent_languages: usize,
	pub pacing: PacingConfig,
}

impl Default for RepairConfig {
	fn default() -> Self {
		Self {
			source_language: "en".to_string(),
			target_languages: vec!["es".to_string(), "fr".to_string(), "de".to_string()],
			batch_size: DEFAULT_BATCH_SIZE,
			min_length: DEFAULT_MIN_LENGTH,
			exclusions: BTreeSet::new(),
			max_concurrent_languages: 1,
			pacing: PacingConfig::default(),
		}
	}
}

impl RepairConfig {
	pub fn new(source_language: impl Into<String>, target_languages: Vec<String>) -> Self {
		Self {
			source_language: source_language.into(),
			target_languages,
			..Self::default()
		}
	}

	pub fn with_batch_size(mut self, batch_size: usize) -> Self {
		self.batch_size = batch_size;
		self
	}

	pub fn with_min_length(mut self, min_length: usize) -> Self {
		self.min_length = min_length;
		self
	}

	pub fn with_exclusions<I, S>(mut self, exclusions: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.exclusions = exclusions.into_iter().map(Into::into).collect();
		self
	}

	pub fn with_pacing(mut self, pacing: PacingConfig) -> Self {
		self.pacing = pacing;
		self
	}

	pub fn with_max_concurrent_languages(mut self, max: usize) -> Self {
		self.max_concurrent_languages = max;
		self
	}
}
