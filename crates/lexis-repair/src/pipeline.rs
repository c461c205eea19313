// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-language repair runs over a catalog store.

use std::sync::Arc;

use futures::future::join_all;
use lexis_common_catalog::{flatten, unflatten, Catalog, CatalogStore, FlatCatalog};
use lexis_translate::Translator;
use tokio::sync::Semaphore;
use tracing::{info, instrument, warn};

use crate::batch::plan_batches;
use crate::config::RepairConfig;
use crate::detector::StaleKeyDetector;
use crate::error::RepairError;
use crate::orchestrator::BatchOrchestrator;
use crate::outcome::{CheckOutcome, LanguageCheck, LanguageOutcome, LanguageRun, SkipReason};
use crate::pacing::Pacer;
use crate::phase::{self, LanguagePhase};

/// Loads catalogs and finds stale entries. Never calls a translation
/// service and never writes.
pub struct StaleScan {
	store: Arc<dyn CatalogStore>,
	config: RepairConfig,
	detector: StaleKeyDetector,
}

impl StaleScan {
	pub fn new(store: Arc<dyn CatalogStore>, config: RepairConfig) -> Self {
		let detector = StaleKeyDetector::from_config(&config);
		Self {
			store,
			config,
			detector,
		}
	}

	pub fn config(&self) -> &RepairConfig {
		&self.config
	}

	/// Detect stale entries for every target language.
	#[instrument(skip(self), fields(source = %self.config.source_language))]
	pub fn check(&self) -> Vec<LanguageCheck> {
		let source = flatten(&self.load_source());

		self.config
			.target_languages
			.iter()
			.map(|language| {
				let outcome = match self.load_target(language) {
					Ok(target) => CheckOutcome::Checked {
						stale: self.detector.detect(&source, &flatten(&target)),
					},
					Err(reason) => CheckOutcome::Skipped { reason },
				};
				LanguageCheck {
					language: language.clone(),
					outcome,
				}
			})
			.collect()
	}

	fn load_source(&self) -> Catalog {
		let source = self.store.load_or_empty(&self.config.source_language);
		if source.is_empty() {
			warn!(language = %self.config.source_language, "Source catalog is empty, nothing can be stale");
		}
		source
	}

	fn load_target(&self, language: &str) -> Result<Catalog, SkipReason> {
		if language == self.config.source_language {
			return Err(SkipReason::SameAsSource);
		}
		match self.store.try_load(language) {
			Ok(Some(catalog)) => Ok(catalog),
			Ok(None) => Err(SkipReason::TargetMissing),
			Err(e) => Err(SkipReason::TargetUnreadable(e.to_string())),
		}
	}
}

/// Repairs every configured target language against the source catalog.
pub struct RepairPipeline {
	scan: StaleScan,
	translator: Arc<dyn Translator>,
}

impl RepairPipeline {
	pub fn new(
		store: Arc<dyn CatalogStore>,
		translator: Arc<dyn Translator>,
		config: RepairConfig,
	) -> Self {
		Self {
			scan: StaleScan::new(store, config),
			translator,
		}
	}

	pub fn config(&self) -> &RepairConfig {
		self.scan.config()
	}

	/// Run the repair for every target language.
	///
	/// Results come back in configured order. A language that fails to
	/// persist reports its error without stopping the others.
	#[instrument(skip(self), fields(source = %self.config().source_language, translator = self.translator.name()))]
	pub async fn run(&self) -> Vec<LanguageRun> {
		let config = self.config();
		let source = flatten(&self.scan.load_source());
		let permits = Semaphore::new(config.max_concurrent_languages.max(1));

		let runs = config.target_languages.iter().map(|language| {
			let source = &source;
			let permits = &permits;
			async move {
				// The semaphore is never closed.
				let _permit = permits.acquire().await.ok();
				LanguageRun {
					language: language.clone(),
					result: self.repair_language(language, source).await,
				}
			}
		});

		join_all(runs).await
	}

	/// Same as [`StaleScan::check`].
	pub fn check(&self) -> Vec<LanguageCheck> {
		self.scan.check()
	}

	#[instrument(skip_all, fields(language = %language))]
	async fn repair_language(
		&self,
		language: &str,
		source: &FlatCatalog,
	) -> Result<LanguageOutcome, RepairError> {
		phase::enter(language, LanguagePhase::Idle);

		let target = match self.scan.load_target(language) {
			Ok(target) => target,
			Err(reason) => {
				warn!(language, reason = %reason, "Skipping language");
				phase::enter(language, LanguagePhase::Skipped);
				return Ok(LanguageOutcome::Skipped { reason });
			}
		};
		phase::enter(language, LanguagePhase::Loaded);

		let mut target = flatten(&target);
		phase::enter(language, LanguagePhase::Detecting);
		let items = self.scan.detector.detect(source, &target);
		if items.is_empty() {
			info!(language, stale = 0, "Catalog up to date");
			phase::enter(language, LanguagePhase::Done);
			return Ok(LanguageOutcome::UpToDate);
		}
		info!(
			language,
			stale = items.len(),
			missing = items.iter().filter(|i| i.missing).count(),
			"Found stale entries"
		);

		let batches = plan_batches(&items, self.config().batch_size);
		let mut orchestrator = BatchOrchestrator::new(
			self.translator.as_ref(),
			&self.config().source_language,
			language,
			Pacer::new(self.config().pacing.clone()),
		);
		let report = orchestrator.run(&batches, &items, &mut target).await;

		if report.updated == 0 {
			warn!(language, stale = report.stale, "No translations succeeded, catalog left unchanged");
			phase::enter(language, LanguagePhase::Done);
			return Ok(LanguageOutcome::Unrepaired(report));
		}

		phase::enter(language, LanguagePhase::Persisting);
		let rebuilt = unflatten(&target).map_err(|source| RepairError::Rebuild {
			language: language.to_string(),
			source,
		})?;
		self.scan.store.save(language, &rebuilt).map_err(|source| {
			warn!(language, error = %source, "Failed to persist catalog");
			RepairError::Persist {
				language: language.to_string(),
				source,
			}
		})?;

		info!(
			language,
			stale = report.stale,
			updated = report.updated,
			left_stale = report.left_stale,
			"Catalog repaired"
		);
		phase::enter(language, LanguagePhase::Done);
		Ok(LanguageOutcome::Repaired(report))
	}
}
