// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Drives batches through the translation service and writes results back.

use std::collections::{HashMap, HashSet};

use lexis_common_catalog::{FlatCatalog, FlatValue, KeyPath};
use lexis_translate::{TranslationRequest, Translator};
use tracing::{info, instrument, warn};

use crate::batch::{Batch, TranslationUnit};
use crate::detector::{SourceText, StaleItem};
use crate::outcome::RepairReport;
use crate::pacing::Pacer;
use crate::phase::{self, LanguagePhase};

/// Translates one language's batches in order.
pub struct BatchOrchestrator<'a> {
	translator: &'a dyn Translator,
	source_language: &'a str,
	target_language: &'a str,
	pacer: Pacer,
}

impl<'a> BatchOrchestrator<'a> {
	pub fn new(
		translator: &'a dyn Translator,
		source_language: &'a str,
		target_language: &'a str,
		pacer: Pacer,
	) -> Self {
		Self {
			translator,
			source_language,
			target_language,
			pacer,
		}
	}

	/// Translate every batch and write successful results into `target`.
	///
	/// A failed combined call is followed by the cooldown and then one call
	/// per unit. A combined call that answers with the wrong number of
	/// results goes straight to the per-unit calls. Every batch is followed by
	/// the inter-batch delay.
	#[instrument(skip_all, fields(language = %self.target_language, batches = batches.len()))]
	pub async fn run(
		&mut self,
		batches: &[Batch],
		items: &[StaleItem],
		target: &mut FlatCatalog,
	) -> RepairReport {
		let mut scatter = Scatter::new(items, target);
		let mut fallback_batches = 0;

		for batch in batches {
			phase::enter(self.target_language, LanguagePhase::Translating { batch: batch.index });
			let request = TranslationRequest::new(self.source_language, self.target_language, batch.texts());

			match self.translator.translate_batch(&request).await {
				Ok(results) if results.len() == batch.len() => {
					phase::enter(self.target_language, LanguagePhase::BatchOk { batch: batch.index });
					self.pacer.record_success();
					for (unit, result) in batch.units.iter().zip(results) {
						match result {
							Some(text) if !text.trim().is_empty() => scatter.apply(unit, text),
							_ => scatter.fail(unit, "service returned no text"),
						}
					}
				}
				Ok(results) => {
					warn!(
						batch = batch.index,
						expected = batch.len(),
						received = results.len(),
						"Combined call returned wrong number of results, falling back"
					);
					phase::enter(self.target_language, LanguagePhase::BatchFallback { batch: batch.index });
					fallback_batches += 1;
					self.fallback(batch, &mut scatter).await;
				}
				Err(e) => {
					warn!(batch = batch.index, error = %e, "Combined call failed, falling back");
					phase::enter(self.target_language, LanguagePhase::BatchFallback { batch: batch.index });
					fallback_batches += 1;
					self.pacer.cool_down().await;
					self.fallback(batch, &mut scatter).await;
				}
			}

			self.pacer.between_batches().await;
		}

		let report = scatter.finish(batches.len(), fallback_batches);
		info!(
			stale = report.stale,
			updated = report.updated,
			left_stale = report.left_stale,
			failed_requests = report.failed_requests,
			"Translation pass complete"
		);
		report
	}

	async fn fallback(&self, batch: &Batch, scatter: &mut Scatter<'_>) {
		for unit in &batch.units {
			match self
				.translator
				.translate_one(&unit.text, self.source_language, self.target_language)
				.await
			{
				Ok(text) if !text.trim().is_empty() => scatter.apply(unit, text),
				Ok(_) => scatter.fail(unit, "service returned no text"),
				Err(e) => scatter.fail(unit, &e.to_string()),
			}
		}
	}
}

/// Writes translations into the target map and keeps the counts.
struct Scatter<'a> {
	sources: HashMap<&'a KeyPath, &'a [String]>,
	stale: usize,
	target: &'a mut FlatCatalog,
	updated: HashSet<KeyPath>,
	element_hits: HashMap<KeyPath, usize>,
	failed: usize,
}

impl<'a> Scatter<'a> {
	fn new(items: &'a [StaleItem], target: &'a mut FlatCatalog) -> Self {
		let sources = items
			.iter()
			.filter_map(|item| match &item.source {
				SourceText::List(elements) => Some((&item.path, elements.as_slice())),
				SourceText::Text(_) => None,
			})
			.collect();
		Self {
			sources,
			stale: items.len(),
			target,
			updated: HashSet::new(),
			element_hits: HashMap::new(),
			failed: 0,
		}
	}

	fn apply(&mut self, unit: &TranslationUnit, text: String) {
		match unit.element {
			None => {
				self.target.insert(unit.path.clone(), FlatValue::Text(text));
			}
			Some(index) => {
				let Some(source) = self.sources.get(&unit.path).copied() else {
					warn!(path = %unit.path, "Array element without a source array, skipping");
					self.failed += 1;
					return;
				};
				let slot = self.target.entry(unit.path.clone()).or_insert(FlatValue::EmptyNode);
				let needs_copy = !matches!(slot, FlatValue::List(existing) if existing.len() == source.len());
				if needs_copy {
					*slot = FlatValue::List(source.to_vec());
				}
				if let FlatValue::List(elements) = slot {
					elements[index] = text;
				}
				*self.element_hits.entry(unit.path.clone()).or_default() += 1;
			}
		}
		self.updated.insert(unit.path.clone());
	}

	fn fail(&mut self, unit: &TranslationUnit, reason: &str) {
		warn!(path = %unit.path, element = ?unit.element, reason, "Translation failed, leaving entry stale");
		self.failed += 1;
	}

	fn finish(self, batches: usize, fallback_batches: usize) -> RepairReport {
		let partially_updated_arrays = self
			.element_hits
			.iter()
			.filter(|(path, hits)| {
				self.sources
					.get(path)
					.is_some_and(|source| **hits < source.len())
			})
			.count();

		RepairReport {
			stale: self.stale,
			updated: self.updated.len(),
			partially_updated_arrays,
			left_stale: self.stale - self.updated.len(),
			batches,
			fallback_batches,
			failed_requests: self.failed,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::batch::plan_batches;
	use crate::config::PacingConfig;
	use crate::detector::StaleKeyDetector;
	use async_trait::async_trait;
	use lexis_common_catalog::{flatten, Catalog};
	use lexis_translate::TranslateError;
	use std::sync::Mutex;

	/// Uppercases everything, or behaves badly on request.
	#[derive(Default)]
	struct Scripted {
		fail_batches: bool,
		short_batches: bool,
		refuse: Vec<String>,
		/// Texts answered with whitespace instead of a translation.
		blank: Vec<String>,
		batch_calls: Mutex<usize>,
		single_calls: Mutex<usize>,
	}

	#[async_trait]
	impl Translator for Scripted {
		fn name(&self) -> &'static str {
			"scripted"
		}

		async fn translate_batch(
			&self,
			request: &TranslationRequest,
		) -> Result<Vec<Option<String>>, TranslateError> {
			let single = request.len() == 1;
			if single {
				*self.single_calls.lock().unwrap() += 1;
			} else {
				*self.batch_calls.lock().unwrap() += 1;
				if self.fail_batches {
					return Err(TranslateError::RateLimited);
				}
			}
			let mut out: Vec<Option<String>> = request
				.texts
				.iter()
				.map(|t| {
					if self.blank.contains(t) {
						Some("  ".to_string())
					} else {
						(!self.refuse.contains(t)).then(|| t.to_uppercase())
					}
				})
				.collect();
			if self.short_batches && !single {
				out.pop();
			}
			Ok(out)
		}
	}

	fn flat(raw: &str) -> FlatCatalog {
		flatten(&Catalog::from_json_str(raw).unwrap())
	}

	async fn repair(translator: &Scripted, raw: &str, batch_size: usize) -> (FlatCatalog, RepairReport) {
		let source = flat(raw);
		let mut target = source.clone();
		let items = StaleKeyDetector::new(4, Default::default()).detect(&source, &target);
		let batches = plan_batches(&items, batch_size);
		let mut orchestrator =
			BatchOrchestrator::new(translator, "en", "es", Pacer::new(PacingConfig::immediate()));
		let report = orchestrator.run(&batches, &items, &mut target).await;
		(target, report)
	}

	#[tokio::test]
	async fn test_combined_success_scatters_every_result() {
		let translator = Scripted::default();
		let (target, report) =
			repair(&translator, r#"{"a":"Hello","b":{"c":"World wide"}}"#, 5).await;

		assert_eq!(target[&KeyPath::from("a")], FlatValue::Text("HELLO".to_string()));
		assert_eq!(target[&KeyPath::from("b.c")], FlatValue::Text("WORLD WIDE".to_string()));
		assert_eq!(report.updated, 2);
		assert_eq!(report.left_stale, 0);
		assert_eq!(report.fallback_batches, 0);
		assert_eq!(*translator.single_calls.lock().unwrap(), 0);
	}

	#[tokio::test]
	async fn test_empty_result_leaves_entry_stale() {
		let translator = Scripted {
			refuse: vec!["Hello".to_string()],
			..Default::default()
		};
		let (target, report) = repair(&translator, r#"{"a":"Hello","b":"Goodbye"}"#, 5).await;

		assert_eq!(target[&KeyPath::from("a")], FlatValue::Text("Hello".to_string()));
		assert_eq!(report.updated, 1);
		assert_eq!(report.left_stale, 1);
		assert_eq!(report.failed_requests, 1);
	}

	#[tokio::test]
	async fn test_blank_combined_result_is_a_failure() {
		let translator = Scripted {
			blank: vec!["Hello".to_string()],
			..Default::default()
		};
		let (target, report) = repair(&translator, r#"{"a":"Hello","b":"Goodbye"}"#, 5).await;

		assert_eq!(target[&KeyPath::from("a")], FlatValue::Text("Hello".to_string()));
		assert_eq!(target[&KeyPath::from("b")], FlatValue::Text("GOODBYE".to_string()));
		assert_eq!(report.updated, 1);
		assert_eq!(report.left_stale, 1);
		assert_eq!(report.failed_requests, 1);
		assert_eq!(report.fallback_batches, 0);
	}

	#[tokio::test]
	async fn test_blank_array_element_keeps_source_element() {
		let translator = Scripted {
			blank: vec!["b".to_string()],
			..Default::default()
		};
		let (target, report) = repair(&translator, r#"{"list":["a","b","c"]}"#, 5).await;

		assert_eq!(
			target[&KeyPath::from("list")],
			FlatValue::List(vec!["A".to_string(), "b".to_string(), "C".to_string()])
		);
		assert_eq!(report.partially_updated_arrays, 1);
		assert_eq!(report.failed_requests, 1);
	}

	#[tokio::test]
	async fn test_failed_batch_falls_back_per_item() {
		let translator = Scripted {
			fail_batches: true,
			..Default::default()
		};
		let (target, report) = repair(&translator, r#"{"a":"Hello","b":"Goodbye"}"#, 5).await;

		assert_eq!(target[&KeyPath::from("b")], FlatValue::Text("GOODBYE".to_string()));
		assert_eq!(report.updated, 2);
		assert_eq!(report.fallback_batches, 1);
		assert_eq!(*translator.single_calls.lock().unwrap(), 2);
	}

	#[tokio::test]
	async fn test_length_mismatch_falls_back_per_item() {
		let translator = Scripted {
			short_batches: true,
			..Default::default()
		};
		let (_, report) = repair(&translator, r#"{"a":"Hello","b":"Goodbye","c":"Thanks"}"#, 5).await;

		assert_eq!(report.updated, 3);
		assert_eq!(report.fallback_batches, 1);
		assert_eq!(*translator.single_calls.lock().unwrap(), 3);
	}

	#[tokio::test]
	async fn test_array_partial_update_keeps_source_elements() {
		let translator = Scripted {
			refuse: vec!["a".to_string(), "c".to_string()],
			..Default::default()
		};
		let (target, report) = repair(&translator, r#"{"list":["a","b","c"]}"#, 5).await;

		assert_eq!(
			target[&KeyPath::from("list")],
			FlatValue::List(vec!["a".to_string(), "B".to_string(), "c".to_string()])
		);
		assert_eq!(report.updated, 1);
		assert_eq!(report.partially_updated_arrays, 1);
		assert_eq!(report.failed_requests, 2);
	}

	#[tokio::test]
	async fn test_array_spanning_batches_counts_once() {
		let translator = Scripted::default();
		let (target, report) = repair(&translator, r#"{"list":["a","b","c"]}"#, 2).await;

		assert_eq!(
			target[&KeyPath::from("list")],
			FlatValue::List(vec!["A".to_string(), "B".to_string(), "C".to_string()])
		);
		assert_eq!(report.batches, 2);
		assert_eq!(report.updated, 1);
		assert_eq!(report.partially_updated_arrays, 0);
	}

	#[tokio::test]
	async fn test_missing_array_is_initialized_from_source() {
		let source = flat(r#"{"list":["one","two"]}"#);
		let mut target = FlatCatalog::new();
		let items = StaleKeyDetector::default().detect(&source, &target);
		let translator = Scripted {
			refuse: vec!["one".to_string()],
			..Default::default()
		};
		let mut orchestrator =
			BatchOrchestrator::new(&translator, "en", "es", Pacer::new(PacingConfig::immediate()));
		orchestrator
			.run(&plan_batches(&items, 5), &items, &mut target)
			.await;

		assert_eq!(
			target[&KeyPath::from("list")],
			FlatValue::List(vec!["one".to_string(), "TWO".to_string()])
		);
	}
}
