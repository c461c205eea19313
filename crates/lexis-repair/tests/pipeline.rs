// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use lexis_common_catalog::{
	Catalog, CatalogError, CatalogStore, FileCatalogStore, MemoryCatalogStore,
};
use lexis_repair::{
	has_failures, LanguageOutcome, PacingConfig, RepairConfig, RepairError, RepairPipeline,
	RepairReport, SkipReason,
};
use lexis_translate::{TranslateError, TranslationRequest, Translator};
use tempfile::TempDir;
use tokio::time::Instant;

/// Wraps every text in brackets. Combined calls (more than one text) can be
/// made to fail or to come back one result short.
#[derive(Default)]
struct Bracketing {
	refuse: Vec<String>,
	fail_combined: bool,
	short_combined: bool,
	requests: Mutex<Vec<Vec<String>>>,
}

impl Bracketing {
	fn requests(&self) -> Vec<Vec<String>> {
		self.requests.lock().unwrap().clone()
	}
}

#[async_trait]
impl Translator for Bracketing {
	fn name(&self) -> &'static str {
		"bracketing"
	}

	async fn translate_batch(
		&self,
		request: &TranslationRequest,
	) -> Result<Vec<Option<String>>, TranslateError> {
		self.requests.lock().unwrap().push(request.texts.clone());
		let combined = request.len() > 1;
		if combined && self.fail_combined {
			return Err(TranslateError::Timeout);
		}
		let mut out: Vec<Option<String>> = request
			.texts
			.iter()
			.map(|t| (!self.refuse.contains(t)).then(|| format!("[{t}]")))
			.collect();
		if combined && self.short_combined {
			out.pop();
		}
		Ok(out)
	}
}

/// Looks texts up in a fixed table.
struct Dictionary(HashMap<&'static str, &'static str>);

#[async_trait]
impl Translator for Dictionary {
	fn name(&self) -> &'static str {
		"dictionary"
	}

	async fn translate_batch(
		&self,
		request: &TranslationRequest,
	) -> Result<Vec<Option<String>>, TranslateError> {
		Ok(request
			.texts
			.iter()
			.map(|t| self.0.get(t.as_str()).map(|s| s.to_string()))
			.collect())
	}
}

/// A store whose saves fail for one language.
struct ReadOnlyFor {
	inner: MemoryCatalogStore,
	language: &'static str,
}

impl CatalogStore for ReadOnlyFor {
	fn try_load(&self, language: &str) -> Result<Option<Catalog>, CatalogError> {
		self.inner.try_load(language)
	}

	fn save(&self, language: &str, catalog: &Catalog) -> Result<(), CatalogError> {
		if language == self.language {
			return Err(CatalogError::Io {
				path: format!("{language}.json").into(),
				source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
			});
		}
		self.inner.save(language, catalog)
	}
}

fn catalog(raw: &str) -> Catalog {
	Catalog::from_json_str(raw).unwrap()
}

fn config(targets: &[&str]) -> RepairConfig {
	RepairConfig::new("en", targets.iter().map(|t| t.to_string()).collect())
		.with_pacing(PacingConfig::immediate())
}

fn report(outcome: &Result<LanguageOutcome, RepairError>) -> RepairReport {
	match outcome {
		Ok(LanguageOutcome::Repaired(report)) | Ok(LanguageOutcome::Unrepaired(report)) => {
			report.clone()
		}
		other => panic!("expected a translation pass, got {other:?}"),
	}
}

#[tokio::test]
async fn repairs_untranslated_greeting_and_second_run_is_a_no_op() {
	let dir = TempDir::new().unwrap();
	let store = Arc::new(FileCatalogStore::new(dir.path()));
	let greeting = catalog(r#"{"greeting":{"hello":"Hello"}}"#);
	store.save("en", &greeting).unwrap();
	store.save("es", &greeting).unwrap();

	let translator = Arc::new(Dictionary(HashMap::from([("Hello", "Hola")])));
	let pipeline = RepairPipeline::new(store.clone(), translator, config(&["es"]));

	let first = pipeline.run().await;
	let first_report = report(&first[0].result);
	assert_eq!(first_report.stale, 1);
	assert_eq!(first_report.updated, 1);
	assert_eq!(
		std::fs::read_to_string(dir.path().join("es.json")).unwrap(),
		"{\n  \"greeting\": {\n    \"hello\": \"Hola\"\n  }\n}\n"
	);

	let modified = std::fs::metadata(dir.path().join("es.json"))
		.unwrap()
		.modified()
		.unwrap();
	let second = pipeline.run().await;
	assert!(matches!(second[0].result, Ok(LanguageOutcome::UpToDate)));
	assert_eq!(
		std::fs::metadata(dir.path().join("es.json"))
			.unwrap()
			.modified()
			.unwrap(),
		modified
	);
}

#[tokio::test]
async fn second_run_after_full_success_makes_no_updates() {
	let source = catalog(
		r#"{"nav":{"home":"Home page","settings":"Settings"},"tips":["Drink water","Take a walk"],"title":"Welcome back"}"#,
	);
	let store = Arc::new(
		MemoryCatalogStore::new()
			.with_catalog("en", source.clone())
			.with_catalog("fr", source),
	);
	let pipeline = RepairPipeline::new(
		store.clone(),
		Arc::new(Bracketing::default()),
		config(&["fr"]),
	);

	let first = pipeline.run().await;
	assert_eq!(report(&first[0].result).updated, 4);
	assert_eq!(store.save_count(), 1);

	let second = pipeline.run().await;
	assert!(matches!(second[0].result, Ok(LanguageOutcome::UpToDate)));
	assert_eq!(store.save_count(), 1);
}

#[tokio::test]
async fn nothing_is_saved_when_every_translation_fails() {
	let source = catalog(r#"{"a":"Hello there","b":"Goodbye now"}"#);
	let store = Arc::new(
		MemoryCatalogStore::new()
			.with_catalog("en", source.clone())
			.with_catalog("es", source),
	);
	let translator = Arc::new(Bracketing {
		refuse: vec!["Hello there".to_string(), "Goodbye now".to_string()],
		..Default::default()
	});

	let runs = RepairPipeline::new(store.clone(), translator, config(&["es"]))
		.run()
		.await;

	match &runs[0].result {
		Ok(LanguageOutcome::Unrepaired(report)) => {
			assert_eq!(report.stale, 2);
			assert_eq!(report.updated, 0);
			assert_eq!(report.left_stale, 2);
		}
		other => panic!("unexpected outcome: {other:?}"),
	}
	assert_eq!(store.save_count(), 0);
}

/// Answers every text with an empty or whitespace-only string.
struct Blank;

#[async_trait]
impl Translator for Blank {
	fn name(&self) -> &'static str {
		"blank"
	}

	async fn translate_batch(
		&self,
		request: &TranslationRequest,
	) -> Result<Vec<Option<String>>, TranslateError> {
		Ok(request
			.texts
			.iter()
			.enumerate()
			.map(|(i, _)| Some(if i % 2 == 0 { String::new() } else { "  ".to_string() }))
			.collect())
	}
}

#[tokio::test]
async fn blank_translations_are_never_persisted() {
	let dir = TempDir::new().unwrap();
	let store = Arc::new(FileCatalogStore::new(dir.path()));
	let greeting = catalog(r#"{"greeting":{"hello":"Hello","bye":"Goodbye"}}"#);
	store.save("en", &greeting).unwrap();
	store.save("es", &greeting).unwrap();
	let before = std::fs::read_to_string(dir.path().join("es.json")).unwrap();

	let runs = RepairPipeline::new(store.clone(), Arc::new(Blank), config(&["es"]))
		.run()
		.await;

	match &runs[0].result {
		Ok(LanguageOutcome::Unrepaired(report)) => {
			assert_eq!(report.stale, 2);
			assert_eq!(report.updated, 0);
			assert_eq!(report.failed_requests, 2);
		}
		other => panic!("unexpected outcome: {other:?}"),
	}
	assert_eq!(
		std::fs::read_to_string(dir.path().join("es.json")).unwrap(),
		before
	);
	assert_eq!(store.try_load("es").unwrap(), Some(greeting));
}

#[tokio::test]
async fn partially_translated_array_keeps_source_elements() {
	let source = catalog(r#"{"steps":["a","b","c"]}"#);
	let store = Arc::new(
		MemoryCatalogStore::new()
			.with_catalog("en", source.clone())
			.with_catalog("es", source),
	);
	let translator = Arc::new(Dictionary(HashMap::from([("b", "b'")])));

	let runs = RepairPipeline::new(store.clone(), translator, config(&["es"]))
		.run()
		.await;

	let report = report(&runs[0].result);
	assert_eq!(report.updated, 1);
	assert_eq!(report.partially_updated_arrays, 1);
	assert_eq!(store.get("es").unwrap(), catalog(r#"{"steps":["a","b'","c"]}"#));
}

#[tokio::test]
async fn exclusions_and_short_strings_are_never_sent() {
	let source = catalog(r#"{"brand":"Lexis Home","ok":"OK","yes":"Yes","title":"Welcome"}"#);
	let store = Arc::new(
		MemoryCatalogStore::new()
			.with_catalog("en", source.clone())
			.with_catalog("de", source),
	);
	let translator = Arc::new(Bracketing::default());

	RepairPipeline::new(
		store.clone(),
		translator.clone(),
		config(&["de"]).with_exclusions(["Lexis Home"]),
	)
	.run()
	.await;

	assert_eq!(translator.requests(), [vec!["Welcome".to_string()]]);
	assert_eq!(
		store.get("de").unwrap(),
		catalog(r#"{"brand":"Lexis Home","ok":"OK","yes":"Yes","title":"[Welcome]"}"#)
	);
}

#[tokio::test]
async fn missing_entries_are_added_even_when_short() {
	let store = Arc::new(
		MemoryCatalogStore::new()
			.with_catalog("en", catalog(r#"{"ok":"OK","nav":{"home":"Home page"}}"#))
			.with_catalog("es", catalog(r#"{"nav":{}}"#)),
	);

	let runs = RepairPipeline::new(store.clone(), Arc::new(Bracketing::default()), config(&["es"]))
		.run()
		.await;

	assert_eq!(report(&runs[0].result).updated, 2);
	assert_eq!(
		store.get("es").unwrap(),
		catalog(r#"{"nav":{"home":"[Home page]"},"ok":"[OK]"}"#)
	);
}

#[tokio::test]
async fn fallback_updates_are_a_subset_of_combined_updates() {
	let source = catalog(
		r#"{"a":"Alpha one","b":"Beta two","c":"Gamma three","d":["x","y"],"e":"Epsilon five"}"#,
	);
	let refuse = vec!["Gamma three".to_string(), "y".to_string()];

	let mut results = Vec::new();
	for fail_combined in [false, true] {
		let store = Arc::new(
			MemoryCatalogStore::new()
				.with_catalog("en", source.clone())
				.with_catalog("es", source.clone()),
		);
		let translator = Arc::new(Bracketing {
			refuse: refuse.clone(),
			fail_combined,
			..Default::default()
		});
		let runs = RepairPipeline::new(
			store.clone(),
			translator,
			config(&["es"]).with_batch_size(3),
		)
		.run()
		.await;
		results.push((report(&runs[0].result), store.get("es").unwrap()));
	}

	let (combined_report, combined_catalog) = &results[0];
	let (fallback_report, fallback_catalog) = &results[1];

	assert_eq!(combined_report.fallback_batches, 0);
	assert_eq!(fallback_report.fallback_batches, 2);
	assert_eq!(fallback_report.updated, combined_report.updated);
	assert_eq!(fallback_report.updated, 4);
	assert_eq!(fallback_catalog, combined_catalog);
	assert_eq!(
		fallback_catalog,
		&catalog(r#"{"a":"[Alpha one]","b":"[Beta two]","c":"Gamma three","d":["[x]","y"],"e":"[Epsilon five]"}"#)
	);
}

#[tokio::test]
async fn length_mismatch_falls_back_without_losing_items() {
	let source = catalog(r#"{"a":"Alpha one","b":"Beta two","c":"Gamma three"}"#);
	let store = Arc::new(
		MemoryCatalogStore::new()
			.with_catalog("en", source.clone())
			.with_catalog("es", source),
	);
	let translator = Arc::new(Bracketing {
		short_combined: true,
		..Default::default()
	});

	let runs = RepairPipeline::new(store.clone(), translator.clone(), config(&["es"]))
		.run()
		.await;

	let report = report(&runs[0].result);
	assert_eq!(report.updated, 3);
	assert_eq!(report.fallback_batches, 1);
	assert_eq!(translator.requests().len(), 4);
}

#[tokio::test]
async fn absent_and_corrupt_targets_are_skipped() {
	let dir = TempDir::new().unwrap();
	let store = Arc::new(FileCatalogStore::new(dir.path()));
	store.save("en", &catalog(r#"{"a":"Hello there"}"#)).unwrap();
	store.save("es", &catalog(r#"{"a":"Hello there"}"#)).unwrap();
	std::fs::write(dir.path().join("de.json"), "{ not json").unwrap();

	let runs = RepairPipeline::new(store, Arc::new(Bracketing::default()), config(&["fr", "de", "es"]))
		.run()
		.await;

	assert!(matches!(
		runs[0].result,
		Ok(LanguageOutcome::Skipped {
			reason: SkipReason::TargetMissing
		})
	));
	assert!(matches!(
		runs[1].result,
		Ok(LanguageOutcome::Skipped {
			reason: SkipReason::TargetUnreadable(_)
		})
	));
	assert!(matches!(runs[2].result, Ok(LanguageOutcome::Repaired(_))));
	assert_eq!(
		std::fs::read_to_string(dir.path().join("de.json")).unwrap(),
		"{ not json"
	);
}

#[tokio::test]
async fn failed_save_does_not_stop_other_languages() {
	let source = catalog(r#"{"title":"Welcome"}"#);
	let store = Arc::new(ReadOnlyFor {
		inner: MemoryCatalogStore::new()
			.with_catalog("en", source.clone())
			.with_catalog("es", source.clone())
			.with_catalog("de", source.clone())
			.with_catalog("fr", source),
		language: "de",
	});

	let runs = RepairPipeline::new(store.clone(), Arc::new(Bracketing::default()), config(&["es", "de", "fr"]))
		.run()
		.await;

	let languages: Vec<&str> = runs.iter().map(|r| r.language.as_str()).collect();
	assert_eq!(languages, ["es", "de", "fr"]);
	assert!(matches!(runs[0].result, Ok(LanguageOutcome::Repaired(_))));
	assert!(matches!(
		&runs[1].result,
		Err(RepairError::Persist { language, .. }) if language == "de"
	));
	assert!(matches!(runs[2].result, Ok(LanguageOutcome::Repaired(_))));
	assert!(has_failures(&runs));
	assert_eq!(store.inner.save_count(), 2);
	assert_eq!(store.inner.get("de").unwrap(), catalog(r#"{"title":"Welcome"}"#));
}

fn four_strings() -> Catalog {
	catalog(r#"{"a":"Alpha one","b":"Beta two","c":"Gamma three","d":"Delta four"}"#)
}

fn paced(targets: &[&str]) -> RepairConfig {
	RepairConfig::new("en", targets.iter().map(|t| t.to_string()).collect())
		.with_batch_size(2)
		.with_pacing(PacingConfig {
			inter_batch_delay: Duration::from_millis(500),
			cooldown: Duration::from_millis(2000),
			cooldown_backoff_factor: 1.0,
			max_cooldown: Duration::from_secs(30),
		})
}

async fn timed_run(translator: Bracketing, targets: &[&str], max_concurrent: usize) -> Duration {
	let mut store = MemoryCatalogStore::new().with_catalog("en", four_strings());
	for target in targets {
		store = store.with_catalog(*target, four_strings());
	}
	let pipeline = RepairPipeline::new(
		Arc::new(store),
		Arc::new(translator),
		paced(targets).with_max_concurrent_languages(max_concurrent),
	);

	let start = Instant::now();
	pipeline.run().await;
	start.elapsed()
}

#[tokio::test(start_paused = true)]
async fn inter_batch_delay_follows_every_batch() {
	let elapsed = timed_run(Bracketing::default(), &["es"], 1).await;
	assert!(elapsed >= Duration::from_millis(1000), "{elapsed:?}");
	assert!(elapsed < Duration::from_millis(1100), "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn cooldown_precedes_fallback_after_a_failed_batch() {
	let translator = Bracketing {
		fail_combined: true,
		..Default::default()
	};
	let elapsed = timed_run(translator, &["es"], 1).await;
	assert!(elapsed >= Duration::from_millis(5000), "{elapsed:?}");
	assert!(elapsed < Duration::from_millis(5100), "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn length_mismatch_skips_the_cooldown() {
	let translator = Bracketing {
		short_combined: true,
		..Default::default()
	};
	let elapsed = timed_run(translator, &["es"], 1).await;
	assert!(elapsed < Duration::from_millis(1100), "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn languages_run_one_at_a_time_by_default() {
	let elapsed = timed_run(Bracketing::default(), &["es", "fr"], 1).await;
	assert!(elapsed >= Duration::from_millis(2000), "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn concurrent_languages_overlap_their_delays() {
	let elapsed = timed_run(Bracketing::default(), &["es", "fr"], 2).await;
	assert!(elapsed >= Duration::from_millis(1000), "{elapsed:?}");
	assert!(elapsed < Duration::from_millis(1500), "{elapsed:?}");
}
