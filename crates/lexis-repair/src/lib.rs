// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Translation-completeness repair for Lexis catalogs.
//!
//! A target-language entry that still holds the source-language text was
//! never translated. This crate finds those entries and repairs them through
//! a [`Translator`](lexis_translate::Translator):
//!
//! 1. [`StaleKeyDetector`] diffs the flattened source and target catalogs
//! 2. [`plan_batches`] groups the stale strings into combined requests
//! 3. [`BatchOrchestrator`] sends each batch, falling back to one call per
//!    string when the combined call fails, paced by a [`Pacer`]
//! 4. [`RepairPipeline`] rebuilds and saves each catalog that changed
//!
//! Each language ends in a [`LanguageOutcome`]; only a failed save is an
//! error, and it never stops the other languages.

pub mod batch;
pub mod config;
pub mod detector;
pub mod error;
pub mod orchestrator;
pub mod outcome;
pub mod pacing;
pub mod phase;
pub mod pipeline;
pub mod report;

pub use batch::{plan_batches, Batch, TranslationUnit};
pub use config::{PacingConfig, RepairConfig};
pub use detector::{SourceText, StaleItem, StaleKeyDetector};
pub use error::RepairError;
pub use orchestrator::BatchOrchestrator;
pub use outcome::{
	has_failures, CheckOutcome, LanguageCheck, LanguageOutcome, LanguageRun, RepairReport,
	SkipReason,
};
pub use pacing::Pacer;
pub use phase::LanguagePhase;
pub use pipeline::{RepairPipeline, StaleScan};
pub use report::{render_checks, render_runs, SummaryWriter};
