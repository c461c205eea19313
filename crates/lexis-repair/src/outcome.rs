// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::detector::StaleItem;
use crate::error::RepairError;

/// Counters for one language's translation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepairReport {
	/// Stale entries found by detection.
	pub stale: usize,
	/// Entries that received at least one translation.
	pub updated: usize,
	/// Arrays where some, but not all, elements were translated.
	pub partially_updated_arrays: usize,
	/// Stale entries no translation reached.
	pub left_stale: usize,
	pub batches: usize,
	/// Batches whose combined call failed and were retried item by item.
	pub fallback_batches: usize,
	/// Individual strings the service did not translate.
	pub failed_requests: usize,
}

/// Why a language was not processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
	TargetMissing,
	TargetUnreadable(String),
	SameAsSource,
}

impl fmt::Display for SkipReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::TargetMissing => write!(f, "target catalog not found"),
			Self::TargetUnreadable(reason) => write!(f, "target catalog unreadable: {reason}"),
			Self::SameAsSource => write!(f, "target is the source language"),
		}
	}
}

/// How one language's repair ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LanguageOutcome {
	Skipped { reason: SkipReason },
	/// Nothing was stale.
	UpToDate,
	/// At least one entry changed and the catalog was saved.
	Repaired(RepairReport),
	/// Stale entries were found but every translation failed; nothing saved.
	Unrepaired(RepairReport),
}

impl LanguageOutcome {
	pub fn report(&self) -> Option<&RepairReport> {
		match self {
			Self::Repaired(report) | Self::Unrepaired(report) => Some(report),
			Self::Skipped { .. } | Self::UpToDate => None,
		}
	}
}

/// One language's result from [`RepairPipeline::run`](crate::RepairPipeline::run).
#[derive(Debug)]
pub struct LanguageRun {
	pub language: String,
	pub result: Result<LanguageOutcome, RepairError>,
}

impl LanguageRun {
	pub fn is_failure(&self) -> bool {
		self.result.is_err()
	}
}

impl Serialize for LanguageRun {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut state = serializer.serialize_struct("LanguageRun", 3)?;
		state.serialize_field("language", &self.language)?;
		match &self.result {
			Ok(outcome) => {
				state.serialize_field("outcome", outcome)?;
				state.serialize_field("error", &Option::<String>::None)?;
			}
			Err(e) => {
				state.serialize_field("outcome", &Option::<LanguageOutcome>::None)?;
				state.serialize_field("error", &Some(e.to_string()))?;
			}
		}
		state.end()
	}
}

/// Any language failed to persist.
pub fn has_failures(runs: &[LanguageRun]) -> bool {
	runs.iter().any(LanguageRun::is_failure)
}

/// A dry-run result for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckOutcome {
	Skipped { reason: SkipReason },
	Checked { stale: Vec<StaleItem> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageCheck {
	pub language: String,
	pub outcome: CheckOutcome,
}
