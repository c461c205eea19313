// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Finds target entries that still hold the source-language text.

use std::collections::{BTreeSet, HashSet};

use lexis_common_catalog::{FlatCatalog, FlatValue, KeyPath};
use serde::Serialize;
use tracing::{trace, warn};

use crate::config::RepairConfig;

/// The source-language value of a stale entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SourceText {
	Text(String),
	List(Vec<String>),
}

/// A target entry that needs (re)translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaleItem {
	pub path: KeyPath,
	pub source: SourceText,
	/// The path does not exist in the target catalog at all.
	pub missing: bool,
}

impl StaleItem {
	pub fn is_array(&self) -> bool {
		matches!(self.source, SourceText::List(_))
	}
}

/// Decides which entries of a target catalog are stale.
#[derive(Debug, Clone, Default)]
pub struct StaleKeyDetector {
	min_length: usize,
	exclusions: BTreeSet<String>,
}

impl StaleKeyDetector {
	pub fn new(min_length: usize, exclusions: BTreeSet<String>) -> Self {
		Self {
			min_length,
			exclusions,
		}
	}

	pub fn from_config(config: &RepairConfig) -> Self {
		Self::new(config.min_length, config.exclusions.clone())
	}

	/// Walk `source` in document order and collect every stale target entry.
	///
	/// - arrays are stale when the target array is identical
	/// - strings are stale when identical, not excluded and longer than the
	///   length floor
	/// - paths absent from the target are always stale
	///
	/// Entries whose kinds differ between the two catalogs are left alone.
	pub fn detect(&self, source: &FlatCatalog, target: &FlatCatalog) -> Vec<StaleItem> {
		let mut stale = Vec::new();
		let mut shape = None;

		for (path, value) in source {
			let source_text = match value {
				FlatValue::Text(text) => SourceText::Text(text.clone()),
				FlatValue::List(items) if items.is_empty() => continue,
				FlatValue::List(items) => SourceText::List(items.clone()),
				FlatValue::EmptyNode => continue,
			};

			let missing = match (value, target.get(path)) {
				(_, None) => {
					let shape = shape.get_or_insert_with(|| TargetShape::of(target));
					if shape.blocks(path) {
						warn!(path = %path, "Missing entry collides with target structure, skipping");
						continue;
					}
					true
				}
				(FlatValue::List(s), Some(FlatValue::List(t))) if s == t => false,
				(FlatValue::Text(s), Some(FlatValue::Text(t))) if s == t && self.is_candidate(s) => {
					false
				}
				_ => continue,
			};

			trace!(path = %path, missing, "Stale entry");
			stale.push(StaleItem {
				path: path.clone(),
				source: source_text,
				missing,
			});
		}

		stale
	}

	/// Whether an identical string is worth translating.
	pub fn is_candidate(&self, text: &str) -> bool {
		!self.exclusions.contains(text) && text.chars().count() > self.min_length
	}
}

/// Leaf and section paths of a target catalog, as segment slices.
struct TargetShape<'a> {
	leaves: HashSet<&'a [String]>,
	sections: HashSet<&'a [String]>,
}

impl<'a> TargetShape<'a> {
	fn of(target: &'a FlatCatalog) -> Self {
		let mut leaves = HashSet::new();
		let mut sections = HashSet::new();
		for (path, value) in target {
			let segments = path.segments();
			if matches!(value, FlatValue::Text(_) | FlatValue::List(_)) {
				leaves.insert(segments);
			}
			for depth in 1..segments.len() {
				sections.insert(&segments[..depth]);
			}
		}
		Self { leaves, sections }
	}

	/// A missing path cannot be written when the target holds a leaf above
	/// it or a populated section at it.
	fn blocks(&self, path: &KeyPath) -> bool {
		let segments = path.segments();
		self.sections.contains(segments)
			|| (1..segments.len()).any(|depth| self.leaves.contains(&segments[..depth]))
	}
}
