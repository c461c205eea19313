// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use lexis_common_catalog::KeyPath;

use crate::detector::{SourceText, StaleItem};

/// One string to translate, tagged with where its translation goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationUnit {
	pub path: KeyPath,
	/// Index into the array leaf at `path`; `None` for string leaves.
	pub element: Option<usize>,
	pub text: String,
}

/// A group of units sent to the service in one combined call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
	pub index: usize,
	pub units: Vec<TranslationUnit>,
}

impl Batch {
	pub fn texts(&self) -> Vec<String> {
		self.units.iter().map(|u| u.text.clone()).collect()
	}

	pub fn len(&self) -> usize {
		self.units.len()
	}

	pub fn is_empty(&self) -> bool {
		self.units.is_empty()
	}
}

/// Expand stale items into units: one per string, one per array element.
pub fn expand(items: &[StaleItem]) -> Vec<TranslationUnit> {
	let mut units = Vec::new();
	for item in items {
		match &item.source {
			SourceText::Text(text) => units.push(TranslationUnit {
				path: item.path.clone(),
				element: None,
				text: text.clone(),
			}),
			SourceText::List(elements) => {
				units.extend(elements.iter().enumerate().map(|(i, text)| TranslationUnit {
					path: item.path.clone(),
					element: Some(i),
					text: text.clone(),
				}));
			}
		}
	}
	units
}

/// Split units into batches of at most `batch_size`, keeping discovery order.
/// An array can straddle two batches.
pub fn plan_batches(items: &[StaleItem], batch_size: usize) -> Vec<Batch> {
	expand(items)
		.chunks(batch_size.max(1))
		.enumerate()
		.map(|(index, units)| Batch {
			index,
			units: units.to_vec(),
		})
		.collect()
}
