// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The nested catalog tree.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::path::KeyPath;

/// One node of a catalog tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogValue {
	Text(String),
	List(Vec<String>),
	Node(Catalog),
}

/// A language's full catalog, or one section of it.
///
/// Keys keep their document order, so a catalog that is loaded and saved
/// without changes produces the same file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
	pub(crate) entries: IndexMap<String, CatalogValue>,
}

impl Catalog {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(raw)
	}

	/// Pretty JSON with two-space indentation and a trailing newline.
	pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
		let mut out = serde_json::to_string_pretty(self)?;
		out.push('\n');
		Ok(out)
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn insert(&mut self, key: impl Into<String>, value: CatalogValue) -> Option<CatalogValue> {
		self.entries.insert(key.into(), value)
	}

	pub fn get(&self, key: &str) -> Option<&CatalogValue> {
		self.entries.get(key)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&String, &CatalogValue)> {
		self.entries.iter()
	}

	/// Follow `path` down the tree.
	pub fn get_path(&self, path: &KeyPath) -> Option<&CatalogValue> {
		let (last, parents) = path.segments().split_last()?;
		let mut node = self;
		for segment in parents {
			match node.entries.get(segment)? {
				CatalogValue::Node(child) => node = child,
				_ => return None,
			}
		}
		node.entries.get(last)
	}

	/// Number of string and string-array leaves in the whole tree.
	pub fn leaf_count(&self) -> usize {
		self
			.entries
			.values()
			.map(|value| match value {
				CatalogValue::Node(child) => child.leaf_count(),
				_ => 1,
			})
			.sum()
	}
}

impl FromIterator<(String, CatalogValue)> for Catalog {
	fn from_iter<I: IntoIterator<Item = (String, CatalogValue)>>(iter: I) -> Self {
		Self {
			entries: iter.into_iter().collect(),
		}
	}
}
