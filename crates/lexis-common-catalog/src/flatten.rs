// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Conversion between the nested catalog tree and a flat path map.

use indexmap::IndexMap;

use crate::error::CatalogError;
use crate::path::KeyPath;
use crate::value::{Catalog, CatalogValue};

/// A leaf of a flattened catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatValue {
	Text(String),
	List(Vec<String>),
	/// An empty section; kept so that empty objects survive unflattening.
	EmptyNode,
}

/// A catalog flattened to `path -> leaf`, in document order.
pub type FlatCatalog = IndexMap<KeyPath, FlatValue>;

/// Flatten a catalog into a path map.
///
/// String and array leaves are copied verbatim; arrays are not split into
/// per-element entries.
pub fn flatten(catalog: &Catalog) -> FlatCatalog {
	let mut flat = FlatCatalog::new();
	flatten_into(catalog, &KeyPath::root(), &mut flat);
	flat
}

fn flatten_into(node: &Catalog, prefix: &KeyPath, out: &mut FlatCatalog) {
	for (key, value) in &node.entries {
		let path = prefix.child(key);
		match value {
			CatalogValue::Text(text) => {
				out.insert(path, FlatValue::Text(text.clone()));
			}
			CatalogValue::List(items) => {
				out.insert(path, FlatValue::List(items.clone()));
			}
			CatalogValue::Node(child) if child.is_empty() => {
				out.insert(path, FlatValue::EmptyNode);
			}
			CatalogValue::Node(child) => flatten_into(child, &path, out),
		}
	}
}

/// Rebuild the nested tree from a path map.
///
/// For every map produced by [`flatten`], `unflatten(&flatten(c)) == c`.
/// Maps that place a value beneath an existing leaf, or a leaf over a
/// populated section, are rejected with [`CatalogError::PathConflict`].
pub fn unflatten(flat: &FlatCatalog) -> Result<Catalog, CatalogError> {
	let mut root = Catalog::new();

	for (path, value) in flat {
		let (last, parents) = path
			.segments()
			.split_last()
			.ok_or(CatalogError::EmptyPath)?;

		let mut node = &mut root;
		for (depth, segment) in parents.iter().enumerate() {
			let slot = node
				.entries
				.entry(segment.clone())
				.or_insert_with(|| CatalogValue::Node(Catalog::new()));
			node = match slot {
				CatalogValue::Node(child) => child,
				_ => {
					return Err(CatalogError::PathConflict {
						path: KeyPath::new(parents[..=depth].to_vec()).to_string(),
					})
				}
			};
		}

		if let Some(CatalogValue::Node(existing)) = node.entries.get(last) {
			if !existing.is_empty() {
				return Err(CatalogError::PathConflict {
					path: path.to_string(),
				});
			}
		}

		let leaf = match value {
			FlatValue::Text(text) => CatalogValue::Text(text.clone()),
			FlatValue::List(items) => CatalogValue::List(items.clone()),
			FlatValue::EmptyNode => CatalogValue::Node(Catalog::new()),
		};
		node.entries.insert(last.clone(), leaf);
	}

	Ok(root)
}
