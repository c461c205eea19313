// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Catalog error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading, reshaping, or writing catalogs.
#[derive(Debug, Error)]
pub enum CatalogError {
	/// I/O error reading or writing a catalog file
	#[error("I/O error on {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// The document is not a tree of strings and string arrays
	#[error("failed to parse catalog {path}: {source}")]
	Parse {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("failed to serialize catalog: {0}")]
	Serialize(#[from] serde_json::Error),

	/// A flat entry would have to be placed beneath an existing leaf
	#[error("path conflict at '{path}': a leaf and a section share this key")]
	PathConflict { path: String },

	#[error("empty key path")]
	EmptyPath,

	/// Language codes become file names, so separators are rejected
	#[error("invalid language code '{0}'")]
	InvalidLanguage(String),
}

impl CatalogError {
	pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Self::Io {
			path: path.into(),
			source,
		}
	}
}
