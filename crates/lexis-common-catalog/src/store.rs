// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Catalog persistence.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::CatalogError;
use crate::value::Catalog;

/// Where catalogs live between runs.
pub trait CatalogStore: Send + Sync {
	/// Load a language's catalog. `Ok(None)` means no document exists.
	fn try_load(&self, language: &str) -> Result<Option<Catalog>, CatalogError>;

	/// Persist a language's catalog, replacing any previous document.
	fn save(&self, language: &str, catalog: &Catalog) -> Result<(), CatalogError>;

	/// Load a catalog, treating a missing or unreadable document as empty.
	fn load_or_empty(&self, language: &str) -> Catalog {
		match self.try_load(language) {
			Ok(Some(catalog)) => catalog,
			Ok(None) => {
				warn!(language, "catalog not found, treating as empty");
				Catalog::new()
			}
			Err(e) => {
				warn!(language, error = %e, "catalog unreadable, treating as empty");
				Catalog::new()
			}
		}
	}
}

/// A directory of `<language>.json` documents.
#[derive(Debug, Clone)]
pub struct FileCatalogStore {
	dir: PathBuf,
}

impl FileCatalogStore {
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	pub fn path_for(&self, language: &str) -> Result<PathBuf, CatalogError> {
		validate_language(language)?;
		Ok(self.dir.join(format!("{language}.json")))
	}
}

fn validate_language(language: &str) -> Result<(), CatalogError> {
	let valid = !language.is_empty()
		&& !language.starts_with('.')
		&& language
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
	if valid {
		Ok(())
	} else {
		Err(CatalogError::InvalidLanguage(language.to_string()))
	}
}

impl CatalogStore for FileCatalogStore {
	fn try_load(&self, language: &str) -> Result<Option<Catalog>, CatalogError> {
		let path = self.path_for(language)?;
		let raw = match std::fs::read_to_string(&path) {
			Ok(raw) => raw,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				debug!(path = %path.display(), "catalog file not found");
				return Ok(None);
			}
			Err(e) => return Err(CatalogError::io(path, e)),
		};

		let catalog =
			Catalog::from_json_str(&raw).map_err(|source| CatalogError::Parse { path, source })?;
		Ok(Some(catalog))
	}

	/// Writes to a temporary file in the same directory, syncs it, then
	/// renames it over the target so readers never observe a partial file.
	fn save(&self, language: &str, catalog: &Catalog) -> Result<(), CatalogError> {
		let path = self.path_for(language)?;
		let json = catalog.to_json_pretty()?;

		std::fs::create_dir_all(&self.dir).map_err(|e| CatalogError::io(&self.dir, e))?;
		let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|e| CatalogError::io(&self.dir, e))?;
		tmp
			.write_all(json.as_bytes())
			.map_err(|e| CatalogError::io(tmp.path().to_path_buf(), e))?;
		tmp
			.as_file()
			.sync_all()
			.map_err(|e| CatalogError::io(tmp.path().to_path_buf(), e))?;
		tmp
			.persist(&path)
			.map_err(|e| CatalogError::io(path.clone(), e.error))?;

		debug!(path = %path.display(), bytes = json.len(), "catalog saved");
		Ok(())
	}
}

/// In-memory store that records every save.
#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
	catalogs: Mutex<HashMap<String, Catalog>>,
	saves: AtomicUsize,
}

impl MemoryCatalogStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_catalog(self, language: impl Into<String>, catalog: Catalog) -> Self {
		self.insert(language, catalog);
		self
	}

	/// Seed a catalog without counting it as a save.
	pub fn insert(&self, language: impl Into<String>, catalog: Catalog) {
		self
			.catalogs
			.lock()
			.unwrap_or_else(|e| e.into_inner())
			.insert(language.into(), catalog);
	}

	pub fn get(&self, language: &str) -> Option<Catalog> {
		self
			.catalogs
			.lock()
			.unwrap_or_else(|e| e.into_inner())
			.get(language)
			.cloned()
	}

	pub fn save_count(&self) -> usize {
		self.saves.load(Ordering::SeqCst)
	}
}

impl CatalogStore for MemoryCatalogStore {
	fn try_load(&self, language: &str) -> Result<Option<Catalog>, CatalogError> {
		Ok(self.get(language))
	}

	fn save(&self, language: &str, catalog: &Catalog) -> Result<(), CatalogError> {
		self.insert(language, catalog.clone());
		self.saves.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}
}
