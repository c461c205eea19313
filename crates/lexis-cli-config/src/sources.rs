// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: files, environment, CLI, defaults.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::{debug, trace, warn};

use crate::layer::*;
use crate::paths::{workspace_config_path, PathsConfig};
use crate::secret::load_secret_with;
use crate::ConfigError;

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	SystemFile = 20,
	UserFile = 30,
	WorkspaceFile = 40,
	ExplicitFile = 45,
	Environment = 50,
	Cli = 60,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	/// Name for logging
	fn name(&self) -> &'static str;

	/// Precedence level
	fn precedence(&self) -> Precedence;

	/// Load configuration layer from this source
	fn load(&self) -> Result<ConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}
	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		debug!("loading defaults");
		// Defaults are applied when the merged layer is resolved
		Ok(ConfigLayer::default())
	}
}

/// File-based configuration source (TOML).
pub struct FileSource {
	path: PathBuf,
	precedence: Precedence,
	name: &'static str,
	required: bool,
}

impl FileSource {
	/// System config, normally /etc/lexis/config.toml
	pub fn system(paths: &PathsConfig) -> Self {
		Self::custom(
			paths.system_config_file.clone(),
			Precedence::SystemFile,
			"system-config",
		)
	}

	/// User config: ~/.config/lexis/config.toml
	pub fn user(paths: &PathsConfig) -> Self {
		Self::custom(
			paths.user_config_file.clone(),
			Precedence::UserFile,
			"user-config",
		)
	}

	/// Workspace config: .lexis/config.toml
	pub fn workspace() -> Result<Self, ConfigError> {
		Ok(Self::custom(
			workspace_config_path()?,
			Precedence::WorkspaceFile,
			"workspace-config",
		))
	}

	/// A file named with `--config`; it must exist.
	pub fn explicit(path: PathBuf) -> Self {
		Self {
			required: true,
			..Self::custom(path, Precedence::ExplicitFile, "explicit-config")
		}
	}

	/// Custom file path with specified precedence
	pub fn custom(path: PathBuf, precedence: Precedence, name: &'static str) -> Self {
		Self {
			path,
			precedence,
			name,
			required: false,
		}
	}
}

impl ConfigSource for FileSource {
	fn name(&self) -> &'static str {
		self.name
	}
	fn precedence(&self) -> Precedence {
		self.precedence
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		if !self.path.exists() {
			if self.required {
				return Err(ConfigError::FileNotFound(self.path.clone()));
			}
			debug!(path = %self.path.display(), source = self.name, "config file not found, skipping");
			return Ok(ConfigLayer::default());
		}

		debug!(path = %self.path.display(), source = self.name, "loading config file");

		let content = std::fs::read_to_string(&self.path)?;
		let layer: ConfigLayer = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
			path: self.path.clone(),
			source: e,
		})?;

		trace!(source = self.name, "parsed config layer");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Recognizes `LEXIS_*` settings plus the translation API key under
/// `LEXIS_TRANSLATE_API_KEY` or `GOOGLE_TRANSLATE_API_KEY` (each also as
/// `*_FILE`).
pub struct EnvSource {
	vars: HashMap<String, String>,
}

impl EnvSource {
	/// Snapshot the process environment.
	pub fn from_process() -> Self {
		Self::from_vars(std::env::vars())
	}

	pub fn from_vars<I, K, V>(vars: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		Self {
			vars: vars
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		}
	}

	fn lookup(&self, key: &str) -> Option<String> {
		self.vars.get(key).cloned()
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}
	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		debug!("loading environment variables");
		let mut layer = ConfigLayer::default();

		// LEXIS_ prefixed key first, then the provider's conventional name
		let api_key = match load_secret_with("LEXIS_TRANSLATE_API_KEY", |k| self.lookup(k))? {
			Some(secret) => Some(secret),
			None => load_secret_with("GOOGLE_TRANSLATE_API_KEY", |k| self.lookup(k))?,
		};
		if let Some(secret) = api_key {
			trace!("loaded translation API key from environment");
			layer
				.translator
				.get_or_insert_with(TranslatorLayer::default)
				.api_key = Some(secret);
		}

		for (key, value) in &self.vars {
			if !key.starts_with("LEXIS_") {
				continue;
			}

			let value = value.trim().to_string();
			if value.is_empty() {
				continue;
			}

			trace!(key = %key, "processing env var");

			match key.as_str() {
				"LEXIS_CATALOG_DIR" => {
					layer.catalog.get_or_insert_with(CatalogLayer::default).dir =
						Some(PathBuf::from(value));
				}
				"LEXIS_SOURCE_LANGUAGE" => {
					layer
						.catalog
						.get_or_insert_with(CatalogLayer::default)
						.source_language = Some(value);
				}
				"LEXIS_TARGET_LANGUAGES" => {
					layer
						.catalog
						.get_or_insert_with(CatalogLayer::default)
						.target_languages = Some(split_list(&value));
				}
				"LEXIS_BATCH_SIZE" => match value.parse() {
					Ok(v) => {
						layer.repair.get_or_insert_with(RepairLayer::default).batch_size = Some(v);
					}
					Err(_) => {
						return Err(ConfigError::invalid_value(
							"LEXIS_BATCH_SIZE",
							format!("'{value}' is not a positive integer"),
						))
					}
				},
				"LEXIS_TRANSLATOR" => {
					layer
						.translator
						.get_or_insert_with(TranslatorLayer::default)
						.kind = Some(value);
				}
				"LEXIS_TRANSLATOR_BASE_URL" => {
					layer
						.translator
						.get_or_insert_with(TranslatorLayer::default)
						.base_url = Some(value);
				}
				"LEXIS_LOG_LEVEL" => {
					layer.logging.get_or_insert_with(LoggingLayer::default).level = Some(value);
				}
				"LEXIS_LOG_FORMAT" => {
					layer.logging.get_or_insert_with(LoggingLayer::default).format = Some(value);
				}
				"LEXIS_TRANSLATE_API_KEY" | "LEXIS_TRANSLATE_API_KEY_FILE" => {}
				_ => {
					warn!(key = %key, "unknown LEXIS_ environment variable, ignoring");
				}
			}
		}

		Ok(layer)
	}
}

fn split_list(value: &str) -> Vec<String> {
	value
		.split(',')
		.map(str::trim)
		.filter(|s| !s.is_empty())
		.map(str::to_string)
		.collect()
}

/// CLI argument overrides.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
	pub config_file: Option<PathBuf>,
	pub catalog_dir: Option<PathBuf>,
	pub source_language: Option<String>,
	pub target_languages: Option<Vec<String>>,
	pub log_level: Option<String>,
	pub log_format: Option<String>,
}

/// CLI override source.
pub struct CliSource {
	overrides: CliOverrides,
}

impl CliSource {
	pub fn new(overrides: CliOverrides) -> Self {
		Self { overrides }
	}
}

impl ConfigSource for CliSource {
	fn name(&self) -> &'static str {
		"cli"
	}
	fn precedence(&self) -> Precedence {
		Precedence::Cli
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		debug!("loading CLI overrides");
		let mut layer = ConfigLayer::default();

		if let Some(ref dir) = self.overrides.catalog_dir {
			layer.catalog.get_or_insert_with(CatalogLayer::default).dir = Some(dir.clone());
		}

		if let Some(ref source) = self.overrides.source_language {
			layer
				.catalog
				.get_or_insert_with(CatalogLayer::default)
				.source_language = Some(source.clone());
		}

		if let Some(ref targets) = self.overrides.target_languages {
			layer
				.catalog
				.get_or_insert_with(CatalogLayer::default)
				.target_languages = Some(targets.clone());
		}

		if let Some(ref level) = self.overrides.log_level {
			layer.logging.get_or_insert_with(LoggingLayer::default).level = Some(level.clone());
		}

		if let Some(ref format) = self.overrides.log_format {
			layer.logging.get_or_insert_with(LoggingLayer::default).format = Some(format.clone());
		}

		Ok(layer)
	}
}
