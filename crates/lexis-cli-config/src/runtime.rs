// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Runtime configuration types with resolved defaults.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use crate::layer::*;
use crate::paths::PathsConfig;
use crate::secret::SecretString;
use crate::ConfigError;

pub const GOOGLE_BASE_URL: &str = "https://translation.googleapis.com";
pub const LIBRETRANSLATE_BASE_URL: &str = "http://localhost:5000";

/// The final, validated configuration for Lexis.
#[derive(Debug, Clone, Serialize)]
pub struct LexisConfig {
	pub catalog: CatalogConfig,
	pub repair: RepairSettings,
	pub pacing: PacingSettings,
	pub translator: TranslatorConfig,
	pub logging: LoggingConfig,

	/// Resolved XDG paths (not serialized)
	#[serde(skip)]
	pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogConfig {
	pub dir: PathBuf,
	pub source_language: String,
	pub target_languages: Vec<String>,
}

impl Default for CatalogConfig {
	fn default() -> Self {
		Self {
			dir: PathBuf::from("locales"),
			source_language: "en".to_string(),
			target_languages: vec!["es".to_string(), "fr".to_string(), "de".to_string()],
		}
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct RepairSettings {
	pub batch_size: usize,
	pub min_length: usize,
	pub exclusions: Vec<String>,
	pub max_concurrent_languages: usize,
}

impl Default for RepairSettings {
	fn default() -> Self {
		Self {
			batch_size: 5,
			min_length: 4,
			exclusions: Vec::new(),
			max_concurrent_languages: 1,
		}
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct PacingSettings {
	pub inter_batch_delay_ms: u64,
	pub cooldown_ms: u64,
	pub cooldown_backoff_factor: f64,
	pub max_cooldown_ms: u64,
}

impl Default for PacingSettings {
	fn default() -> Self {
		Self {
			inter_batch_delay_ms: 500,
			cooldown_ms: 2000,
			cooldown_backoff_factor: 1.0,
			max_cooldown_ms: 30_000,
		}
	}
}

impl PacingSettings {
	pub fn inter_batch_delay(&self) -> Duration {
		Duration::from_millis(self.inter_batch_delay_ms)
	}

	pub fn cooldown(&self) -> Duration {
		Duration::from_millis(self.cooldown_ms)
	}

	pub fn max_cooldown(&self) -> Duration {
		Duration::from_millis(self.max_cooldown_ms)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslatorKind {
	#[default]
	Google,
	LibreTranslate,
}

impl TranslatorKind {
	pub fn default_base_url(&self) -> &'static str {
		match self {
			Self::Google => GOOGLE_BASE_URL,
			Self::LibreTranslate => LIBRETRANSLATE_BASE_URL,
		}
	}
}

impl fmt::Display for TranslatorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Google => write!(f, "google"),
			Self::LibreTranslate => write!(f, "libretranslate"),
		}
	}
}

#[derive(Clone, Serialize)]
pub struct TranslatorConfig {
	#[serde(rename = "type")]
	pub kind: TranslatorKind,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub api_key: Option<SecretString>,
	pub base_url: String,
	pub timeout_secs: u64,
}

impl TranslatorConfig {
	pub fn timeout(&self) -> Duration {
		Duration::from_secs(self.timeout_secs)
	}
}

impl Default for TranslatorConfig {
	fn default() -> Self {
		Self {
			kind: TranslatorKind::Google,
			api_key: None,
			base_url: GOOGLE_BASE_URL.to_string(),
			timeout_secs: 30,
		}
	}
}

impl fmt::Debug for TranslatorConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TranslatorConfig")
			.field("kind", &self.kind)
			.field("api_key", &self.api_key)
			.field("base_url", &self.base_url)
			.field("timeout_secs", &self.timeout_secs)
			.finish()
	}
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LoggingConfig {
	pub level: LogLevel,
	pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
	Error,
	Warn,
	#[default]
	Info,
	Debug,
	Trace,
}

impl LogLevel {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Error => "error",
			Self::Warn => "warn",
			Self::Info => "info",
			Self::Debug => "debug",
			Self::Trace => "trace",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	#[default]
	Pretty,
	Json,
	Compact,
}

impl LexisConfig {
	/// Build runtime config from a merged layer and paths.
	pub fn from_layer(layer: ConfigLayer, paths: PathsConfig) -> Result<Self, ConfigError> {
		Ok(Self {
			catalog: build_catalog_config(layer.catalog),
			repair: build_repair_settings(layer.repair),
			pacing: build_pacing_settings(layer.pacing),
			translator: build_translator_config(layer.translator)?,
			logging: build_logging_config(layer.logging)?,
			paths,
		})
	}

	/// Render as TOML. Secrets appear as `[REDACTED]`.
	pub fn to_toml(&self) -> Result<String, ConfigError> {
		toml::to_string_pretty(self).map_err(|e| ConfigError::validation(e.to_string()))
	}
}

fn build_catalog_config(layer: Option<CatalogLayer>) -> CatalogConfig {
	let layer = layer.unwrap_or_default();
	let defaults = CatalogConfig::default();
	CatalogConfig {
		dir: layer.dir.unwrap_or(defaults.dir),
		source_language: layer
			.source_language
			.map(|s| s.trim().to_string())
			.unwrap_or(defaults.source_language),
		target_languages: layer
			.target_languages
			.map(|targets| targets.into_iter().map(|t| t.trim().to_string()).collect())
			.unwrap_or(defaults.target_languages),
	}
}

fn build_repair_settings(layer: Option<RepairLayer>) -> RepairSettings {
	let layer = layer.unwrap_or_default();
	let defaults = RepairSettings::default();
	RepairSettings {
		batch_size: layer.batch_size.unwrap_or(defaults.batch_size),
		min_length: layer.min_length.unwrap_or(defaults.min_length),
		exclusions: layer.exclusions.unwrap_or_default(),
		max_concurrent_languages: layer
			.max_concurrent_languages
			.unwrap_or(defaults.max_concurrent_languages),
	}
}

fn build_pacing_settings(layer: Option<PacingLayer>) -> PacingSettings {
	let layer = layer.unwrap_or_default();
	let defaults = PacingSettings::default();
	PacingSettings {
		inter_batch_delay_ms: layer
			.inter_batch_delay_ms
			.unwrap_or(defaults.inter_batch_delay_ms),
		cooldown_ms: layer.cooldown_ms.unwrap_or(defaults.cooldown_ms),
		cooldown_backoff_factor: layer
			.cooldown_backoff_factor
			.unwrap_or(defaults.cooldown_backoff_factor),
		max_cooldown_ms: layer.max_cooldown_ms.unwrap_or(defaults.max_cooldown_ms),
	}
}

fn build_translator_config(layer: Option<TranslatorLayer>) -> Result<TranslatorConfig, ConfigError> {
	let layer = layer.unwrap_or_default();
	let kind = parse_translator_kind(layer.kind.as_deref())?;
	Ok(TranslatorConfig {
		kind,
		api_key: layer.api_key,
		base_url: layer
			.base_url
			.unwrap_or_else(|| kind.default_base_url().to_string()),
		timeout_secs: layer.timeout_secs.unwrap_or(30),
	})
}

fn parse_translator_kind(s: Option<&str>) -> Result<TranslatorKind, ConfigError> {
	match s.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
		None | Some("google") => Ok(TranslatorKind::Google),
		Some("libretranslate") | Some("libre") => Ok(TranslatorKind::LibreTranslate),
		Some(other) => Err(ConfigError::invalid_value(
			"translator.type",
			format!("unknown translator '{other}' (expected google or libretranslate)"),
		)),
	}
}

fn build_logging_config(layer: Option<LoggingLayer>) -> Result<LoggingConfig, ConfigError> {
	let layer = layer.unwrap_or_default();
	Ok(LoggingConfig {
		level: parse_log_level(layer.level.as_deref())?,
		format: parse_log_format(layer.format.as_deref())?,
	})
}

fn parse_log_level(s: Option<&str>) -> Result<LogLevel, ConfigError> {
	match s {
		None | Some("info") => Ok(LogLevel::Info),
		Some("error") => Ok(LogLevel::Error),
		Some("warn") => Ok(LogLevel::Warn),
		Some("debug") => Ok(LogLevel::Debug),
		Some("trace") => Ok(LogLevel::Trace),
		Some(other) => Err(ConfigError::invalid_value(
			"logging.level",
			format!("unknown level '{other}'"),
		)),
	}
}

fn parse_log_format(s: Option<&str>) -> Result<LogFormat, ConfigError> {
	match s {
		None | Some("pretty") => Ok(LogFormat::Pretty),
		Some("json") => Ok(LogFormat::Json),
		Some("compact") => Ok(LogFormat::Compact),
		Some(other) => Err(ConfigError::invalid_value(
			"logging.format",
			format!("unknown format '{other}'"),
		)),
	}
}
