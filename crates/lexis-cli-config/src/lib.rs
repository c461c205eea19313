// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration management for Lexis.
//!
//! This crate provides:
//! - XDG Base Directory compliant path resolution
//! - Layered configuration from defaults, files, environment and CLI flags
//! - Redacted secrets with `VAR_FILE` support
//! - Configuration validation

pub mod error;
pub mod layer;
pub mod paths;
pub mod registry;
pub mod runtime;
pub mod secret;
pub mod sources;
pub mod validation;

pub use error::ConfigError;
pub use layer::ConfigLayer;
pub use paths::PathsConfig;
pub use registry::ConfigRegistry;
pub use runtime::{
	LexisConfig, LogFormat, LogLevel, PacingSettings, RepairSettings, TranslatorConfig,
	TranslatorKind,
};
pub use secret::{load_secret_env, Secret, SecretString};
pub use sources::{CliOverrides, ConfigSource, Precedence};

/// Load configuration with CLI overrides.
///
/// Precedence, lowest first: built-in defaults, `/etc/lexis/config.toml`,
/// `~/.config/lexis/config.toml`, `.lexis/config.toml`, the `--config` file,
/// `LEXIS_*` environment variables, then CLI flags.
pub fn load_config(cli: CliOverrides) -> Result<LexisConfig, ConfigError> {
	let paths = paths::resolve_xdg_paths()?;

	let mut registry = ConfigRegistry::new();

	registry.register(Box::new(sources::DefaultsSource));
	registry.register(Box::new(sources::FileSource::system(&paths)));
	registry.register(Box::new(sources::FileSource::user(&paths)));
	if let Ok(ws) = sources::FileSource::workspace() {
		registry.register(Box::new(ws));
	}
	if let Some(ref file) = cli.config_file {
		registry.register(Box::new(sources::FileSource::explicit(file.clone())));
	}
	registry.register(Box::new(sources::EnvSource::from_process()));
	registry.register(Box::new(sources::CliSource::new(cli)));

	registry.load(paths)
}
