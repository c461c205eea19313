// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use lexis_common_catalog::CatalogError;
use thiserror::Error;

/// Failures that end one language's repair. Other languages are unaffected.
#[derive(Debug, Error)]
pub enum RepairError {
	#[error("Failed to rebuild catalog for {language}: {source}")]
	Rebuild {
		language: String,
		#[source]
		source: CatalogError,
	},

	#[error("Failed to persist catalog for {language}: {source}")]
	Persist {
		language: String,
		#[source]
		source: CatalogError,
	},
}

impl RepairError {
	pub fn language(&self) -> &str {
		match self {
			Self::Rebuild { language, .. } | Self::Persist { language, .. } => language,
		}
	}
}
