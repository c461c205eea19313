// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;

use tracing::debug;

/// Where a language is in its repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguagePhase {
	Idle,
	Loaded,
	Detecting,
	Translating { batch: usize },
	BatchOk { batch: usize },
	BatchFallback { batch: usize },
	Persisting,
	Done,
	Skipped,
}

impl fmt::Display for LanguagePhase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Idle => write!(f, "idle"),
			Self::Loaded => write!(f, "loaded"),
			Self::Detecting => write!(f, "detecting"),
			Self::Translating { batch } => write!(f, "translating(batch {batch})"),
			Self::BatchOk { batch } => write!(f, "batch_ok(batch {batch})"),
			Self::BatchFallback { batch } => write!(f, "batch_fallback(batch {batch})"),
			Self::Persisting => write!(f, "persisting"),
			Self::Done => write!(f, "done"),
			Self::Skipped => write!(f, "skipped"),
		}
	}
}

pub(crate) fn enter(language: &str, phase: LanguagePhase) {
	debug!(language, phase = %phase, "Language phase");
}
