// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use serde::Serialize;

use crate::error::TranslateError;

/// A batch of strings to translate between two languages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationRequest {
	pub source_language: String,
	pub target_language: String,
	pub texts: Vec<String>,
}

impl TranslationRequest {
	pub fn new(
		source_language: impl Into<String>,
		target_language: impl Into<String>,
		texts: Vec<String>,
	) -> Self {
		Self {
			source_language: source_language.into(),
			target_language: target_language.into(),
			texts,
		}
	}

	pub fn len(&self) -> usize {
		self.texts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.texts.is_empty()
	}
}

/// An external machine translation service.
#[async_trait]
pub trait Translator: Send + Sync {
	/// Short backend name for logs.
	fn name(&self) -> &'static str;

	/// Translate every text of `request` in one call.
	///
	/// On success the result holds one entry per input text, in order;
	/// `None` marks an item the service could not translate. Callers must
	/// not assume the lengths match: a misbehaving service may return fewer
	/// or more entries.
	async fn translate_batch(
		&self,
		request: &TranslationRequest,
	) -> Result<Vec<Option<String>>, TranslateError>;

	/// Translate a single text.
	async fn translate_one(
		&self,
		text: &str,
		source_language: &str,
		target_language: &str,
	) -> Result<String, TranslateError> {
		let request = TranslationRequest::new(source_language, target_language, vec![text.to_string()]);
		let mut results = self.translate_batch(&request).await?;
		if results.len() != 1 {
			return Err(TranslateError::InvalidResponse(format!(
				"expected 1 translation, got {}",
				results.len()
			)));
		}
		results
			.pop()
			.flatten()
			.ok_or(TranslateError::EmptyTranslation)
	}
}
