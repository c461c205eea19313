// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Error types for translation backends.

use thiserror::Error;

/// Errors that can occur when calling a translation service.
#[derive(Debug, Error)]
pub enum TranslateError {
	/// Network-level error during HTTP communication.
	#[error("Network error: {0}")]
	Network(#[from] reqwest::Error),

	/// Request timed out.
	#[error("Request timed out")]
	Timeout,

	/// Rate limit or quota exceeded.
	#[error("Rate limit exceeded")]
	RateLimited,

	/// Missing or invalid API key.
	#[error("Invalid or missing API key")]
	Unauthorized,

	/// Invalid or unparseable response body.
	#[error("Invalid response from translation service: {0}")]
	InvalidResponse(String),

	/// The service returned an error status.
	#[error("Translation API error: {status} - {message}")]
	ApiError { status: u16, message: String },

	/// The service answered but produced no text for the item.
	#[error("Translation service returned an empty translation")]
	EmptyTranslation,
}
