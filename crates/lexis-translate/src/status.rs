// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use reqwest::StatusCode;
use tracing::error;

use crate::error::TranslateError;

/// Map a non-success HTTP status and its body to an error.
pub(crate) fn status_error(status: StatusCode, body: String) -> TranslateError {
	let status_code = status.as_u16();

	if status == StatusCode::TOO_MANY_REQUESTS {
		error!(status = status_code, "Rate limit exceeded");
		return TranslateError::RateLimited;
	}

	if status_code == 401 || status_code == 403 {
		let lower = body.to_lowercase();
		if lower.contains("rate") || lower.contains("quota") || lower.contains("limit") {
			error!(status = status_code, "Rate limit exceeded");
			return TranslateError::RateLimited;
		}
		error!(status = status_code, "Unauthorized request");
		return TranslateError::Unauthorized;
	}

	error!(status = status_code, body = %body, "Translation API error");
	TranslateError::ApiError {
		status: status_code,
		message: body,
	}
}

pub(crate) fn network_error(e: reqwest::Error) -> TranslateError {
	if e.is_timeout() {
		error!("Request timed out");
		return TranslateError::Timeout;
	}
	error!(error = %e, "Network error during translation request");
	TranslateError::Network(e)
}

/// Services signal a failed item with an empty string; normalize to `None`.
pub(crate) fn non_empty(text: Option<String>) -> Option<String> {
	text.filter(|t| !t.trim().is_empty())
}
