// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Google Cloud Translation (v2 REST) client implementation.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, trace};

use crate::error::TranslateError;
use crate::status::{network_error, non_empty, status_error};
use crate::translator::{TranslationRequest, Translator};

pub const DEFAULT_BASE_URL: &str = "https://translation.googleapis.com";
const TRANSLATE_PATH: &str = "language/translate/v2";

/// Client for the Google Cloud Translation v2 API.
#[derive(Clone)]
pub struct GoogleTranslateClient {
	http_client: Client,
	api_key: String,
	base_url: String,
}

impl fmt::Debug for GoogleTranslateClient {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GoogleTranslateClient")
			.field("api_key", &"[REDACTED]")
			.field("base_url", &self.base_url)
			.finish()
	}
}

#[derive(Debug, Serialize)]
struct GoogleTranslateBody<'a> {
	q: &'a [String],
	source: &'a str,
	target: &'a str,
	format: &'static str,
}

#[derive(Debug, Deserialize)]
struct GoogleTranslateResponse {
	data: Option<GoogleTranslateData>,
	error: Option<GoogleApiError>,
}

#[derive(Debug, Deserialize)]
struct GoogleTranslateData {
	translations: Vec<GoogleTranslation>,
}

#[derive(Debug, Deserialize)]
struct GoogleTranslation {
	#[serde(rename = "translatedText")]
	translated_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleApiError {
	code: u16,
	message: String,
}

impl GoogleTranslateClient {
	/// Creates a new client with the given API key and request timeout.
	pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, TranslateError> {
		let http_client = lexis_common_http::new_client_with_timeout(timeout)?;
		Ok(Self {
			http_client,
			api_key: api_key.into(),
			base_url: DEFAULT_BASE_URL.to_string(),
		})
	}

	/// Sets a custom base URL for the API (useful for testing).
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();
		self
	}

	fn endpoint(&self) -> Result<Url, TranslateError> {
		let base = format!("{}/", self.base_url.trim_end_matches('/'));
		let mut url = Url::parse(&base)
			.and_then(|b| b.join(TRANSLATE_PATH))
			.map_err(|e| TranslateError::InvalidResponse(format!("Invalid base URL: {e}")))?;
		url.query_pairs_mut().append_pair("key", &self.api_key);
		Ok(url)
	}
}

#[async_trait]
impl Translator for GoogleTranslateClient {
	fn name(&self) -> &'static str {
		"google"
	}

	#[instrument(skip(self, request), fields(target = %request.target_language, count = request.len()))]
	async fn translate_batch(
		&self,
		request: &TranslationRequest,
	) -> Result<Vec<Option<String>>, TranslateError> {
		let body = GoogleTranslateBody {
			q: &request.texts,
			source: &request.source_language,
			target: &request.target_language,
			format: "text",
		};

		debug!(url = %self.base_url, "Sending translation request to Google");

		let response = self
			.http_client
			.post(self.endpoint()?)
			.json(&body)
			.send()
			.await
			.map_err(network_error)?;

		let status = response.status();
		debug!(status = %status, "Received response from Google");

		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(status_error(status, body));
		}

		let body = response.text().await.map_err(|e| {
			error!(error = %e, "Failed to read response body");
			TranslateError::Network(e)
		})?;
		trace!(body = %body, "Response body");

		parse_response(&body)
	}
}

fn parse_response(body: &str) -> Result<Vec<Option<String>>, TranslateError> {
	let parsed: GoogleTranslateResponse = serde_json::from_str(body).map_err(|e| {
		error!(error = %e, "Failed to parse Google translation response");
		TranslateError::InvalidResponse(format!("JSON parse error: {e}"))
	})?;

	if let Some(error) = parsed.error {
		error!(code = error.code, message = %error.message, "Google API returned error");
		return Err(TranslateError::ApiError {
			status: error.code,
			message: error.message,
		});
	}

	let data = parsed
		.data
		.ok_or_else(|| TranslateError::InvalidResponse("missing data field".to_string()))?;

	Ok(data
		.translations
		.into_iter()
		.map(|t| non_empty(t.translated_text))
		.collect())
}
