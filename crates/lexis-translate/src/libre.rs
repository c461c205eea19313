// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! LibreTranslate client implementation.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, trace};

use crate::error::TranslateError;
use crate::status::{network_error, non_empty, status_error};
use crate::translator::{TranslationRequest, Translator};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Client for a LibreTranslate server.
#[derive(Clone)]
pub struct LibreTranslateClient {
	http_client: Client,
	api_key: Option<String>,
	base_url: String,
}

impl fmt::Debug for LibreTranslateClient {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LibreTranslateClient")
			.field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
			.field("base_url", &self.base_url)
			.finish()
	}
}

#[derive(Debug, Serialize)]
struct LibreTranslateBody<'a> {
	q: &'a [String],
	source: &'a str,
	target: &'a str,
	format: &'static str,
	#[serde(skip_serializing_if = "Option::is_none")]
	api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct LibreTranslateResponse {
	#[serde(rename = "translatedText")]
	translated_text: Option<LibreText>,
	error: Option<String>,
}

/// A single `q` string yields a string; an array yields an array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LibreText {
	One(String),
	Many(Vec<Option<String>>),
}

impl LibreTranslateClient {
	/// Creates a new client. Public instances require an API key; self-hosted
	/// ones usually do not.
	pub fn new(
		base_url: impl Into<String>,
		api_key: Option<String>,
		timeout: Duration,
	) -> Result<Self, TranslateError> {
		let http_client = lexis_common_http::new_client_with_timeout(timeout)?;
		Ok(Self {
			http_client,
			api_key,
			base_url: base_url.into(),
		})
	}

	fn endpoint(&self) -> Result<Url, TranslateError> {
		let base = format!("{}/", self.base_url.trim_end_matches('/'));
		Url::parse(&base)
			.and_then(|b| b.join("translate"))
			.map_err(|e| TranslateError::InvalidResponse(format!("Invalid base URL: {e}")))
	}
}

#[async_trait]
impl Translator for LibreTranslateClient {
	fn name(&self) -> &'static str {
		"libretranslate"
	}

	#[instrument(skip(self, request), fields(target = %request.target_language, count = request.len()))]
	async fn translate_batch(
		&self,
		request: &TranslationRequest,
	) -> Result<Vec<Option<String>>, TranslateError> {
		let body = LibreTranslateBody {
			q: &request.texts,
			source: &request.source_language,
			target: &request.target_language,
			format: "text",
			api_key: self.api_key.as_deref(),
		};

		debug!(url = %self.base_url, "Sending translation request to LibreTranslate");

		let response = self
			.http_client
			.post(self.endpoint()?)
			.json(&body)
			.send()
			.await
			.map_err(network_error)?;

		let status = response.status();
		debug!(status = %status, "Received response from LibreTranslate");

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
	let parsed: LibreTranslateResponse = serde_json::from_str(body).map_err(|e| {
		error!(error = %e, "Failed to parse LibreTranslate response");
		TranslateError::InvalidResponse(format!("JSON parse error: {e}"))
	})?;

	if let Some(message) = parsed.error {
		return Err(TranslateError::ApiError {
			status: 200,
			message,
		});
	}

	match parsed.translated_text {
		Some(LibreText::Many(texts)) => Ok(texts.into_iter().map(non_empty).collect()),
		Some(LibreText::One(text)) => Ok(vec![non_empty(Some(text))]),
		None => Err(TranslateError::InvalidResponse(
			"missing translatedText field".to_string(),
		)),
	}
}
