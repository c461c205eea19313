// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Machine translation clients for Lexis.
//!
//! The [`Translator`] trait is the boundary the repair pipeline talks to.
//! Two HTTP backends implement it:
//!
//! - [`GoogleTranslateClient`] for the Google Cloud Translation v2 REST API
//! - [`LibreTranslateClient`] for self-hosted or public LibreTranslate servers

pub mod error;
pub mod google;
pub mod libre;
mod status;
pub mod translator;

pub use error::TranslateError;
pub use google::GoogleTranslateClient;
pub use libre::LibreTranslateClient;
pub use translator::{TranslationRequest, Translator};
