// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for Lexis.
//!
//! Every outbound client is built here so requests carry the same
//! User-Agent header.

mod client;

pub use client::{builder, new_client_with_timeout, user_agent};
