// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;

use serde::{Serialize, Serializer};

/// Location of an entry inside a catalog, one segment per nesting level.
///
/// Displayed as a dotted path (`settings.voice.title`), but compared and
/// unflattened segment-wise, so a key that itself contains `.` survives a
/// flatten/unflatten cycle unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
	pub fn root() -> Self {
		Self(Vec::new())
	}

	pub fn new(segments: Vec<String>) -> Self {
		Self(segments)
	}

	/// Split a dotted path into segments. Only for keys without dots.
	pub fn parse_dotted(dotted: &str) -> Self {
		if dotted.is_empty() {
			return Self::root();
		}
		Self(dotted.split('.').map(str::to_string).collect())
	}

	pub fn child(&self, key: &str) -> Self {
		let mut segments = self.0.clone();
		segments.push(key.to_string());
		Self(segments)
	}

	pub fn segments(&self) -> &[String] {
		&self.0
	}

	pub fn is_root(&self) -> bool {
		self.0.is_empty()
	}

	pub fn depth(&self) -> usize {
		self.0.len()
	}
}

impl fmt::Display for KeyPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0.join("."))
	}
}

impl From<&str> for KeyPath {
	fn from(dotted: &str) -> Self {
		Self::parse_dotted(dotted)
	}
}

impl Serialize for KeyPath {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}
