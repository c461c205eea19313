// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Human-readable and JSON summaries of a run.

use std::fmt::Write as _;
use std::io::Write;

use serde::Serialize;
use tracing::warn;

use crate::outcome::{CheckOutcome, LanguageCheck, LanguageOutcome, LanguageRun, RepairReport};

/// Writes run summaries to an output stream.
///
/// Write failures are logged and otherwise ignored.
pub struct SummaryWriter<W: Write> {
	out: W,
}

impl<W: Write> SummaryWriter<W> {
	pub fn new(out: W) -> Self {
		Self { out }
	}

	pub fn write_runs(&mut self, runs: &[LanguageRun]) {
		self.emit(&render_runs(runs));
	}

	pub fn write_checks(&mut self, checks: &[LanguageCheck], list: bool) {
		self.emit(&render_checks(checks, list));
	}

	pub fn write_json<T: Serialize + ?Sized>(&mut self, value: &T) {
		match serde_json::to_string_pretty(value) {
			Ok(json) => self.emit(&format!("{json}\n")),
			Err(e) => warn!(error = %e, "Failed to serialize summary"),
		}
	}

	pub fn into_inner(self) -> W {
		self.out
	}

	fn emit(&mut self, text: &str) {
		if let Err(e) = self
			.out
			.write_all(text.as_bytes())
			.and_then(|()| self.out.flush())
		{
			warn!(error = %e, "Failed to write summary");
		}
	}
}

fn counts(report: &RepairReport) -> String {
	let mut line = format!(
		"{} stale, {} updated, {} left stale",
		report.stale, report.updated, report.left_stale
	);
	if report.partially_updated_arrays > 0 {
		let _ = write!(line, ", {} arrays partially updated", report.partially_updated_arrays);
	}
	let _ = write!(
		line,
		" ({} batches, {} fallback, {} failed requests)",
		report.batches, report.fallback_batches, report.failed_requests
	);
	line
}

pub fn render_runs(runs: &[LanguageRun]) -> String {
	let mut out = String::new();
	for run in runs {
		let status = match &run.result {
			Ok(LanguageOutcome::Skipped { reason }) => format!("skipped ({reason})"),
			Ok(LanguageOutcome::UpToDate) => "up to date".to_string(),
			Ok(LanguageOutcome::Repaired(report)) => format!("repaired: {}", counts(report)),
			Ok(LanguageOutcome::Unrepaired(report)) => {
				format!("not repaired: {}", counts(report))
			}
			Err(e) => format!("failed: {e}"),
		};
		let _ = writeln!(out, "{}: {status}", run.language);
	}
	out
}

pub fn render_checks(checks: &[LanguageCheck], list: bool) -> String {
	let mut out = String::new();
	for check in checks {
		match &check.outcome {
			CheckOutcome::Skipped { reason } => {
				let _ = writeln!(out, "{}: skipped ({reason})", check.language);
			}
			CheckOutcome::Checked { stale } => {
				let missing = stale.iter().filter(|i| i.missing).count();
				let _ = writeln!(out, "{}: {} stale ({missing} missing)", check.language, stale.len());
				if list {
					for item in stale {
						let mut tags = Vec::new();
						if item.is_array() {
							tags.push("array");
						}
						if item.missing {
							tags.push("missing");
						}
						if tags.is_empty() {
							let _ = writeln!(out, "  {}", item.path);
						} else {
							let _ = writeln!(out, "  {} [{}]", item.path, tags.join(", "));
						}
					}
				}
			}
		}
	}
	out
}
