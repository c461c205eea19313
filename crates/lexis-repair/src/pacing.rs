// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Delays between translation calls.

use std::time::Duration;

use tracing::debug;

use crate::config::PacingConfig;

/// Paces one language's calls to the translation service.
#[derive(Debug)]
pub struct Pacer {
	config: PacingConfig,
	consecutive_failures: u32,
}

impl Pacer {
	pub fn new(config: PacingConfig) -> Self {
		Self {
			config,
			consecutive_failures: 0,
		}
	}

	/// Sleep the fixed delay that follows every batch.
	pub async fn between_batches(&self) {
		if !self.config.inter_batch_delay.is_zero() {
			tokio::time::sleep(self.config.inter_batch_delay).await;
		}
	}

	/// Record a failed combined call and sleep the cooldown.
	pub async fn cool_down(&mut self) -> Duration {
		self.consecutive_failures = self.consecutive_failures.saturating_add(1);
		let delay = self.cooldown_for(self.consecutive_failures);
		debug!(
			delay_ms = delay.as_millis() as u64,
			consecutive_failures = self.consecutive_failures,
			"Cooling down after failed batch"
		);
		if !delay.is_zero() {
			tokio::time::sleep(delay).await;
		}
		delay
	}

	pub fn record_success(&mut self) {
		self.consecutive_failures = 0;
	}

	pub fn consecutive_failures(&self) -> u32 {
		self.consecutive_failures
	}

	/// `cooldown * factor^(failures - 1)`, capped at `max_cooldown`.
	pub fn cooldown_for(&self, failures: u32) -> Duration {
		let exponent = failures.saturating_sub(1).min(i32::MAX as u32) as i32;
		let grown =
			self.config.cooldown.as_secs_f64() * self.config.cooldown_backoff_factor.powi(exponent);
		let capped = grown.min(self.config.max_cooldown.as_secs_f64());
		Duration::from_secs_f64(capped.max(0.0))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tokio::time::Instant;

	fn growing() -> PacingConfig {
		PacingConfig {
			inter_batch_delay: Duration::from_millis(500),
			cooldown: Duration::from_secs(2),
			cooldown_backoff_factor: 2.0,
			max_cooldown: Duration::from_secs(10),
		}
	}

	#[test]
	fn test_fixed_cooldown_by_default() {
		let pacer = Pacer::new(PacingConfig::default());
		assert_eq!(pacer.cooldown_for(1), Duration::from_secs(2));
		assert_eq!(pacer.cooldown_for(7), Duration::from_secs(2));
	}

	#[test]
	fn test_cooldown_grows_and_caps() {
		let pacer = Pacer::new(growing());
		assert_eq!(pacer.cooldown_for(1), Duration::from_secs(2));
		assert_eq!(pacer.cooldown_for(2), Duration::from_secs(4));
		assert_eq!(pacer.cooldown_for(3), Duration::from_secs(8));
		assert_eq!(pacer.cooldown_for(4), Duration::from_secs(10));
		assert_eq!(pacer.cooldown_for(40), Duration::from_secs(10));
	}

	#[tokio::test(start_paused = true)]
	async fn test_success_resets_streak() {
		let mut pacer = Pacer::new(growing());
		assert_eq!(pacer.cool_down().await, Duration::from_secs(2));
		assert_eq!(pacer.cool_down().await, Duration::from_secs(4));
		pacer.record_success();
		assert_eq!(pacer.consecutive_failures(), 0);
		assert_eq!(pacer.cool_down().await, Duration::from_secs(2));
	}

	#[tokio::test(start_paused = true)]
	async fn test_between_batches_sleeps_configured_delay() {
		let pacer = Pacer::new(PacingConfig::default());
		let start = Instant::now();
		pacer.between_batches().await;
		let elapsed = start.elapsed();
		assert!(elapsed >= Duration::from_millis(500));
		assert!(elapsed < Duration::from_millis(600));
	}
}
