/*!
 * Supervisor Configuration
 * Fan-out size and worker delay settings
 */

use crate::core::limits::{
    DEFAULT_DELAY_UNIT, DEFAULT_MAX_DELAY_SECS, DEFAULT_MIN_DELAY_SECS, DEFAULT_WORKER_COUNT,
    MAX_WORKER_COUNT,
};
use crate::core::{SupervisorError, SupervisorResult};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::time::Duration;

/// How a worker seeds its delay generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedStrategy {
    /// Seconds since the epoch, read in the child
    /// Siblings forked within the same second draw the same delay
    WallClockSeconds,
    /// Wall-clock nanoseconds mixed with the child's pid
    PerProcess,
    /// Same seed for every worker
    Fixed(u64),
}

impl Default for SeedStrategy {
    fn default() -> Self {
        SeedStrategy::PerProcess
    }
}

/// Worker delay settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct DelayConfig {
    pub min_secs: u8,
    pub max_secs: u8,
    /// Length of one delay unit; tests shrink this below a second
    #[serde(rename = "unit_millis", with = "fractional_millis")]
    pub unit: Duration,
    pub seed: SeedStrategy,
}

impl DelayConfig {
    pub fn range(&self) -> RangeInclusive<u8> {
        self.min_secs..=self.max_secs
    }

    pub fn unit(&self) -> Duration {
        self.unit
    }

    pub fn with_range(mut self, min_secs: u8, max_secs: u8) -> Self {
        self.min_secs = min_secs;
        self.max_secs = max_secs;
        self
    }

    pub fn with_unit(mut self, unit: Duration) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_seed(mut self, seed: SeedStrategy) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> SupervisorResult<()> {
        if self.min_secs == 0 {
            return Err(SupervisorError::InvalidConfig(
                "minimum delay must be at least 1".to_string(),
            ));
        }
        if self.min_secs > self.max_secs {
            return Err(SupervisorError::InvalidConfig(format!(
                "minimum delay {} exceeds maximum delay {}",
                self.min_secs, self.max_secs
            )));
        }
        if self.unit.is_zero() {
            return Err(SupervisorError::InvalidConfig(
                "delay unit must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            min_secs: DEFAULT_MIN_DELAY_SECS,
            max_secs: DEFAULT_MAX_DELAY_SECS,
            unit: DEFAULT_DELAY_UNIT,
            seed: SeedStrategy::default(),
        }
    }
}

/// `Duration` as a possibly fractional count of milliseconds
mod fractional_millis {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    const NANOS_PER_MILLI: f64 = 1_000_000.0;

    pub fn serialize<S: Serializer>(unit: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(unit.as_nanos() as f64 / NANOS_PER_MILLI)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = f64::deserialize(deserializer)?;
        let nanos = (millis * NANOS_PER_MILLI).round();
        if !nanos.is_finite() || nanos < 0.0 || nanos > u64::MAX as f64 {
            return Err(D::Error::custom(format!("invalid unit_millis {}", millis)));
        }
        Ok(Duration::from_nanos(nanos as u64))
    }
}

/// Configuration for a supervisor run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SupervisorConfig {
    pub workers: usize,
    pub delay: DelayConfig,
}

impl SupervisorConfig {
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            delay: DelayConfig::default(),
        }
    }

    pub fn with_delay(mut self, delay: DelayConfig) -> Self {
        self.delay = delay;
        self
    }

    pub fn validate(&self) -> SupervisorResult<()> {
        if self.workers > MAX_WORKER_COUNT {
            return Err(SupervisorError::InvalidConfig(format!(
                "worker count {} exceeds limit {}",
                self.workers, MAX_WORKER_COUNT
            )));
        }
        self.delay.validate()
    }
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WORKER_COUNT)
    }
}
