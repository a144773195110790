/*!
 * Worker Entry Points
 *
 * A worker runs in the child after fork with no further input from the
 * supervisor: pick a delay, sleep through it, exit with the delay as status.
 */

use crate::config::{DelayConfig, SeedStrategy};
use crate::core::types::{Delay, WorkerIndex};
use crate::core::{SupervisorError, SupervisorResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::info;

/// Code run in a freshly spawned worker
///
/// The returned value becomes the worker's exit status.
pub trait WorkerEntry {
    fn run(&self, index: WorkerIndex) -> i32;

    /// Whether `run` replaces the process image instead of returning
    ///
    /// Such entries must only ever run in a forked child.
    fn replaces_image(&self) -> bool {
        false
    }
}

impl<F> WorkerEntry for F
where
    F: Fn(WorkerIndex) -> i32,
{
    fn run(&self, index: WorkerIndex) -> i32 {
        self(index)
    }
}

/// Source of a worker's delay
#[cfg_attr(test, mockall::automock)]
pub trait DelaySource {
    fn delay_for(&self, index: WorkerIndex) -> Delay;
}

/// Blocking suspension of the calling process
#[cfg_attr(test, mockall::automock)]
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Sleeps the calling thread
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Uniformly random delays, seeded inside the worker
#[derive(Debug, Clone)]
pub struct RandomDelays {
    range: RangeInclusive<u8>,
    seed: SeedStrategy,
}

impl RandomDelays {
    pub fn new(config: &DelayConfig) -> Self {
        Self {
            range: config.range(),
            seed: config.seed,
        }
    }

    fn seed(&self) -> u64 {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        match self.seed {
            SeedStrategy::WallClockSeconds => since_epoch.as_secs(),
            SeedStrategy::PerProcess => {
                let pid = u64::from(std::process::id());
                (since_epoch.as_nanos() as u64) ^ pid.rotate_left(32)
            }
            SeedStrategy::Fixed(seed) => seed,
        }
    }
}

impl DelaySource for RandomDelays {
    fn delay_for(&self, _index: WorkerIndex) -> Delay {
        let mut rng = StdRng::seed_from_u64(self.seed());
        Delay::new(rng.gen_range(self.range.clone()))
    }
}

/// Scripted delays, one per worker index
///
/// Indices past the end of the script reuse the last entry. The script
/// must be non-empty and every delay at least one unit, so a scripted
/// worker can never exit 0.
#[derive(Debug, Clone)]
pub struct FixedDelays {
    delays: Vec<Delay>,
}

impl FixedDelays {
    pub fn new(delays: impl IntoIterator<Item = u8>) -> SupervisorResult<Self> {
        let delays: Vec<Delay> = delays.into_iter().map(Delay::new).collect();
        if delays.is_empty() {
            return Err(SupervisorError::InvalidConfig(
                "delay script must not be empty".to_string(),
            ));
        }
        if let Some(position) = delays.iter().position(|d| d.units() == 0) {
            return Err(SupervisorError::InvalidConfig(format!(
                "scripted delay {} is zero",
                position + 1
            )));
        }
        Ok(Self { delays })
    }
}

impl DelaySource for FixedDelays {
    fn delay_for(&self, index: WorkerIndex) -> Delay {
        self.delays[index.min(self.delays.len() - 1)]
    }
}

/// Worker that sleeps for its delay and exits with it
#[derive(Debug, Clone)]
pub struct DelayWorker<D, S> {
    delays: D,
    sleeper: S,
    unit: Duration,
}

impl DelayWorker<RandomDelays, ThreadSleeper> {
    /// Random delays with a real blocking sleep
    pub fn from_config(config: &DelayConfig) -> Self {
        Self::new(RandomDelays::new(config), ThreadSleeper, config.unit())
    }
}

impl<D: DelaySource, S: Sleeper> DelayWorker<D, S> {
    pub fn new(delays: D, sleeper: S, unit: Duration) -> Self {
        Self {
            delays,
            sleeper,
            unit,
        }
    }
}

impl<D: DelaySource, S: Sleeper> WorkerEntry for DelayWorker<D, S> {
    fn run(&self, index: WorkerIndex) -> i32 {
        let delay = self.delays.delay_for(index);
        let pid = std::process::id();

        info!(worker = index + 1, pid, delay = %delay, "Worker sleeping");
        self.sleeper.sleep(delay.duration(self.unit));
        info!(worker = index + 1, pid, delay = %delay, "Worker slept, exiting");

        delay.as_exit_code()
    }
}
