/*!
 * Core Types
 * Small value types shared by the supervisor and its workers
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Raw OS process id as returned by fork
pub type RawPid = i32;

/// Position of a worker in launch order
pub type WorkerIndex = usize;

/// Number of delay units a worker sleeps before exiting
///
/// Backed by `u8` so every delay is a valid exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Delay(u8);

impl Delay {
    pub const fn new(units: u8) -> Self {
        Self(units)
    }

    pub const fn units(self) -> u8 {
        self.0
    }

    /// Exit status a worker reports after sleeping this delay
    pub const fn as_exit_code(self) -> i32 {
        self.0 as i32
    }

    /// Wall-clock length of this delay for a given unit
    pub fn duration(self, unit: Duration) -> Duration {
        unit * u32::from(self.0)
    }
}

impl From<u8> for Delay {
    fn from(units: u8) -> Self {
        Self(units)
    }
}

impl fmt::Display for Delay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
