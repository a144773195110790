/*!
 * Supervisor Limits and Constants
 *
 * Centralized location for worker counts, delay bounds, and exit codes.
 * Values that cross the process boundary (exit statuses) are marked
 * with [EXIT-CODE].
 */

use std::time::Duration;

// =============================================================================
// FAN-OUT
// =============================================================================

/// Number of workers launched by the supervisor binary
pub const DEFAULT_WORKER_COUNT: usize = 3;

/// Upper bound accepted by config validation
/// Each worker is a full OS process, so the fan-out stays small
pub const MAX_WORKER_COUNT: usize = 64;

// =============================================================================
// WORKER DELAYS
// =============================================================================

/// Shortest delay a worker may draw, in delay units
/// Must stay above zero: a zero delay would be indistinguishable from success
pub const DEFAULT_MIN_DELAY_SECS: u8 = 1;

/// Longest delay a worker may draw, in delay units
pub const DEFAULT_MAX_DELAY_SECS: u8 = 9;

/// Wall-clock length of one delay unit
pub const DEFAULT_DELAY_UNIT: Duration = Duration::from_secs(1);

// =============================================================================
// EXIT CODES
// =============================================================================

/// Supervisor exit status on a fatal error (spawn failure, wait failure)
/// [EXIT-CODE]
pub const FATAL_EXIT_CODE: u8 = 1;

/// Child exit status when exec fails after fork
/// [EXIT-CODE] matches EXIT_FAILURE
pub const EXEC_FAILURE_EXIT_CODE: i32 = 1;

/// Child exit status when its entry point panics
/// [EXIT-CODE] same status the Rust runtime uses for a panicking main
pub const CHILD_PANIC_EXIT_CODE: i32 = 101;
