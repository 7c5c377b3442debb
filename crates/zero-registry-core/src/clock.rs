//! Logical time sources.
//!
//! Every registry operation reads the clock exactly once, before it touches
//! storage, and uses that value for all expiry arithmetic.

use crate::errors::{RegistryError, Result};
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonically increasing logical time
pub trait LogicalClock: Send + Sync {
    fn now(&self) -> Result<u64>;
}

/// Clock driven by the host
///
/// Suitable when the embedding system already owns a logical counter (block
/// height, log index) and for deterministic tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    /// Move the clock to `time`; earlier values are ignored
    pub fn set(&self, time: u64) {
        self.now.fetch_max(time, Ordering::SeqCst);
    }

    /// Advance the clock and return the new time
    pub fn advance(&self, units: u64) -> u64 {
        let previous = self
            .now
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |t| {
                Some(t.saturating_add(units))
            })
            .unwrap_or_else(|t| t);
        previous.saturating_add(units)
    }
}

impl LogicalClock for ManualClock {
    fn now(&self) -> Result<u64> {
        Ok(self.now.load(Ordering::SeqCst))
    }
}

/// Wall-clock time divided into fixed-length units
///
/// Never moves backwards, even if the system clock does.
#[derive(Debug)]
pub struct SystemClock {
    unit_seconds: u64,
    last: AtomicU64,
}

impl SystemClock {
    pub fn new(unit_seconds: u64) -> Self {
        Self {
            unit_seconds: unit_seconds.max(1),
            last: AtomicU64::new(0),
        }
    }

    pub fn unit_seconds(&self) -> u64 {
        self.unit_seconds
    }
}

impl LogicalClock for SystemClock {
    fn now(&self) -> Result<u64> {
        let seconds = chrono::Utc::now().timestamp();
        let seconds = u64::try_from(seconds).map_err(|_| {
            RegistryError::ClockUnavailable(format!("system time before epoch: {}", seconds))
        })?;

        let units = seconds / self.unit_seconds;
        let previous = self.last.fetch_max(units, Ordering::SeqCst);
        Ok(previous.max(units))
    }
}
