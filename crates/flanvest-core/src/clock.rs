//! Time sources for the unlock engine.
//!
//! Schedules are anchored to absolute Unix timestamps, so the ledger only
//! needs "seconds since epoch, now". Each operation reads the clock once
//! and treats the reading as a fixed snapshot.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use chrono::{DateTime, Utc};

/// A monotonic source of Unix seconds.
pub trait Clock {
    fn now(&self) -> u64;
}

/// Wall-clock time from the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        u64::try_from(Utc::now().timestamp()).unwrap_or(0)
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same reading, so a test can keep one handle and hand
/// another to the ledger.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start)),
        }
    }

    /// Move the clock forward to `ts`. Earlier timestamps are ignored.
    pub fn increase_to(&self, ts: u64) {
        self.now.fetch_max(ts, Ordering::SeqCst);
    }

    /// Move the clock forward by `secs`, saturating at `u64::MAX`.
    pub fn advance(&self, secs: u64) {
        let mut current = self.now.load(Ordering::SeqCst);
        while let Err(actual) = self.now.compare_exchange_weak(
            current,
            current.saturating_add(secs),
            Ordering::SeqCst,
            Ordering::SeqCst,
        ) {
            current = actual;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Render Unix seconds as a UTC datetime, if representable.
#[must_use]
pub fn to_datetime(ts: u64) -> Option<DateTime<Utc>> {
    i64::try_from(ts)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
}
