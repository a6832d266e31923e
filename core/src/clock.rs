//! Time sources and day arithmetic
//!
//! Days are fixed-length buckets counted from the launch instant, starting
//! at day 1.

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::error::{Result, StakeError};

pub trait Clock {
    /// Current unix timestamp in seconds.
    fn now(&self) -> i64;
}

/// Wall clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Manually driven clock for tests and scenario replay.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(now: i64) -> Self {
        ManualClock {
            now: AtomicI64::new(now),
        }
    }

    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: i64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> i64 {
        (**self).now()
    }
}

/// Map a timestamp to its 1-indexed day number.
pub fn day_at(now: i64, launch: i64, day_seconds: u64) -> Result<u64> {
    if now < launch {
        return Err(StakeError::PhaseNotStarted { now, launch });
    }
    Ok((now - launch) as u64 / day_seconds + 1)
}

/// First second of `day`.
pub fn day_start(day: u64, launch: i64, day_seconds: u64) -> i64 {
    launch + (day.saturating_sub(1) * day_seconds) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SECONDS_PER_DAY;

    #[test]
    fn test_day_at() {
        let launch = 1_700_000_000;
        assert_eq!(day_at(launch, launch, SECONDS_PER_DAY).unwrap(), 1);
        assert_eq!(
            day_at(launch + SECONDS_PER_DAY as i64 - 1, launch, SECONDS_PER_DAY).unwrap(),
            1
        );
        assert_eq!(
            day_at(launch + SECONDS_PER_DAY as i64, launch, SECONDS_PER_DAY).unwrap(),
            2
        );
        assert_eq!(
            day_at(launch - 1, launch, SECONDS_PER_DAY).unwrap_err(),
            StakeError::PhaseNotStarted {
                now: launch - 1,
                launch
            }
        );
    }

    #[test]
    fn test_day_start_round_trips() {
        let launch = 1_000;
        for day in [1, 2, 50, 3650] {
            let ts = day_start(day, launch, SECONDS_PER_DAY);
            assert_eq!(day_at(ts, launch, SECONDS_PER_DAY).unwrap(), day);
        }
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(100);
        clock.advance(50);
        assert_eq!(clock.now(), 150);
        clock.set(10);
        assert_eq!((&clock).now(), 10);
    }
}
