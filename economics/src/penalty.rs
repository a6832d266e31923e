//! Closing penalties
//!
//! - Early close forfeits all accrued interest plus a quadratically
//!   declining share of principal: `principal * (1 - elapsed/duration)^2`.
//! - Closing at maturity or within the grace window costs nothing.
//! - Closing `late_deadline_days` or more after maturity forfeits the interest
//!   only; principal is protected.
//!
//! Forfeited tokens are redistributed to open locks, never burned.

use lockstake_core::Lock;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClosureTiming {
    Early,
    OnTime,
    Late,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Penalty {
    pub timing: ClosureTiming,
    pub principal_forfeit: u64,
    pub interest_forfeit: u64,
}

impl Penalty {
    pub fn none() -> Self {
        Penalty {
            timing: ClosureTiming::OnTime,
            principal_forfeit: 0,
            interest_forfeit: 0,
        }
    }

    pub fn total(&self) -> u64 {
        self.principal_forfeit.saturating_add(self.interest_forfeit)
    }
}

/// Classify a closure on `current_day` of a lock maturing on `end_day`.
pub fn closure_timing(current_day: u64, end_day: u64, late_deadline_days: u64) -> ClosureTiming {
    if current_day < end_day {
        ClosureTiming::Early
    } else if current_day >= end_day.saturating_add(late_deadline_days) {
        ClosureTiming::Late
    } else {
        ClosureTiming::OnTime
    }
}

pub fn compute_penalty(
    current_day: u64,
    end_day: u64,
    lock: &Lock,
    interest_accrued: u64,
    late_deadline_days: u64,
) -> Penalty {
    match closure_timing(current_day, end_day, late_deadline_days) {
        ClosureTiming::Early => Penalty {
            timing: ClosureTiming::Early,
            principal_forfeit: early_principal_forfeit(
                lock.principal,
                lock.days_elapsed(current_day),
                lock.duration_days,
            ),
            interest_forfeit: interest_accrued,
        },
        ClosureTiming::Late => Penalty {
            timing: ClosureTiming::Late,
            principal_forfeit: 0,
            interest_forfeit: interest_accrued,
        },
        ClosureTiming::OnTime => Penalty::none(),
    }
}

/// `floor(principal * (duration - elapsed)^2 / duration^2)`
fn early_principal_forfeit(principal: u64, elapsed: u64, duration: u64) -> u64 {
    if duration == 0 || elapsed >= duration {
        return 0;
    }
    let remaining = (duration - elapsed) as u128;
    let duration = duration as u128;
    // Bounded by principal since remaining < duration
    (principal as u128 * remaining * remaining / (duration * duration)) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockstake_core::LockId;

    const LATE: u64 = 365;

    fn lock(principal: u64, day_created: u64, duration_days: u64) -> Lock {
        Lock {
            id: LockId(1),
            owner: "alice".to_string(),
            principal,
            share_count: 107,
            day_created,
            duration_days,
        }
    }

    #[test]
    fn test_on_time_is_free() {
        let l = lock(1_000_000, 1, 100);
        let penalty = compute_penalty(101, l.end_day(), &l, 5_000, LATE);
        assert_eq!(penalty, Penalty::none());
        assert_eq!(penalty.total(), 0);
    }

    #[test]
    fn test_grace_window_boundaries() {
        let l = lock(1_000_000, 1, 100);
        let end = l.end_day();

        assert_eq!(compute_penalty(end + LATE - 1, end, &l, 5_000, LATE).total(), 0);

        let late = compute_penalty(end + LATE, end, &l, 5_000, LATE);
        assert_eq!(late.timing, ClosureTiming::Late);
        assert_eq!(late.principal_forfeit, 0);
        assert_eq!(late.interest_forfeit, 5_000);
    }

    #[test]
    fn test_early_close_halfway() {
        let l = lock(1_000_000, 1, 100);
        let penalty = compute_penalty(51, l.end_day(), &l, 4_321, LATE);
        assert_eq!(penalty.timing, ClosureTiming::Early);
        assert_eq!(penalty.principal_forfeit, 250_000);
        assert_eq!(penalty.interest_forfeit, 4_321);
        assert_eq!(penalty.total(), 254_321);
    }

    #[test]
    fn test_early_close_same_day_forfeits_everything() {
        let l = lock(1_000_000, 7, 30);
        let penalty = compute_penalty(7, l.end_day(), &l, 0, LATE);
        assert_eq!(penalty.principal_forfeit, 1_000_000);
    }

    #[test]
    fn test_early_forfeit_rounds_down() {
        let l = lock(1_000, 1, 3);
        // (2/3)^2 * 1000 = 444.44
        let penalty = compute_penalty(2, l.end_day(), &l, 0, LATE);
        assert_eq!(penalty.principal_forfeit, 444);
    }

    #[test]
    fn test_penalty_declines_with_time() {
        let l = lock(1_000_000, 1, 365);
        let mut previous = u64::MAX;
        for day in 1..l.end_day() {
            let forfeit = compute_penalty(day, l.end_day(), &l, 0, LATE).principal_forfeit;
            assert!(forfeit <= previous);
            previous = forfeit;
        }
    }
}
