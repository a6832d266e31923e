//! Shared staking types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account identity on the token ledger.
pub type Address = String;

/// Globally unique lock identifier. Ids are handed out in increasing order
/// and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LockId(pub u64);

impl fmt::Display for LockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An open time-lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lock {
    pub id: LockId,
    pub owner: Address,
    /// Tokens moved into custody when the lock was started
    pub principal: u64,
    /// Fixed at creation
    pub share_count: u64,
    /// 1-indexed day the lock was started
    pub day_created: u64,
    pub duration_days: u64,
}

impl Lock {
    /// Day on which the lock matures. Interest accrues up to the day before.
    pub fn end_day(&self) -> u64 {
        self.day_created + self.duration_days
    }

    /// Days elapsed since creation, as seen from `current_day`.
    pub fn days_elapsed(&self, current_day: u64) -> u64 {
        current_day.saturating_sub(self.day_created)
    }
}

/// Process-wide staking totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalState {
    /// Sum of `share_count` over all open locks
    pub total_share_supply: u64,
    /// Tokens per share. Only ever increases.
    pub share_price: u64,
    /// Last day whose interest has been written to the prefix table
    pub num_completed_days: u64,
    pub latest_lock_id: u64,
}

impl GlobalState {
    pub fn new(initial_share_price: u64) -> Self {
        GlobalState {
            total_share_supply: 0,
            share_price: initial_share_price,
            num_completed_days: 0,
            latest_lock_id: 0,
        }
    }

    /// Reserve the next lock id.
    pub fn next_lock_id(&mut self) -> LockId {
        self.latest_lock_id += 1;
        LockId(self.latest_lock_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_lock() -> Lock {
        Lock {
            id: LockId(1),
            owner: "alice".to_string(),
            principal: 1_000_000,
            share_count: 107,
            day_created: 5,
            duration_days: 100,
        }
    }

    #[test]
    fn test_end_day() {
        let lock = sample_lock();
        assert_eq!(lock.end_day(), 105);
        assert_eq!(lock.days_elapsed(55), 50);
        assert_eq!(lock.days_elapsed(3), 0);
    }

    #[test]
    fn test_lock_ids_are_sequential() {
        let mut state = GlobalState::new(10_000);
        assert_eq!(state.next_lock_id(), LockId(1));
        assert_eq!(state.next_lock_id(), LockId(2));
        assert_eq!(state.latest_lock_id, 2);
    }

    #[test]
    fn test_lock_serialization() {
        let lock = sample_lock();
        let json = serde_json::to_string(&lock).unwrap();
        assert!(json.contains("\"id\":1"));

        let decoded: Lock = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, lock);
    }
}
