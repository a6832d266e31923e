//! Open lock registry
//!
//! Locks live in an arena keyed by their unique id. Each owner additionally
//! has an ordered list of live ids, addressable by index. Removing from that
//! list swaps the last entry into the freed slot, so indices are not stable
//! across removals; `lookup` checks the expected id to catch stale indices,
//! and `position_of` re-resolves an index from an id.

use std::collections::HashMap;

use lockstake_core::{Address, Lock, LockId, Result, StakeError};

#[derive(Debug, Clone, Default)]
pub struct LockRegistry {
    locks: HashMap<LockId, Lock>,
    by_owner: HashMap<Address, Vec<LockId>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a lock to the end of its owner's list and return its index.
    pub fn append(&mut self, lock: Lock) -> usize {
        let ids = self.by_owner.entry(lock.owner.clone()).or_default();
        ids.push(lock.id);
        self.locks.insert(lock.id, lock);
        ids.len() - 1
    }

    /// Swap-remove the lock at `index` of `owner`'s list.
    pub fn remove_at(&mut self, owner: &str, index: usize) -> Result<Lock> {
        let ids = self
            .by_owner
            .get_mut(owner)
            .filter(|ids| index < ids.len())
            .ok_or_else(|| StakeError::LockNotFound {
                owner: owner.to_string(),
                index,
            })?;

        let id = ids.swap_remove(index);
        if ids.is_empty() {
            self.by_owner.remove(owner);
        }
        self.locks.remove(&id).ok_or(StakeError::UnknownLock(id))
    }

    pub fn lookup(&self, owner: &str, index: usize, expected_id: LockId) -> Result<&Lock> {
        let found = self
            .by_owner
            .get(owner)
            .and_then(|ids| ids.get(index))
            .copied()
            .ok_or_else(|| StakeError::LockNotFound {
                owner: owner.to_string(),
                index,
            })?;

        if found != expected_id {
            return Err(StakeError::LockIdMismatch {
                index,
                expected: expected_id,
                found,
            });
        }
        self.locks.get(&found).ok_or(StakeError::UnknownLock(found))
    }

    /// Current index of lock `id` in `owner`'s list.
    pub fn position_of(&self, owner: &str, id: LockId) -> Option<usize> {
        self.by_owner
            .get(owner)
            .and_then(|ids| ids.iter().position(|candidate| *candidate == id))
    }

    /// `owner`'s locks in index order.
    pub fn locks_of(&self, owner: &str) -> Vec<&Lock> {
        self.by_owner
            .get(owner)
            .map(|ids| ids.iter().filter_map(|id| self.locks.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn lock_count(&self, owner: &str) -> usize {
        self.by_owner.get(owner).map(Vec::len).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    /// Sum of share counts over all open locks, recomputed from scratch.
    pub fn total_shares(&self) -> u64 {
        self.locks.values().map(|lock| lock.share_count).sum()
    }
}
