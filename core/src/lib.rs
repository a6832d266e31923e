//! Lockstake Core Library
//!
//! Types, errors and external collaborators shared by the staking engine:
//! - Lock and global state records
//! - Token ledger interface with an in-memory implementation
//! - Clock sources and day arithmetic

pub mod clock;
pub mod error;
pub mod ledger;
pub mod types;

pub use clock::{day_at, day_start, Clock, ManualClock, SystemClock};
pub use error::{Result, StakeError};
pub use ledger::{MemoryLedger, TokenLedger};
pub use types::{Address, GlobalState, Lock, LockId};

/// Staking constants
pub mod constants {
    /// Seconds per day bucket
    pub const SECONDS_PER_DAY: u64 = 86_400;

    /// Shortest allowed lock (1 day)
    pub const MIN_LOCK_DAYS: u64 = 1;

    /// Longest allowed lock (3650 days)
    pub const MAX_LOCK_DAYS: u64 = 3_650;

    /// Days past maturity after which a lock forfeits its interest
    pub const LATE_DEADLINE_DAYS: u64 = 365;

    /// Share price at launch, in token units per share
    pub const INITIAL_SHARE_PRICE: u64 = 10_000;

    /// Fixed-point scale of the prefix-sum interest table
    pub const INTEREST_PRECISION: u128 = 1_000_000_000_000;
}
