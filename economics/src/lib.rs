//! Lockstake Economics Module
//!
//! Pure, integer-only economic rules of the staking engine:
//! - Daily interest rate schedule
//! - Share pricing and share-price rebasing
//! - Early and late closing penalties

pub mod penalty;
pub mod pricing;
pub mod schedule;

pub use penalty::{closure_timing, compute_penalty, ClosureTiming, Penalty};
pub use pricing::{SharePurchase, ShareCalculator, MULTIPLIER_SCALE};
pub use schedule::{RateSchedule, SchedulePeriod, WINDOW_SUB_PERIODS};
