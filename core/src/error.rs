//! Staking error types

use crate::types::LockId;
use thiserror::Error;

/// Errors raised by lock lifecycle operations and their collaborators.
///
/// Every variant is raised before the failing operation mutates any state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StakeError {
    #[error("Invalid lock duration: {days} days (allowed {min}..={max})")]
    InvalidDuration { days: u64, min: u64, max: u64 },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Lock not found: owner {owner} has no lock at index {index}")]
    LockNotFound { owner: String, index: usize },

    #[error("Lock id mismatch at index {index}: expected {expected}, found {found}")]
    LockIdMismatch {
        index: usize,
        expected: LockId,
        found: LockId,
    },

    #[error("Unknown lock: {0}")]
    UnknownLock(LockId),

    #[error("Late deadline not reached: current day {current_day}, deadline day {deadline_day}")]
    DeadlineNotReached { current_day: u64, deadline_day: u64 },

    #[error("Staking has not started: now {now}, launch {launch}")]
    PhaseNotStarted { now: i64, launch: i64 },

    #[error("Interest accrual is behind: {completed} days completed, {target} required")]
    AccrualPending { completed: u64, target: u64 },

    #[error("Insufficient balance for {address}: requested {requested}, available {available}")]
    InsufficientBalance {
        address: String,
        requested: u64,
        available: u64,
    },

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,
}

pub type Result<T> = std::result::Result<T, StakeError>;
