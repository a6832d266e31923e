//! Lockstake Staking Module
//!
//! Time-locked staking against a fungible token ledger:
//! - Locks buy shares at a share price that only ever rises
//! - Shares earn daily interest through a lazily caught-up prefix-sum table
//! - Early and very late closures forfeit tokens to the remaining stakers

pub mod accrual;
pub mod config;
pub mod engine;
pub mod global;
pub mod registry;

pub use accrual::{AccrualProgress, CatchUp, InterestAccrual};
pub use config::{ConfigError, EngineConfig};
pub use engine::{GlobalInfo, LockEnded, LockStarted, StakingEngine};
pub use global::GlobalLedger;
pub use registry::LockRegistry;
