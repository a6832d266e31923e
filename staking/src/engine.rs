//! Lock lifecycle
//!
//! `StakingEngine` owns the global totals, the interest table and the lock
//! registry, and settles against a [`TokenLedger`]. Each operation validates
//! first, then catches up interest accrual, then applies its own changes and
//! commits the global snapshot. A failed operation leaves everything as it
//! was.
//!
//! Custody holds the principal of every open lock plus the penalty reserve.
//! Interest is paid out of the reserve first and minted only for the rest,
//! so a forfeited token is paid out once and never duplicated.
//!
//! A lock is open from `start_lock` until one of the `end_lock` variants
//! removes it; closed locks leave no record behind.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use lockstake_core::{
    day_at, Address, Clock, GlobalState, Lock, LockId, Result, StakeError, TokenLedger,
};
use lockstake_economics::{compute_penalty, Penalty, ShareCalculator};

use crate::accrual::{AccrualProgress, InterestAccrual};
use crate::config::{ConfigError, EngineConfig};
use crate::global::GlobalLedger;
use crate::registry::LockRegistry;

/// Receipt of a started lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockStarted {
    pub lock: Lock,
    /// Index in the owner's lock list at creation time
    pub index: usize,
    pub share_price: u64,
}

/// Receipt of a closed lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockEnded {
    pub lock: Lock,
    pub closed_on_day: u64,
    pub interest: u64,
    pub penalty: Penalty,
    /// Tokens released to the owner
    pub payout: u64,
    /// Set when the closure raised the share price
    pub new_share_price: Option<u64>,
    pub closed_by: Address,
}

/// Read-only view of the engine totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalInfo {
    pub state: GlobalState,
    pub current_day: u64,
    pub undistributed_penalties: u64,
    /// Forfeited tokens in custody not yet paid out as interest
    pub penalty_reserve: u64,
    pub open_locks: usize,
    pub custody_balance: u64,
    pub token_supply: u64,
}

pub struct StakingEngine<L: TokenLedger, C: Clock> {
    config: EngineConfig,
    ledger: L,
    clock: C,
    global: GlobalLedger,
    accrual: InterestAccrual,
    registry: LockRegistry,
    pricing: ShareCalculator,
}

impl<L: TokenLedger, C: Clock> StakingEngine<L, C> {
    pub fn new(config: EngineConfig, ledger: L, clock: C) -> std::result::Result<Self, ConfigError> {
        config.validate()?;

        Ok(StakingEngine {
            global: GlobalLedger::new(config.initial_share_price),
            accrual: InterestAccrual::new(config.schedule, config.max_days_per_call),
            registry: LockRegistry::new(),
            pricing: ShareCalculator::new(config.max_duration_days),
            config,
            ledger,
            clock,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn global_state(&self) -> GlobalState {
        self.global.snapshot()
    }

    pub fn accrual(&self) -> &InterestAccrual {
        &self.accrual
    }

    pub fn registry(&self) -> &LockRegistry {
        &self.registry
    }

    pub fn current_day(&self) -> Result<u64> {
        day_at(
            self.clock.now(),
            self.config.launch_timestamp,
            self.config.day_seconds,
        )
    }

    /// Lock `principal` tokens of `caller` for `duration_days`.
    pub fn start_lock(&mut self, caller: &str, principal: u64, duration_days: u64) -> Result<LockStarted> {
        self.check_duration(duration_days)?;
        if principal == 0 {
            return Err(StakeError::InvalidAmount(
                "principal must be greater than zero".to_string(),
            ));
        }

        let day = self.current_day()?;
        let mut state = self.global.snapshot();
        self.accrual.ensure_reachable(day, &state)?;

        let shares = self
            .pricing
            .shares_for(principal, duration_days, state.share_price)?;
        if shares == 0 {
            return Err(StakeError::InvalidAmount(format!(
                "{} tokens buy no shares at price {}",
                principal, state.share_price
            )));
        }
        let share_supply = state
            .total_share_supply
            .checked_add(shares)
            .ok_or(StakeError::ArithmeticOverflow)?;

        self.ledger
            .transfer(caller, &self.config.custody_address, principal)?;

        // Days before today are settled against the supply without this lock
        self.accrual
            .advance_to(day, &mut state, self.ledger.total_supply());

        let lock = Lock {
            id: state.next_lock_id(),
            owner: caller.to_string(),
            principal,
            share_count: shares,
            day_created: day,
            duration_days,
        };
        state.total_share_supply = share_supply;
        let index = self.registry.append(lock.clone());
        self.global.commit(state);

        info!(
            "lock {} started by {}: {} tokens for {} days -> {} shares (day {})",
            lock.id, caller, principal, duration_days, shares, day
        );
        Ok(LockStarted {
            lock,
            index,
            share_price: state.share_price,
        })
    }

    /// Close `caller`'s lock at `index`, which must hold `id`.
    pub fn end_lock(&mut self, caller: &str, index: usize, id: LockId) -> Result<LockEnded> {
        self.settle(caller, index, id, caller)
    }

    /// Close `caller`'s lock by id, resolving its current index first.
    pub fn end_lock_by_id(&mut self, caller: &str, id: LockId) -> Result<LockEnded> {
        let index = self
            .registry
            .position_of(caller, id)
            .ok_or(StakeError::UnknownLock(id))?;
        self.settle(caller, index, id, caller)
    }

    /// Close someone else's lock once it is `late_deadline_days` past
    /// maturity. The payout goes to the lock owner, not to `invoker`.
    pub fn end_lock_after_deadline(
        &mut self,
        invoker: &str,
        owner: &str,
        index: usize,
        id: LockId,
    ) -> Result<LockEnded> {
        let day = self.current_day()?;
        let lock = self.registry.lookup(owner, index, id)?;
        let deadline_day = lock.end_day() + self.config.late_deadline_days;
        if day < deadline_day {
            warn!(
                "{} tried to close lock {} of {} on day {} before deadline day {}",
                invoker, id, owner, day, deadline_day
            );
            return Err(StakeError::DeadlineNotReached {
                current_day: day,
                deadline_day,
            });
        }
        self.settle(owner, index, id, invoker)
    }

    fn settle(&mut self, owner: &str, index: usize, id: LockId, invoker: &str) -> Result<LockEnded> {
        let day = self.current_day()?;
        let lock = self.registry.lookup(owner, index, id)?.clone();
        let mut state = self.global.snapshot();
        self.accrual.ensure_reachable(day, &state)?;

        // Everything that can fail runs against the planned catch-up; nothing
        // is written until the closure is known to succeed.
        let catch_up = self
            .accrual
            .plan(day, &state, self.ledger.total_supply());

        // Interest stops at maturity even when closing late
        let last_interest_day = day.min(lock.end_day()) - 1;
        let interest = self.accrual.interest_with(
            &catch_up,
            lock.share_count,
            lock.day_created,
            last_interest_day,
        )?;

        let penalty = compute_penalty(
            day,
            lock.end_day(),
            &lock,
            interest,
            self.config.late_deadline_days,
        );
        let payout = lock
            .principal
            .checked_add(interest)
            .ok_or(StakeError::ArithmeticOverflow)?
            .saturating_sub(penalty.total());
        let new_share_price = self.pricing.rebase(
            payout,
            lock.duration_days,
            lock.share_count,
            state.share_price,
        )?;
        let share_supply = state
            .total_share_supply
            .checked_sub(lock.share_count)
            .ok_or(StakeError::ArithmeticOverflow)?;

        // Forfeited tokens already in custody pay interest before anything is minted
        let from_reserve = self.accrual.reserve_share(interest);
        let minted = interest - from_reserve;
        let custody = self.config.custody_address.clone();
        self.ledger
            .total_supply()
            .checked_add(minted)
            .ok_or(StakeError::ArithmeticOverflow)?;
        let available = self.ledger.balance_of(&custody).saturating_add(minted);
        if available < payout {
            warn!(
                "custody {} cannot pay {} for lock {} ({} available)",
                custody, payout, lock.id, available
            );
            return Err(StakeError::InsufficientBalance {
                address: custody,
                requested: payout,
                available,
            });
        }

        self.accrual.apply(catch_up, &mut state);
        self.ledger.mint(&custody, minted)?;
        self.ledger.transfer(&custody, &lock.owner, payout)?;
        self.registry.remove_at(owner, index)?;

        state.total_share_supply = share_supply;
        if let Some(price) = new_share_price {
            info!("share price raised {} -> {} by lock {}", state.share_price, price, lock.id);
            state.share_price = price;
        }
        self.accrual.draw_reserve(from_reserve);
        self.accrual.add_penalty(penalty.total());
        self.global.commit(state);

        info!(
            "lock {} of {} closed on day {} by {}: interest {} ({} minted), penalty {}, payout {}",
            lock.id,
            lock.owner,
            day,
            invoker,
            interest,
            minted,
            penalty.total(),
            payout
        );
        Ok(LockEnded {
            lock,
            closed_on_day: day,
            interest,
            penalty,
            payout,
            new_share_price,
            closed_by: invoker.to_string(),
        })
    }

    /// Run one bounded catch-up step towards the current day.
    pub fn advance_accrual(&mut self) -> Result<AccrualProgress> {
        let day = self.current_day()?;
        let mut state = self.global.snapshot();
        self.accrual
            .advance_to(day, &mut state, self.ledger.total_supply());
        self.global.commit(state);

        let progress = AccrualProgress {
            completed_days: state.num_completed_days,
            target_day: day,
            remaining_days: self.accrual.pending_days(day, &state),
        };
        debug!("accrual step: {:?}", progress);
        Ok(progress)
    }

    /// Shares `principal` would buy today for `duration_days`.
    pub fn preview_shares(&self, principal: u64, duration_days: u64) -> Result<u64> {
        self.check_duration(duration_days)?;
        self.pricing
            .shares_for(principal, duration_days, self.global.snapshot().share_price)
    }

    /// Interest earned so far by a lock.
    ///
    /// Reads the table as it stands; days not yet caught up are not counted.
    pub fn preview_interest(&self, owner: &str, index: usize, id: LockId) -> Result<u64> {
        let lock = self.registry.lookup(owner, index, id)?;
        let day = self.current_day()?;
        let last_day = (day.min(lock.end_day()) - 1).min(self.accrual.completed_days());
        self.accrual
            .interest_for(lock.share_count, lock.day_created, last_day)
    }

    pub fn locks_of(&self, owner: &str) -> Vec<&Lock> {
        self.registry.locks_of(owner)
    }

    pub fn global_info(&self) -> Result<GlobalInfo> {
        Ok(GlobalInfo {
            state: self.global.snapshot(),
            current_day: self.current_day()?,
            undistributed_penalties: self.accrual.undistributed_penalties(),
            penalty_reserve: self.accrual.penalty_reserve(),
            open_locks: self.registry.len(),
            custody_balance: self.ledger.balance_of(&self.config.custody_address),
            token_supply: self.ledger.total_supply(),
        })
    }

    fn check_duration(&self, duration_days: u64) -> Result<()> {
        let (min, max) = (self.config.min_duration_days, self.config.max_duration_days);
        if !(min..=max).contains(&duration_days) {
            return Err(StakeError::InvalidDuration {
                days: duration_days,
                min,
                max,
            });
        }
        Ok(())
    }
}
