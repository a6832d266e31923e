//! Interest accrual
//!
//! Keeps a prefix-sum table of interest per share, indexed by day. Entry `d`
//! holds the cumulative per-share interest of days `1..=d` scaled by
//! [`INTEREST_PRECISION`]; entry 0 is zero. The interest owed to a lock over
//! a day range is one subtraction away.
//!
//! The table is only written for completed days. Today's interest is never
//! pre-written, so advancing to day `t` fills days up to `t - 1`.

use log::debug;
use serde::{Deserialize, Serialize};

use lockstake_core::constants::INTEREST_PRECISION;
use lockstake_core::{GlobalState, Result, StakeError};
use lockstake_economics::RateSchedule;

/// Progress of one bounded catch-up step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualProgress {
    pub completed_days: u64,
    pub target_day: u64,
    /// Days still missing before `target_day` can be served
    pub remaining_days: u64,
}

/// Table entries computed by [`InterestAccrual::plan`] but not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatchUp {
    first_day: u64,
    sums: Vec<u128>,
    folded_penalties: u64,
}

impl CatchUp {
    /// Newest completed day once this catch-up is applied.
    pub fn completed_days(&self) -> u64 {
        self.first_day - 1 + self.sums.len() as u64
    }

    /// Undistributed penalties this catch-up pays out.
    pub fn folded_penalties(&self) -> u64 {
        self.folded_penalties
    }
}

#[derive(Debug, Clone)]
pub struct InterestAccrual {
    schedule: RateSchedule,
    max_days_per_call: u64,
    prefix_sums: Vec<u128>,
    undistributed_penalties: u64,
    /// Forfeited tokens held in custody that no open lock's principal backs
    penalty_reserve: u64,
}

impl InterestAccrual {
    pub fn new(schedule: RateSchedule, max_days_per_call: u64) -> Self {
        InterestAccrual {
            schedule,
            max_days_per_call: max_days_per_call.max(1),
            prefix_sums: vec![0],
            undistributed_penalties: 0,
            penalty_reserve: 0,
        }
    }

    pub fn schedule(&self) -> &RateSchedule {
        &self.schedule
    }

    pub fn max_days_per_call(&self) -> u64 {
        self.max_days_per_call
    }

    /// Days that must be written before `target_day` can be served.
    pub fn pending_days(&self, target_day: u64, state: &GlobalState) -> u64 {
        target_day.saturating_sub(state.num_completed_days + 1)
    }

    /// Fails when reaching `target_day` needs more than one bounded step.
    pub fn ensure_reachable(&self, target_day: u64, state: &GlobalState) -> Result<()> {
        if self.pending_days(target_day, state) > self.max_days_per_call {
            return Err(StakeError::AccrualPending {
                completed: state.num_completed_days,
                target: target_day,
            });
        }
        Ok(())
    }

    /// Compute completed days up to `target_day - 1`, at most
    /// `max_days_per_call` of them, without writing anything.
    ///
    /// The first day computed absorbs all undistributed penalties when
    /// there are shares to pay them to.
    pub fn plan(&self, target_day: u64, state: &GlobalState, token_supply: u64) -> CatchUp {
        let first = state.num_completed_days + 1;
        let goal = target_day.saturating_sub(1);
        if goal < first {
            return CatchUp {
                first_day: first,
                sums: Vec::new(),
                folded_penalties: 0,
            };
        }

        let last = goal.min(state.num_completed_days + self.max_days_per_call);
        let folded_penalties = if state.total_share_supply > 0 {
            self.undistributed_penalties
        } else {
            0
        };

        let mut sum = self.latest();
        let mut sums = Vec::with_capacity((last - first + 1) as usize);
        for day in first..=last {
            let mut pool = self.schedule.daily_pool(day, token_supply) as u128;
            if state.total_share_supply > 0 {
                if day == first {
                    pool += folded_penalties as u128;
                }
                sum += pool * INTEREST_PRECISION / state.total_share_supply as u128;
            }
            sums.push(sum);
        }

        CatchUp {
            first_day: first,
            sums,
            folded_penalties,
        }
    }

    /// Write a planned catch-up and return the newest cumulative value.
    pub fn apply(&mut self, catch_up: CatchUp, state: &mut GlobalState) -> u128 {
        if catch_up.sums.is_empty() {
            return self.latest();
        }

        let last = catch_up.completed_days();
        self.undistributed_penalties -= catch_up.folded_penalties;
        self.prefix_sums.extend(catch_up.sums);
        state.num_completed_days = last;

        let sum = self.latest();
        debug!(
            "accrual: wrote days {}..={}, cumulative {} per share",
            catch_up.first_day, last, sum
        );
        sum
    }

    /// Write completed days up to `target_day - 1`, at most
    /// `max_days_per_call` of them, and return the newest cumulative value.
    ///
    /// Reaching a day in one call or in several produces the same table.
    pub fn advance_to(&mut self, target_day: u64, state: &mut GlobalState, token_supply: u64) -> u128 {
        let catch_up = self.plan(target_day, state, token_supply);
        self.apply(catch_up, state)
    }

    /// Record forfeited tokens for redistribution on the next catch-up.
    pub fn add_penalty(&mut self, amount: u64) {
        self.undistributed_penalties = self.undistributed_penalties.saturating_add(amount);
        self.penalty_reserve = self.penalty_reserve.saturating_add(amount);
    }

    pub fn undistributed_penalties(&self) -> u64 {
        self.undistributed_penalties
    }

    /// Forfeited tokens still sitting in custody.
    pub fn penalty_reserve(&self) -> u64 {
        self.penalty_reserve
    }

    /// Part of `interest` the reserve can pay; the rest must be minted.
    pub fn reserve_share(&self, interest: u64) -> u64 {
        interest.min(self.penalty_reserve)
    }

    /// Take `amount` out of the reserve after paying it as interest.
    pub fn draw_reserve(&mut self, amount: u64) {
        self.penalty_reserve = self.penalty_reserve.saturating_sub(amount);
    }

    /// Cumulative value of the newest completed day (0 for an empty table).
    pub fn latest(&self) -> u128 {
        self.prefix_sums.last().copied().unwrap_or(0)
    }

    pub fn completed_days(&self) -> u64 {
        self.prefix_sums.len() as u64 - 1
    }

    pub fn prefix_at(&self, day: u64) -> Option<u128> {
        self.prefix_sums.get(day as usize).copied()
    }

    /// Interest owed to `shares` for days `first_day..=last_day`.
    ///
    /// An empty range (`last_day < first_day`) owes nothing.
    pub fn interest_for(&self, shares: u64, first_day: u64, last_day: u64) -> Result<u64> {
        self.interest_with(&self.plan_none(), shares, first_day, last_day)
    }

    /// Like [`interest_for`](Self::interest_for), reading days past the
    /// table from a planned `pending` catch-up.
    pub fn interest_with(
        &self,
        pending: &CatchUp,
        shares: u64,
        first_day: u64,
        last_day: u64,
    ) -> Result<u64> {
        if last_day < first_day {
            return Ok(0);
        }
        let start = self.prefix_through(pending, first_day.saturating_sub(1))?;
        let end = self.prefix_through(pending, last_day)?;

        let interest = (shares as u128)
            .checked_mul(end.saturating_sub(start))
            .ok_or(StakeError::ArithmeticOverflow)?
            / INTEREST_PRECISION;
        u64::try_from(interest).map_err(|_| StakeError::ArithmeticOverflow)
    }

    fn prefix_through(&self, pending: &CatchUp, day: u64) -> Result<u128> {
        let written = self.completed_days();
        let found = if day <= written {
            self.prefix_at(day)
        } else if day >= pending.first_day {
            pending.sums.get((day - pending.first_day) as usize).copied()
        } else {
            None
        };
        found.ok_or(StakeError::AccrualPending {
            completed: written.max(pending.completed_days()),
            target: day + 1,
        })
    }

    fn plan_none(&self) -> CatchUp {
        CatchUp {
            first_day: self.completed_days() + 1,
            sums: Vec::new(),
            folded_penalties: 0,
        }
    }

    /// Per-share interest of each day in `begin_day..end_day`, as far as
    /// the table reaches.
    pub fn daily_range(&self, begin_day: u64, end_day: u64) -> Vec<u128> {
        let begin = begin_day.max(1);
        let end = end_day.min(self.completed_days() + 1);
        (begin..end)
            .map(|day| self.prefix_sums[day as usize] - self.prefix_sums[day as usize - 1])
            .collect()
    }
}
