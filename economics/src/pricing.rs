//! Share pricing calculations
//!
//! Shares are bought at the current share price with a quadratic bonus for
//! longer commitments:
//!
//! ```text
//! multiplier = 1 + (duration_days / (max_duration_days / 10))^2
//! shares     = floor(principal * multiplier / share_price)
//! ```
//!
//! The multiplier is carried in fixed point with [`MULTIPLIER_SCALE`].

use lockstake_core::{Result, StakeError};
use serde::{Deserialize, Serialize};

/// Fixed-point scale of the bonus multiplier (1.0 == 10^9)
pub const MULTIPLIER_SCALE: u128 = 1_000_000_000;

/// Outcome of a share purchase preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePurchase {
    pub principal: u64,
    pub duration_days: u64,
    pub share_price: u64,
    /// Bonus multiplier scaled by [`MULTIPLIER_SCALE`]
    pub multiplier: u128,
    pub shares: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareCalculator {
    /// Duration at which the bonus reaches 2x (a tenth of the maximum duration)
    bonus_period_days: u64,
}

impl ShareCalculator {
    pub fn new(max_duration_days: u64) -> Self {
        ShareCalculator {
            bonus_period_days: (max_duration_days / 10).max(1),
        }
    }

    pub fn bonus_period_days(&self) -> u64 {
        self.bonus_period_days
    }

    /// Duration bonus in fixed point, rounded down.
    pub fn bonus_multiplier(&self, duration_days: u64) -> u128 {
        let d = duration_days as u128;
        let period = self.bonus_period_days as u128;
        MULTIPLIER_SCALE + d * d * MULTIPLIER_SCALE / (period * period)
    }

    /// Shares bought by `principal` at `share_price`, rounded down.
    pub fn shares_for(&self, principal: u64, duration_days: u64, share_price: u64) -> Result<u64> {
        Ok(self.purchase(principal, duration_days, share_price)?.shares)
    }

    pub fn purchase(
        &self,
        principal: u64,
        duration_days: u64,
        share_price: u64,
    ) -> Result<SharePurchase> {
        if share_price == 0 {
            return Err(StakeError::InvalidAmount(
                "share price must be greater than zero".to_string(),
            ));
        }

        let multiplier = self.bonus_multiplier(duration_days);
        let bonused = (principal as u128)
            .checked_mul(multiplier)
            .ok_or(StakeError::ArithmeticOverflow)?;
        let shares = bonused / (MULTIPLIER_SCALE * share_price as u128);
        let shares = u64::try_from(shares).map_err(|_| StakeError::ArithmeticOverflow)?;

        Ok(SharePurchase {
            principal,
            duration_days,
            share_price,
            multiplier,
            shares,
        })
    }

    /// Share price at which `payout` buys exactly `shares_retired` shares with
    /// the same duration bonus. Rounded up, so re-valuing the payout at the
    /// returned price never yields more than `shares_retired` shares.
    pub fn rebased_price(
        &self,
        payout: u64,
        duration_days: u64,
        shares_retired: u64,
    ) -> Result<u64> {
        if shares_retired == 0 {
            return Err(StakeError::InvalidAmount(
                "cannot rebase against zero shares".to_string(),
            ));
        }

        let bonused = (payout as u128)
            .checked_mul(self.bonus_multiplier(duration_days))
            .ok_or(StakeError::ArithmeticOverflow)?;
        let price = bonused.div_ceil(MULTIPLIER_SCALE * shares_retired as u128);
        u64::try_from(price).map_err(|_| StakeError::ArithmeticOverflow)
    }

    /// New share price after a closure, or `None` when the price stays.
    ///
    /// Only rises when `payout` would buy more than `share_count` shares at
    /// `current_price`; the result is then strictly above `current_price`.
    pub fn rebase(
        &self,
        payout: u64,
        duration_days: u64,
        share_count: u64,
        current_price: u64,
    ) -> Result<Option<u64>> {
        if share_count == 0 {
            return Ok(None);
        }

        let implied = self.shares_for(payout, duration_days, current_price)?;
        if implied <= share_count {
            return Ok(None);
        }

        let price = self.rebased_price(payout, duration_days, share_count)?;
        Ok(Some(price.max(current_price)))
    }
}
