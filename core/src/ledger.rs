//! Fungible token ledger used for custody of locked principal

use crate::error::{Result, StakeError};
use crate::types::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The token ledger the staking engine settles against.
///
/// The engine mints when it credits interest and transfers when it moves
/// principal into or out of custody.
pub trait TokenLedger {
    fn mint(&mut self, to: &str, amount: u64) -> Result<()>;

    fn transfer(&mut self, from: &str, to: &str, amount: u64) -> Result<()>;

    fn total_supply(&self) -> u64;

    fn balance_of(&self, address: &str) -> u64;
}

/// In-memory ledger keyed by address.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryLedger {
    balances: HashMap<Address, u64>,
    total_supply: u64,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn balance_mut(&mut self, address: &str) -> &mut u64 {
        self.balances.entry(address.to_string()).or_insert(0)
    }
}

impl TokenLedger for MemoryLedger {
    fn mint(&mut self, to: &str, amount: u64) -> Result<()> {
        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(StakeError::ArithmeticOverflow)?;

        let balance = self.balance_mut(to);
        *balance = balance
            .checked_add(amount)
            .ok_or(StakeError::ArithmeticOverflow)?;
        self.total_supply = new_supply;

        Ok(())
    }

    fn transfer(&mut self, from: &str, to: &str, amount: u64) -> Result<()> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(StakeError::InsufficientBalance {
                address: from.to_string(),
                requested: amount,
                available,
            });
        }
        if from == to || amount == 0 {
            return Ok(());
        }

        // Receiver cannot overflow: its balance plus `amount` is bounded by total supply
        *self.balance_mut(from) -= amount;
        *self.balance_mut(to) += amount;

        Ok(())
    }

    fn total_supply(&self) -> u64 {
        self.total_supply
    }

    fn balance_of(&self, address: &str) -> u64 {
        self.balances.get(address).copied().unwrap_or(0)
    }
}
