//! Global staking totals
//!
//! Plain read/replace holder. Lifecycle operations work on a snapshot and
//! commit it back once every step has succeeded.

use lockstake_core::GlobalState;

#[derive(Debug, Clone)]
pub struct GlobalLedger {
    state: GlobalState,
}

impl GlobalLedger {
    pub fn new(initial_share_price: u64) -> Self {
        GlobalLedger {
            state: GlobalState::new(initial_share_price),
        }
    }

    pub fn snapshot(&self) -> GlobalState {
        self.state
    }

    pub fn commit(&mut self, state: GlobalState) {
        self.state = state;
    }
}
