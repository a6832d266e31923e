//! Scenario replay
//!
//! A scenario funds a set of accounts and then runs lifecycle steps, each on
//! a given day, against a fresh engine with a manual clock:
//!
//! ```json
//! {
//!   "accounts": { "alice": 10000000 },
//!   "steps": [
//!     { "day": 1, "action": "start", "owner": "alice", "principal": 1000000, "days": 100 },
//!     { "day": 101, "action": "end", "owner": "alice", "id": 1 }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use lockstake_core::{day_start, LockId, ManualClock, MemoryLedger, StakeError, TokenLedger};
use lockstake_staking::{
    AccrualProgress, ConfigError, EngineConfig, GlobalInfo, LockEnded, LockStarted, StakingEngine,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub accounts: BTreeMap<String, u64>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    pub day: u64,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Action {
    Start {
        owner: String,
        principal: u64,
        days: u64,
    },
    End {
        owner: String,
        id: u64,
    },
    EndAfterDeadline {
        invoker: String,
        owner: String,
        id: u64,
    },
    AdvanceAccrual,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Started(LockStarted),
    Ended(LockEnded),
    Accrual(AccrualProgress),
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub day: u64,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub steps: Vec<StepReport>,
    pub summary: GlobalInfo,
    pub balances: BTreeMap<String, u64>,
}

/// Run `scenario` on a fresh engine. Step failures are recorded in the
/// report; only setup errors abort the replay.
pub fn replay(config: EngineConfig, scenario: &Scenario) -> Result<Report, ConfigError> {
    let mut ledger = MemoryLedger::new();
    for (account, amount) in &scenario.accounts {
        ledger
            .mint(account, *amount)
            .map_err(|e| ConfigError::Invalid(format!("funding {}: {}", account, e)))?;
    }

    let clock = ManualClock::new(config.launch_timestamp);
    let mut engine = StakingEngine::new(config, ledger, clock)?;

    let mut steps = Vec::with_capacity(scenario.steps.len());
    for (i, step) in scenario.steps.iter().enumerate() {
        let config = engine.config();
        let now = day_start(step.day, config.launch_timestamp, config.day_seconds);
        engine.clock().set(now);

        let outcome = match run_step(&mut engine, &step.action) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("step {} (day {}) failed: {}", i, step.day, e);
                Outcome::Failed(e.to_string())
            }
        };
        steps.push(StepReport {
            step: i,
            day: step.day,
            outcome,
        });
    }

    let mut balances: BTreeMap<String, u64> = scenario
        .accounts
        .keys()
        .map(|account| (account.clone(), engine.ledger().balance_of(account)))
        .collect();
    let custody = engine.config().custody_address.clone();
    balances.insert(custody.clone(), engine.ledger().balance_of(&custody));

    let summary = engine
        .global_info()
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;

    Ok(Report {
        steps,
        summary,
        balances,
    })
}

fn run_step(
    engine: &mut StakingEngine<MemoryLedger, ManualClock>,
    action: &Action,
) -> Result<Outcome, StakeError> {
    match action {
        Action::Start {
            owner,
            principal,
            days,
        } => engine
            .start_lock(owner, *principal, *days)
            .map(Outcome::Started),
        Action::End { owner, id } => engine
            .end_lock_by_id(owner, LockId(*id))
            .map(Outcome::Ended),
        Action::EndAfterDeadline { invoker, owner, id } => {
            let id = LockId(*id);
            let index = engine
                .registry()
                .position_of(owner, id)
                .ok_or(StakeError::UnknownLock(id))?;
            engine
                .end_lock_after_deadline(invoker, owner, index, id)
                .map(Outcome::Ended)
        }
        Action::AdvanceAccrual => engine.advance_accrual().map(Outcome::Accrual),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"{
        "accounts": { "alice": 10000000, "keeper": 0 },
        "steps": [
            { "day": 1, "action": "start", "owner": "alice", "principal": 1000000, "days": 100 },
            { "day": 1, "action": "start", "owner": "alice", "principal": 1000000, "days": 0 },
            { "day": 1, "action": "start", "owner": "alice", "principal": 1000000, "days": 10 },
            { "day": 50, "action": "advance-accrual" },
            { "day": 101, "action": "end", "owner": "alice", "id": 1 },
            { "day": 300, "action": "end-after-deadline", "invoker": "keeper", "owner": "alice", "id": 2 },
            { "day": 376, "action": "end-after-deadline", "invoker": "keeper", "owner": "alice", "id": 2 }
        ]
    }"#;

    #[test]
    fn test_replay() {
        let scenario: Scenario = serde_json::from_str(SCENARIO).unwrap();
        let report = replay(EngineConfig::default(), &scenario).unwrap();

        assert_eq!(report.steps.len(), 7);
        assert!(matches!(report.steps[0].outcome, Outcome::Started(_)));
        assert!(matches!(report.steps[1].outcome, Outcome::Failed(_)));
        match &report.steps[3].outcome {
            Outcome::Accrual(progress) => assert_eq!(progress.completed_days, 49),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(matches!(report.steps[4].outcome, Outcome::Ended(_)));
        assert!(matches!(report.steps[5].outcome, Outcome::Failed(_)));
        match &report.steps[6].outcome {
            Outcome::Ended(ended) => {
                assert_eq!(ended.closed_by, "keeper");
                assert_eq!(ended.payout, 1_000_000);
            }
            other => panic!("unexpected outcome {:?}", other),
        }

        assert_eq!(report.summary.open_locks, 0);
        assert_eq!(report.balances["keeper"], 0);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["steps"][1]["outcome"]["failed"]
            .as_str()
            .unwrap()
            .contains("Invalid lock duration"));
    }

    #[test]
    fn test_unknown_action_rejected() {
        let result: Result<Scenario, _> =
            serde_json::from_str(r#"{ "steps": [ { "day": 1, "action": "split" } ] }"#);
        assert!(result.is_err());
    }
}
