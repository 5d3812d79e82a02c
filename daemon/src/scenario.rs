//! Scenario replay.
//!
//! A scenario seeds a simulated token ledger and lists operations to run in
//! order against a store. A `transfer` step is delivered the way the host
//! delivers one: the ledger moves the tokens first and the token contract
//! then notifies the election contract.
//!
//! A store that already holds stake (a reused `--data-dir`) has that stake
//! credited to the contract account on the fresh ledger, so earlier bonds
//! can still be released.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use auditor_election::{AuditorContract, ExecutionContext, Operation, Receipt};
use auditor_host::TokenLedger;
use auditor_nullables::{NullAuthority, NullClock, NullLedger};
use auditor_store::ElectionStore;
use auditor_types::{AccountName, Asset, AuditorConfig, Symbol};
use serde::{Deserialize, Serialize};

use crate::snapshot::Snapshot;

#[derive(Debug, Deserialize)]
pub struct Scenario {
    /// Clock value before the first step, in seconds.
    #[serde(default)]
    pub start: u64,
    /// Maximum supply per token symbol.
    #[serde(default)]
    pub max_supply: Vec<Asset>,
    #[serde(default)]
    pub balances: Vec<Balance>,
    /// Accounts holding the elevated capability.
    #[serde(default)]
    pub elevated: Vec<AccountName>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
pub struct Balance {
    pub account: AccountName,
    pub quantity: Asset,
}

#[derive(Debug, Deserialize)]
pub struct Step {
    /// Seconds to move the clock forward before this step.
    #[serde(default)]
    pub advance: u64,
    /// Invoking account. Optional for transfers, which the token contract reports.
    #[serde(default)]
    pub caller: Option<AccountName>,
    pub op: Operation,
}

impl Scenario {
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("parsing scenario {}", path.display()))
    }

    pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// How one step ended.
#[derive(Debug, Serialize)]
pub struct Outcome {
    pub step: usize,
    pub at: u64,
    pub operation: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<Receipt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub committed: usize,
    pub rejected: usize,
    pub outcomes: Vec<Outcome>,
    pub final_state: Snapshot,
}

/// Run every step of `scenario` against `store`.
///
/// Rejected steps are recorded and replay continues; only store failures
/// while taking the final snapshot abort the replay.
pub fn replay<S: ElectionStore + ?Sized>(
    config: &AuditorConfig,
    store: &S,
    scenario: &Scenario,
) -> anyhow::Result<ReplayReport> {
    let ledger = NullLedger::new();
    for supply in &scenario.max_supply {
        ledger.set_max_supply(supply);
    }
    for b in &scenario.balances {
        ledger.set_balance(&b.account, &b.quantity);
    }
    seed_custody(config, store, &ledger)?;
    let authority = NullAuthority::new();
    for actor in &scenario.elevated {
        authority.grant_elevated(actor);
    }
    let clock = NullClock::new(scenario.start);
    let contract = AuditorContract::new(config, store, &ledger, &authority);

    let mut outcomes = Vec::with_capacity(scenario.steps.len());
    for (index, step) in scenario.steps.iter().enumerate() {
        clock.advance(step.advance);
        let now = clock.now();
        let mut outcome = Outcome {
            step: index,
            at: now.as_secs(),
            operation: step.op.name(),
            receipt: None,
            error: None,
            kind: None,
        };

        let caller = match (&step.op, &step.caller) {
            (_, Some(caller)) => caller.clone(),
            (Operation::Transfer(_), None) => config.token_contract.clone(),
            (_, None) => {
                outcome.error = Some("step has no caller".to_string());
                outcomes.push(outcome);
                continue;
            }
        };

        if let Operation::Transfer(transfer) = &step.op {
            if let Err(e) = ledger.transfer_batch(std::slice::from_ref(transfer)) {
                tracing::warn!(step = index, error = %e, "ledger refused scenario transfer");
                outcome.error = Some(e.to_string());
                outcome.kind = Some("Ledger".to_string());
                outcomes.push(outcome);
                continue;
            }
        }

        match contract.execute(&ExecutionContext::new(caller, now), &step.op) {
            Ok(receipt) => outcome.receipt = Some(receipt),
            Err(e) => {
                tracing::warn!(step = index, operation = step.op.name(), error = %e, "step rejected");
                outcome.kind = Some(format!("{:?}", e.kind()));
                outcome.error = Some(e.to_string());
            }
        }
        outcomes.push(outcome);
    }

    let committed = outcomes.iter().filter(|o| o.receipt.is_some()).count();
    Ok(ReplayReport {
        committed,
        rejected: outcomes.len() - committed,
        outcomes,
        final_state: Snapshot::capture(store)?,
    })
}

/// Add the stake already locked in `store` to the contract's ledger balance.
fn seed_custody<S: ElectionStore + ?Sized>(
    config: &AuditorConfig,
    store: &S,
    ledger: &NullLedger,
) -> anyhow::Result<()> {
    let mut locked: BTreeMap<Symbol, u128> = BTreeMap::new();
    for candidate in store.iter_candidates()? {
        let entry = locked
            .entry(candidate.locked_tokens.symbol().clone())
            .or_insert(0);
        *entry = entry
            .checked_add(candidate.locked_tokens.amount())
            .context("stored stake overflows")?;
    }
    for (symbol, amount) in locked {
        if amount == 0 {
            continue;
        }
        let held = ledger
            .raw_balance(&config.contract_account, &symbol)
            .checked_add(amount)
            .context("contract balance overflows")?;
        ledger.set_balance(&config.contract_account, &Asset::new(held, symbol.clone()));
        tracing::info!(
            account = %config.contract_account,
            custodied = %Asset::new(held, symbol),
            "seeded custody from stored stake"
        );
    }
    Ok(())
}
