//! The contract entry point: authorize, plan, apply.
//!
//! Every operation first runs against a [`Staging`] view that touches neither
//! the store nor the collaborators. Only a fully validated [`Plan`] reaches
//! the apply step, which checks outbound funds, commits the staged writes,
//! hands off the authorization policy and finally runs the transfer batch.
//! If a collaborator refuses after the commit, the store is put back.

use crate::error::AuditorError;
use crate::operation::{ExecutionContext, Operation};
use crate::staging::{Plan, Staging};
use crate::{candidate, stake, tally, tenure, unstake};
use auditor_host::{AuthorityManager, AuthorityPolicy, Capability, TokenLedger, Transfer};
use auditor_store::ElectionStore;
use auditor_types::{AccountName, Asset, AuditorConfig, Symbol};
use serde::Serialize;
use std::collections::BTreeMap;

/// What a committed operation did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub operation: &'static str,
    /// Outbound transfers executed on the ledger.
    pub transfers: Vec<Transfer>,
    /// Authorization policy handed to the authority manager, if any.
    pub policy: Option<AuthorityPolicy>,
    /// The auditor roster after the operation.
    pub auditors: Vec<AccountName>,
}

/// The auditor election contract, wired to its store and collaborators.
pub struct AuditorContract<'a, S: ?Sized, L: ?Sized, A: ?Sized> {
    config: &'a AuditorConfig,
    store: &'a S,
    ledger: &'a L,
    authority: &'a A,
}

impl<'a, S, L, A> AuditorContract<'a, S, L, A>
where
    S: ElectionStore + ?Sized,
    L: TokenLedger + ?Sized,
    A: AuthorityManager + ?Sized,
{
    pub fn new(config: &'a AuditorConfig, store: &'a S, ledger: &'a L, authority: &'a A) -> Self {
        Self {
            config,
            store,
            ledger,
            authority,
        }
    }

    /// Run one operation to completion. On error nothing has changed.
    pub fn execute(
        &self,
        ctx: &ExecutionContext,
        op: &Operation,
    ) -> Result<Receipt, AuditorError> {
        match self.try_execute(ctx, op) {
            Ok(receipt) => {
                tracing::info!(
                    operation = receipt.operation,
                    caller = %ctx.caller,
                    now = %ctx.now,
                    transfers = receipt.transfers.len(),
                    policy = receipt.policy.is_some(),
                    "operation committed"
                );
                Ok(receipt)
            }
            Err(e) => {
                tracing::debug!(
                    operation = op.name(),
                    caller = %ctx.caller,
                    kind = ?e.kind(),
                    error = %e,
                    "operation rejected"
                );
                Err(e)
            }
        }
    }

    fn try_execute(
        &self,
        ctx: &ExecutionContext,
        op: &Operation,
    ) -> Result<Receipt, AuditorError> {
        self.authorize(ctx, op)?;

        let mut staging = Staging::new(self.store);
        self.plan(ctx, op, &mut staging)?;
        let auditors = staging.auditors()?;
        let plan = staging.into_plan();

        let transfers = plan.transfers.clone();
        let policy = plan.policy.clone();
        self.apply(plan)?;

        Ok(Receipt {
            operation: op.name(),
            transfers,
            policy,
            auditors,
        })
    }

    fn authorize(&self, ctx: &ExecutionContext, op: &Operation) -> Result<(), AuditorError> {
        let actor = match op {
            Operation::Transfer(_) => Some(&self.config.token_contract),
            Operation::Nominate { cand }
            | Operation::Withdraw { cand }
            | Operation::UpdateBio { cand, .. }
            | Operation::Unstake { cand } => Some(cand),
            Operation::Resign { auditor } => Some(auditor),
            Operation::Vote { voter, .. } => Some(voter),
            Operation::FireCandidate { .. } | Operation::FireAuditor { .. } => {
                if self
                    .authority
                    .has_capability(&ctx.caller, Capability::Elevated)?
                {
                    return Ok(());
                }
                return Err(AuditorError::NotAuthorized {
                    caller: ctx.caller.clone(),
                    action: op.name(),
                });
            }
            Operation::RefreshVoteWeight { .. } | Operation::NewTenure { .. } => None,
        };
        match actor {
            Some(required) if *required != ctx.caller => Err(AuditorError::NotAuthorized {
                caller: ctx.caller.clone(),
                action: op.name(),
            }),
            _ => Ok(()),
        }
    }

    fn plan(
        &self,
        ctx: &ExecutionContext,
        op: &Operation,
        staging: &mut Staging<'_, S>,
    ) -> Result<(), AuditorError> {
        let config = self.config;
        let now = ctx.now;
        match op {
            Operation::Transfer(transfer) => {
                if stake::observe_transfer(config, staging, transfer, now)? {
                    // The stake left the voter's liquid balance.
                    if staging.vote(&transfer.from)?.is_some() {
                        let weight =
                            tally::refresh_weight(config, staging, self.ledger, &transfer.from)?;
                        tracing::debug!(voter = %transfer.from, weight, "vote weight follows stake");
                    }
                }
            }
            Operation::Nominate { cand } => candidate::nominate(config, staging, cand)?,
            Operation::Withdraw { cand } => candidate::withdraw(staging, cand, now)?,
            Operation::FireCandidate { cand, lockup_stake } => {
                candidate::fire_candidate(config, staging, cand, *lockup_stake, now)?;
            }
            Operation::Resign { auditor } | Operation::FireAuditor { auditor } => {
                let replacements = tenure::vacate_seat(config, staging, auditor, now)?;
                tracing::info!(
                    auditor = %auditor,
                    replacements = ?replacements,
                    "auditor seat vacated"
                );
            }
            Operation::UpdateBio { cand, bio } => candidate::update_bio(staging, cand, bio)?,
            Operation::Vote { voter, candidates } => {
                tally::vote(config, staging, self.ledger, voter, candidates)?;
            }
            Operation::RefreshVoteWeight { voter } => {
                let weight = tally::refresh_weight(config, staging, self.ledger, voter)?;
                tracing::debug!(voter = %voter, weight, "vote weight refreshed");
            }
            Operation::NewTenure {
                candidates,
                message,
            } => {
                tenure::new_tenure(config, staging, self.ledger, now, candidates, message)?;
            }
            Operation::Unstake { cand } => {
                let released = unstake::unstake(config, staging, cand, now)?;
                tracing::info!(candidate = %cand, released = %released, "stake released");
            }
        }
        Ok(())
    }

    fn apply(&self, plan: Plan) -> Result<(), AuditorError> {
        let Plan {
            writes,
            transfers,
            policy,
        } = plan;
        self.check_funds(&transfers)?;

        // Tokens must never leave custody for a state the store failed to
        // record, so the commit goes first.
        let external = policy.is_some() || !transfers.is_empty();
        let undo = if external && !writes.is_empty() {
            Some(writes.before_image(self.store)?)
        } else {
            None
        };
        if !writes.is_empty() {
            self.store.commit(writes)?;
        }

        let handed_off = match &policy {
            Some(policy) => self.authority.apply_policy(policy).map_err(AuditorError::from),
            None => Ok(()),
        };
        let outcome = handed_off.and_then(|()| {
            if transfers.is_empty() {
                return Ok(());
            }
            self.ledger
                .transfer_batch(&transfers)
                .map_err(AuditorError::from)
        });

        if let Err(e) = outcome {
            if let Some(undo) = undo {
                if let Err(restore) = self.store.commit(undo) {
                    tracing::error!(
                        error = %e,
                        restore_error = %restore,
                        "store could not be restored after a refused hand-off"
                    );
                }
            }
            return Err(e);
        }
        Ok(())
    }

    /// Every payer must cover the sum of its outbound legs before anything
    /// is applied.
    fn check_funds(&self, transfers: &[Transfer]) -> Result<(), AuditorError> {
        let mut needed: BTreeMap<(&AccountName, &Symbol), u128> = BTreeMap::new();
        for t in transfers {
            let entry = needed.entry((&t.from, t.quantity.symbol())).or_insert(0);
            *entry = entry
                .checked_add(t.quantity.amount())
                .ok_or(AuditorError::Overflow)?;
        }
        for ((payer, symbol), amount) in needed {
            let available = self.ledger.balance(payer, symbol)?;
            if available.amount() < amount {
                return Err(AuditorError::InsufficientFunds {
                    account: payer.to_string(),
                    needed: Asset::new(amount, symbol.clone()),
                    available,
                });
            }
        }
        Ok(())
    }
}
