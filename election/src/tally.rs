//! Vote tally engine.
//!
//! A voter's record contributes its weight once to every candidate it names.
//! When the record changes, only the candidates in the union of the old and
//! new sets are touched: the old weight comes off everything in the old set
//! and the new weight goes onto everything in the new set.

use crate::error::AuditorError;
use crate::staging::Staging;
use auditor_host::TokenLedger;
use auditor_store::{ElectionStore, Vote};
use auditor_types::{AccountName, AuditorConfig};
use std::collections::BTreeSet;

/// Replace `voter`'s contribution `old` with `new_weight` spread over `new_set`.
pub(crate) fn apply_delta<S: ElectionStore + ?Sized>(
    staging: &mut Staging<'_, S>,
    old: Option<&Vote>,
    new_set: &[AccountName],
    new_weight: u128,
) -> Result<(), AuditorError> {
    let (old_set, old_weight): (&[AccountName], u128) = match old {
        Some(v) => (&v.candidates, v.weight),
        None => (&[], 0),
    };
    let old_names: BTreeSet<&AccountName> = old_set.iter().collect();
    let new_names: BTreeSet<&AccountName> = new_set.iter().collect();

    for name in old_names.union(&new_names) {
        let in_old = old_names.contains(name);
        let in_new = new_names.contains(name);
        if in_old && in_new && old_weight == new_weight {
            continue;
        }
        let mut candidate = staging.require_candidate(name)?;
        let mut total = candidate.total_votes;
        if in_new {
            total = total.checked_add(new_weight).ok_or(AuditorError::Overflow)?;
        }
        if in_old {
            total = total
                .checked_sub(old_weight)
                .ok_or_else(|| AuditorError::TallyUnderflow((*name).clone()))?;
        }
        candidate.total_votes = total;
        staging.put_candidate(candidate);
    }

    let cast_before = if old_set.is_empty() { 0 } else { old_weight };
    let cast_after = if new_set.is_empty() { 0 } else { new_weight };
    let mut state = staging.state()?;
    state.total_weight_of_votes = state
        .total_weight_of_votes
        .checked_add(cast_after)
        .ok_or(AuditorError::Overflow)?
        .checked_sub(cast_before)
        .ok_or(AuditorError::Overflow)?;
    staging.put_state(state);
    Ok(())
}

/// Check a submitted candidate list against the voting rules.
fn validate_ballot<S: ElectionStore + ?Sized>(
    config: &AuditorConfig,
    staging: &Staging<'_, S>,
    candidates: &[AccountName],
) -> Result<(), AuditorError> {
    if candidates.len() > usize::from(config.maxvotes) {
        return Err(AuditorError::TooManyVotes {
            submitted: candidates.len(),
            max: config.maxvotes,
        });
    }
    let mut seen = BTreeSet::new();
    for name in candidates {
        if !seen.insert(name) {
            return Err(AuditorError::DuplicateVote(name.clone()));
        }
    }
    for name in candidates {
        match staging.candidate(name)? {
            Some(c) if c.is_active => {}
            _ => return Err(AuditorError::IneligibleCandidate(name.clone())),
        }
    }
    Ok(())
}

/// Cast, change, or (with an empty list) retract a vote.
pub(crate) fn vote<S, L>(
    config: &AuditorConfig,
    staging: &mut Staging<'_, S>,
    ledger: &L,
    voter: &AccountName,
    candidates: &[AccountName],
) -> Result<(), AuditorError>
where
    S: ElectionStore + ?Sized,
    L: TokenLedger + ?Sized,
{
    validate_ballot(config, staging, candidates)?;
    let previous = staging.vote(voter)?;

    if candidates.is_empty() {
        if let Some(old) = previous {
            apply_delta(staging, Some(&old), &[], 0)?;
            staging.delete_vote(voter);
        }
        return Ok(());
    }

    let weight = ledger.balance(voter, config.lockupasset.symbol())?.amount();
    apply_delta(staging, previous.as_ref(), candidates, weight)?;
    staging.put_vote(Vote {
        voter: voter.clone(),
        proxy: None,
        weight,
        candidates: candidates.to_vec(),
    });
    Ok(())
}

/// Re-read `voter`'s balance and move its existing vote to the new weight.
///
/// Returns the weight now in force.
pub(crate) fn refresh_weight<S, L>(
    config: &AuditorConfig,
    staging: &mut Staging<'_, S>,
    ledger: &L,
    voter: &AccountName,
) -> Result<u128, AuditorError>
where
    S: ElectionStore + ?Sized,
    L: TokenLedger + ?Sized,
{
    let mut existing = staging
        .vote(voter)?
        .ok_or_else(|| AuditorError::NoVoteRecorded(voter.clone()))?;
    let weight = ledger.balance(voter, config.lockupasset.symbol())?.amount();
    if weight == existing.weight {
        return Ok(weight);
    }
    apply_delta(staging, Some(&existing), &existing.candidates, weight)?;
    existing.weight = weight;
    staging.put_vote(existing);
    Ok(weight)
}
