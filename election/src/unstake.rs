//! Release of locked stake back to its owner.

use crate::error::AuditorError;
use crate::staging::Staging;
use auditor_host::Transfer;
use auditor_store::ElectionStore;
use auditor_types::{AccountName, Asset, AuditorConfig, Timestamp};

pub const UNSTAKE_MEMO: &str = "unstake";

/// Stage the release of `cand`'s whole stake. The record stays, zeroed.
///
/// Returns the amount released.
pub(crate) fn unstake<S: ElectionStore + ?Sized>(
    config: &AuditorConfig,
    staging: &mut Staging<'_, S>,
    cand: &AccountName,
    now: Timestamp,
) -> Result<Asset, AuditorError> {
    let mut candidate = staging.require_candidate(cand)?;
    if candidate.is_active {
        return Err(AuditorError::StillActive(cand.clone()));
    }
    if staging.auditors()?.contains(cand) {
        return Err(AuditorError::SeatedAuditor(cand.clone()));
    }
    if candidate.is_locked(now) {
        return Err(AuditorError::StakeLocked {
            candidate: cand.clone(),
            until: candidate.unstaking_end_time,
        });
    }
    if candidate.locked_tokens.is_zero() {
        return Err(AuditorError::NothingToUnstake(cand.clone()));
    }

    let released = candidate.locked_tokens.clone();
    candidate.locked_tokens = Asset::zero(released.symbol().clone());
    staging.put_candidate(candidate);
    staging.push_transfer(Transfer {
        from: config.contract_account.clone(),
        to: cand.clone(),
        quantity: released.clone(),
        memo: UNSTAKE_MEMO.to_owned(),
    });
    Ok(released)
}
