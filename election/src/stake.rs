//! Turns completed credits into locked candidate stake.

use crate::error::AuditorError;
use crate::staging::Staging;
use auditor_host::Transfer;
use auditor_store::{Candidate, ElectionStore, LockKind};
use auditor_types::{AuditorConfig, Timestamp};

/// Record a completed transfer reported by the token contract.
///
/// Transfers not addressed to the contract account, and the contract's own
/// outbound transfers, are ignored. Any new credit restarts the release
/// delay. Returns whether the transfer was credited as stake.
pub(crate) fn observe_transfer<S: ElectionStore + ?Sized>(
    config: &AuditorConfig,
    staging: &mut Staging<'_, S>,
    transfer: &Transfer,
    now: Timestamp,
) -> Result<bool, AuditorError> {
    if transfer.to != config.contract_account || transfer.from == config.contract_account {
        return Ok(false);
    }
    config.lockupasset.ensure_same_symbol(&transfer.quantity)?;

    let unlock_at = now.plus_secs(config.lockup_release_time_delay);
    let candidate = match staging.candidate(&transfer.from)? {
        Some(mut existing) => {
            existing.locked_tokens = existing.locked_tokens.checked_add(&transfer.quantity)?;
            let tenure_pending =
                existing.lock_kind == LockKind::Tenure && existing.is_locked(now);
            existing.unstaking_end_time = if tenure_pending {
                existing.unstaking_end_time.max(unlock_at)
            } else {
                existing.lock_kind = LockKind::Deposit;
                unlock_at
            };
            existing
        }
        None => Candidate::from_deposit(transfer.from.clone(), transfer.quantity.clone(), unlock_at),
    };

    tracing::debug!(
        candidate = %candidate.candidate_name,
        quantity = %transfer.quantity,
        locked = %candidate.locked_tokens,
        "stake credited"
    );
    staging.put_candidate(candidate);
    Ok(true)
}
