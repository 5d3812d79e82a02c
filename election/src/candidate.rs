//! Candidate lifecycle: nomination, withdrawal, forced removal, bios.

use crate::error::AuditorError;
use crate::staging::Staging;
use auditor_store::{Candidate, ElectionState, ElectionStore, LockKind};
use auditor_types::{AccountName, Asset, AuditorConfig, Timestamp};

/// Longest accepted bio, in characters.
pub const MAX_BIO_CHARS: usize = 256;

/// Mark `candidate` inactive, keeping the active counter in step.
pub(crate) fn deactivate(candidate: &mut Candidate, state: &mut ElectionState) {
    if candidate.is_active {
        candidate.is_active = false;
        state.number_active_candidates = state.number_active_candidates.saturating_sub(1);
    }
}

pub(crate) fn nominate<S: ElectionStore + ?Sized>(
    config: &AuditorConfig,
    staging: &mut Staging<'_, S>,
    cand: &AccountName,
) -> Result<(), AuditorError> {
    let required = &config.lockupasset;
    let Some(mut candidate) = staging.candidate(cand)? else {
        return Err(AuditorError::InsufficientStake {
            candidate: cand.clone(),
            locked: Asset::zero(required.symbol().clone()),
            required: required.clone(),
        });
    };
    if candidate.is_active {
        return Err(AuditorError::AlreadyActive(cand.clone()));
    }
    required.ensure_same_symbol(&candidate.locked_tokens)?;
    if candidate.locked_tokens.amount() < required.amount() {
        return Err(AuditorError::InsufficientStake {
            candidate: cand.clone(),
            locked: candidate.locked_tokens,
            required: required.clone(),
        });
    }

    let mut state = staging.state()?;
    candidate.is_active = true;
    state.number_active_candidates = state.number_active_candidates.saturating_add(1);
    staging.put_candidate(candidate);
    staging.put_state(state);
    Ok(())
}

/// Voluntary withdrawal. A deposit lock is released on the spot; a tenure
/// lock is left to run out.
pub(crate) fn withdraw<S: ElectionStore + ?Sized>(
    staging: &mut Staging<'_, S>,
    cand: &AccountName,
    now: Timestamp,
) -> Result<(), AuditorError> {
    let mut candidate = staging.require_candidate(cand)?;
    if !candidate.is_active {
        return Err(AuditorError::NotActive(cand.clone()));
    }
    if staging.auditors()?.contains(cand) {
        return Err(AuditorError::SeatedAuditor(cand.clone()));
    }

    let mut state = staging.state()?;
    deactivate(&mut candidate, &mut state);
    if candidate.lock_kind == LockKind::Deposit && candidate.is_locked(now) {
        candidate.unstaking_end_time = now;
    }
    staging.put_candidate(candidate);
    staging.put_state(state);
    Ok(())
}

pub(crate) fn fire_candidate<S: ElectionStore + ?Sized>(
    config: &AuditorConfig,
    staging: &mut Staging<'_, S>,
    cand: &AccountName,
    lockup_stake: bool,
    now: Timestamp,
) -> Result<(), AuditorError> {
    let mut candidate = staging.require_candidate(cand)?;
    if !candidate.is_active {
        return Err(AuditorError::NotActive(cand.clone()));
    }

    let mut state = staging.state()?;
    deactivate(&mut candidate, &mut state);
    if lockup_stake {
        candidate.lock_for_tenure(now.plus_secs(config.lockup_release_time_delay));
    }
    staging.put_candidate(candidate);
    staging.put_state(state);
    Ok(())
}

pub(crate) fn update_bio<S: ElectionStore + ?Sized>(
    staging: &mut Staging<'_, S>,
    cand: &AccountName,
    bio: &str,
) -> Result<(), AuditorError> {
    let len = bio.chars().count();
    if len > MAX_BIO_CHARS {
        return Err(AuditorError::BioTooLong {
            len,
            max: MAX_BIO_CHARS,
        });
    }
    staging.require_candidate(cand)?;
    staging.put_bio(cand, bio.to_owned());
    Ok(())
}
