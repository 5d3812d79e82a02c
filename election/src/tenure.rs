//! Tenure rotation: the committee is re-elected from the current tallies once
//! the vote quorum is reached and a full period has passed.

use crate::candidate::deactivate;
use crate::error::AuditorError;
use crate::staging::Staging;
use auditor_host::{AuthorityPolicy, PermissionLevelWeight, TokenLedger, Transfer};
use auditor_store::{Candidate, ElectionStore};
use auditor_types::{AccountName, AuditorConfig, Timestamp};
use std::collections::BTreeSet;

/// Permission installed on the managed account.
pub const AUDITORS_PERMISSION: &str = "auditors";
/// Parent of [`AUDITORS_PERMISSION`], and the permission each member signs with.
pub const ACTIVE_PERMISSION: &str = "active";
pub const PAY_MEMO: &str = "auditor pay";

/// Result of a successful rotation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rotation {
    pub elected: Vec<AccountName>,
    pub displaced: Vec<AccountName>,
}

/// Top `limit` electable candidates: active, at least one vote, not in
/// `exclude`. Ordered by descending weight, ties by ascending name.
pub fn rank(
    candidates: &[Candidate],
    exclude: &BTreeSet<AccountName>,
    limit: usize,
) -> Vec<AccountName> {
    let mut eligible: Vec<&Candidate> = candidates
        .iter()
        .filter(|c| c.is_active && c.total_votes > 0 && !exclude.contains(&c.candidate_name))
        .collect();
    eligible.sort_by(|a, b| {
        b.total_votes
            .cmp(&a.total_votes)
            .then_with(|| a.candidate_name.cmp(&b.candidate_name))
    });
    eligible
        .into_iter()
        .take(limit)
        .map(|c| c.candidate_name.clone())
        .collect()
}

/// `cast / max_supply >= percent / 100`, exact over the whole `u128` range.
///
/// The threshold `ceil(max_supply * percent / 100)` is built from the
/// quotient and remainder of `max_supply / 100`, so nothing is multiplied
/// past `max_supply`. A threshold above `u128::MAX` can never be met.
pub fn quorum_met(cast: u128, max_supply: u128, percent: u8) -> bool {
    if max_supply == 0 {
        return false;
    }
    let percent = u128::from(percent);
    let (whole, rem) = (max_supply / 100, max_supply % 100);
    let threshold = whole
        .checked_mul(percent)
        .and_then(|t| t.checked_add((rem * percent).div_ceil(100)));
    match threshold {
        Some(threshold) => cast >= threshold,
        None => false,
    }
}

/// The policy the managed account should carry for `roster`, or `None` for
/// an empty roster.
pub fn derive_policy(config: &AuditorConfig, roster: &[AccountName]) -> Option<AuthorityPolicy> {
    if roster.is_empty() {
        return None;
    }
    let mut members: Vec<&AccountName> = roster.iter().collect();
    members.sort();
    members.dedup();
    let threshold = u32::from(config.auth_threshold_auditors).min(members.len() as u32);
    Some(AuthorityPolicy {
        account: config.authaccount.clone(),
        permission: AUDITORS_PERMISSION.to_owned(),
        parent: ACTIVE_PERMISSION.to_owned(),
        threshold,
        accounts: members
            .into_iter()
            .map(|actor| PermissionLevelWeight {
                actor: actor.clone(),
                permission: ACTIVE_PERMISSION.to_owned(),
                weight: 1,
            })
            .collect(),
    })
}

fn stage_policy<S: ElectionStore + ?Sized>(
    config: &AuditorConfig,
    staging: &mut Staging<'_, S>,
    roster: &[AccountName],
) {
    match derive_policy(config, roster) {
        Some(policy) => staging.set_policy(policy),
        None => tracing::warn!(
            account = %config.authaccount,
            "auditor roster is empty; authorization policy left unchanged"
        ),
    }
}

/// Set a departing auditor inactive and lock its stake for the release delay.
fn retire<S: ElectionStore + ?Sized>(
    config: &AuditorConfig,
    staging: &mut Staging<'_, S>,
    auditor: &AccountName,
    now: Timestamp,
) -> Result<(), AuditorError> {
    let mut candidate = staging.require_candidate(auditor)?;
    let mut state = staging.state()?;
    deactivate(&mut candidate, &mut state);
    candidate.lock_for_tenure(now.plus_secs(config.lockup_release_time_delay));
    staging.put_candidate(candidate);
    staging.put_state(state);
    Ok(())
}

/// Remove `auditor` from the roster mid-tenure and fill the open seats from
/// the ranking. Used by both resignation and forced removal.
///
/// Returns the members seated as replacements.
pub(crate) fn vacate_seat<S: ElectionStore + ?Sized>(
    config: &AuditorConfig,
    staging: &mut Staging<'_, S>,
    auditor: &AccountName,
    now: Timestamp,
) -> Result<Vec<AccountName>, AuditorError> {
    let mut roster = staging.auditors()?;
    if !roster.contains(auditor) {
        return Err(AuditorError::NotAnAuditor(auditor.clone()));
    }
    roster.retain(|a| a != auditor);
    retire(config, staging, auditor, now)?;

    let open = usize::from(config.numelected).saturating_sub(roster.len());
    let seated: BTreeSet<AccountName> = roster.iter().cloned().collect();
    let replacements = rank(&staging.candidates()?, &seated, open);
    roster.extend(replacements.iter().cloned());

    stage_policy(config, staging, &roster);
    staging.replace_auditors(roster);
    Ok(replacements)
}

/// Run a full rotation.
///
/// `advisory` and `message` come from the caller and are only logged; the
/// committee is always the ranking over stored vote weights.
pub(crate) fn new_tenure<S, L>(
    config: &AuditorConfig,
    staging: &mut Staging<'_, S>,
    ledger: &L,
    now: Timestamp,
    advisory: &[AccountName],
    message: &str,
) -> Result<Rotation, AuditorError>
where
    S: ElectionStore + ?Sized,
    L: TokenLedger + ?Sized,
{
    let mut state = staging.state()?;

    if let Some(last) = state.last_tenure {
        if !last.has_expired(config.period_length, now) {
            return Err(AuditorError::PeriodNotElapsed {
                last,
                next: last.plus_secs(config.period_length),
            });
        }
    }

    let required_percent = if state.met_initial_votes_threshold {
        config.vote_quorum_percent
    } else {
        config.initial_vote_quorum_percent
    };
    let max_supply = ledger.max_supply(config.lockupasset.symbol())?.amount();
    if !quorum_met(state.total_weight_of_votes, max_supply, required_percent) {
        return Err(AuditorError::QuorumNotMet {
            cast: state.total_weight_of_votes,
            max_supply,
            required_percent,
        });
    }

    let elected = rank(
        &staging.candidates()?,
        &BTreeSet::new(),
        usize::from(config.numelected),
    );
    if elected.is_empty() {
        return Err(AuditorError::NoElectableCandidates);
    }

    let previous = staging.auditors()?;
    let displaced: Vec<AccountName> = previous
        .into_iter()
        .filter(|a| !elected.contains(a))
        .collect();
    for auditor in &displaced {
        retire(config, staging, auditor, now)?;
    }

    if !config.auditor_pay.is_zero() {
        for member in &elected {
            if *member == config.pay_account {
                continue;
            }
            staging.push_transfer(Transfer {
                from: config.pay_account.clone(),
                to: member.clone(),
                quantity: config.auditor_pay.clone(),
                memo: PAY_MEMO.to_owned(),
            });
        }
    }

    stage_policy(config, staging, &elected);
    staging.replace_auditors(elected.clone());

    // Retirements above may have moved the counter.
    state = staging.state()?;
    state.last_tenure = Some(now);
    state.met_initial_votes_threshold = true;
    staging.put_state(state);

    tracing::info!(
        elected = ?elected,
        displaced = ?displaced,
        advisory = ?advisory,
        note = message,
        "new tenure"
    );
    Ok(Rotation { elected, displaced })
}

#[cfg(test)]
mod tests {
    use super::*;
    use auditor_host::Transfer;
    use auditor_nullables::{NullLedger, NullStore};
    use auditor_store::{ElectionState, WriteSet};
    use auditor_types::Asset;

    fn name(s: &str) -> AccountName {
        AccountName::new(s).unwrap()
    }

    fn candidate(who: &str, votes: u128, active: bool) -> Candidate {
        let mut c = Candidate::from_deposit(
            name(who),
            "10000.0000 BOS".parse().unwrap(),
            Timestamp::new(0),
        );
        c.total_votes = votes;
        c.is_active = active;
        c
    }

    fn seeded(candidates: Vec<Candidate>, cast: u128, roster: &[&str]) -> NullStore {
        let store = NullStore::new();
        let mut writes = WriteSet::new();
        let active = candidates.iter().filter(|c| c.is_active).count() as u32;
        for c in candidates {
            writes.put_candidate(c);
        }
        writes.replace_auditors(roster.iter().map(|a| name(a)).collect());
        writes.put_state(ElectionState {
            total_weight_of_votes: cast,
            number_active_candidates: active,
            ..ElectionState::default()
        });
        store.commit(writes).unwrap();
        store
    }

    fn ledger_with_supply(raw: u128) -> NullLedger {
        let ledger = NullLedger::new();
        let supply = Asset::new(raw, AuditorConfig::default().lockupasset.symbol().clone());
        ledger.set_max_supply(&supply);
        ledger
    }

    #[test]
    fn ranking_breaks_ties_by_name() {
        let candidates = vec![
            candidate("carol", 5, true),
            candidate("alice", 5, true),
            candidate("bob", 9, true),
            candidate("dave", 0, true),
            candidate("erin", 50, false),
        ];
        let ranked = rank(&candidates, &BTreeSet::new(), 10);
        assert_eq!(ranked, vec![name("bob"), name("alice"), name("carol")]);
    }

    #[test]
    fn quorum_comparison_is_exact() {
        assert!(quorum_met(15, 100, 15));
        assert!(!quorum_met(14, 100, 15));
        assert!(quorum_met(0, 100, 0));
        assert!(!quorum_met(1_000, 0, 0));
        assert!(quorum_met(u128::MAX, u128::MAX, 100));
    }

    #[test]
    fn quorum_near_u128_max_uses_the_real_ratio() {
        // 4% participation against a 100% requirement.
        assert!(!quorum_met(u128::MAX / 50, u128::MAX / 2, 100));
        assert!(!quorum_met(u128::MAX / 2, u128::MAX, 100));
        // Half of an odd supply rounds the threshold up.
        assert!(!quorum_met(u128::MAX / 2, u128::MAX, 50));
        assert!(quorum_met(u128::MAX / 2 + 1, u128::MAX, 50));
        // A threshold past u128::MAX is unreachable.
        assert!(!quorum_met(u128::MAX, u128::MAX, 101));
    }

    #[test]
    fn policy_threshold_is_capped_by_roster() {
        let config = AuditorConfig::default();
        let policy = derive_policy(&config, &[name("bob"), name("alice")]).unwrap();
        assert_eq!(policy.threshold, 2);
        assert_eq!(policy.account, config.authaccount);
        assert_eq!(policy.permission, AUDITORS_PERMISSION);
        assert_eq!(policy.parent, ACTIVE_PERMISSION);
        let actors: Vec<_> = policy.accounts.iter().map(|a| a.actor.clone()).collect();
        assert_eq!(actors, vec![name("alice"), name("bob")]);
        assert!(derive_policy(&config, &[]).is_none());
    }

    #[test]
    fn rotation_elects_ranked_subset_and_pays() {
        let mut config = AuditorConfig::default();
        config.numelected = 3;
        config.auth_threshold_auditors = 2;
        config.auditor_pay = "5.0000 BOS".parse().unwrap();
        config.pay_account = name("pay.bos");
        let store = seeded(
            vec![
                candidate("alice", 300, true),
                candidate("bob", 200, true),
                candidate("carol", 0, true),
            ],
            500,
            &[],
        );
        let ledger = ledger_with_supply(1_000);
        let mut staging = Staging::new(&store);

        let rotation = new_tenure(
            &config,
            &mut staging,
            &ledger,
            Timestamp::new(10),
            &[name("carol")],
            "hello",
        )
        .unwrap();
        assert_eq!(rotation.elected, vec![name("alice"), name("bob")]);
        assert!(rotation.displaced.is_empty());
        assert_eq!(staging.auditors().unwrap(), vec![name("alice"), name("bob")]);

        let state = staging.state().unwrap();
        assert_eq!(state.last_tenure, Some(Timestamp::new(10)));
        assert!(state.met_initial_votes_threshold);

        let plan = staging.into_plan();
        let payees: Vec<_> = plan.transfers.iter().map(|t: &Transfer| t.to.clone()).collect();
        assert_eq!(payees, vec![name("alice"), name("bob")]);
        assert_eq!(plan.policy.unwrap().threshold, 2);
    }

    #[test]
    fn displaced_auditors_are_locked() {
        let config = AuditorConfig::default();
        let store = seeded(
            vec![candidate("alice", 300, true), candidate("zed", 0, true)],
            300,
            &["zed"],
        );
        let ledger = ledger_with_supply(1_000);
        let mut staging = Staging::new(&store);
        let now = Timestamp::new(77);

        let rotation = new_tenure(&config, &mut staging, &ledger, now, &[], "").unwrap();
        assert_eq!(rotation.displaced, vec![name("zed")]);
        let zed = staging.require_candidate(&name("zed")).unwrap();
        assert!(!zed.is_active);
        assert_eq!(
            zed.unstaking_end_time,
            now.plus_secs(config.lockup_release_time_delay)
        );
        assert_eq!(staging.state().unwrap().number_active_candidates, 1);
    }

    #[test]
    fn rotation_gates() {
        let config = AuditorConfig::default();
        let store = seeded(vec![candidate("alice", 100, true)], 100, &[]);
        // Initial quorum is 15%; 100 / 1000 = 10%.
        let ledger = ledger_with_supply(1_000);
        let mut staging = Staging::new(&store);
        let err = new_tenure(&config, &mut staging, &ledger, Timestamp::new(0), &[], "")
            .unwrap_err();
        assert!(matches!(err, AuditorError::QuorumNotMet { required_percent: 15, .. }));

        let ledger = ledger_with_supply(500);
        new_tenure(&config, &mut staging, &ledger, Timestamp::new(0), &[], "").unwrap();
        let err = new_tenure(&config, &mut staging, &ledger, Timestamp::new(1), &[], "")
            .unwrap_err();
        assert!(matches!(err, AuditorError::PeriodNotElapsed { .. }));
    }

    #[test]
    fn rotation_without_votes_elects_nobody() {
        let config = AuditorConfig::default();
        let store = seeded(vec![candidate("alice", 0, true)], 0, &[]);
        let ledger = ledger_with_supply(1_000);
        let mut config = config;
        config.initial_vote_quorum_percent = 0;
        let mut staging = Staging::new(&store);
        let err = new_tenure(&config, &mut staging, &ledger, Timestamp::new(0), &[], "")
            .unwrap_err();
        assert!(matches!(err, AuditorError::NoElectableCandidates));
    }

    #[test]
    fn vacated_seat_is_refilled_from_ranking() {
        let mut config = AuditorConfig::default();
        config.numelected = 2;
        config.auth_threshold_auditors = 2;
        let store = seeded(
            vec![
                candidate("alice", 300, true),
                candidate("bob", 200, true),
                candidate("carol", 100, true),
            ],
            600,
            &["alice", "bob"],
        );
        let mut staging = Staging::new(&store);
        let now = Timestamp::new(5);

        let seated = vacate_seat(&config, &mut staging, &name("alice"), now).unwrap();
        assert_eq!(seated, vec![name("carol")]);
        assert_eq!(staging.auditors().unwrap(), vec![name("bob"), name("carol")]);
        let alice = staging.require_candidate(&name("alice")).unwrap();
        assert!(!alice.is_active);
        assert!(alice.is_locked(now));

        let err = vacate_seat(&config, &mut staging, &name("alice"), now).unwrap_err();
        assert!(matches!(err, AuditorError::NotAnAuditor(_)));
    }
}
