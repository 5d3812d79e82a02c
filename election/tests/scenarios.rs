//! End-to-end election flows against the in-memory store and collaborators.
//!
//! Credits are made the way the host makes them: the ledger moves the tokens
//! first, then the token contract notifies the election contract.

use auditor_election::{AuditorContract, AuditorError, ErrorKind, ExecutionContext, Operation, Receipt};
use auditor_host::{TokenLedger, Transfer};
use auditor_nullables::{NullAuthority, NullClock, NullLedger, NullStore};
use auditor_store::{AuditorStore, CandidateStore, StateStore, VoteStore};
use auditor_types::{AccountName, Asset, AuditorConfig, Symbol};

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

fn name(s: &str) -> AccountName {
    AccountName::new(s).unwrap()
}

fn bos(s: &str) -> Asset {
    format!("{s} BOS").parse().unwrap()
}

struct Harness {
    config: AuditorConfig,
    store: NullStore,
    ledger: NullLedger,
    authority: NullAuthority,
    clock: NullClock,
}

impl Harness {
    fn new(config: AuditorConfig) -> Self {
        let ledger = NullLedger::new();
        ledger.set_max_supply(&bos("1000000.0000"));
        Self {
            config,
            store: NullStore::new(),
            ledger,
            authority: NullAuthority::new(),
            clock: NullClock::new(1_000),
        }
    }

    fn symbol(&self) -> Symbol {
        self.config.lockupasset.symbol().clone()
    }

    fn exec(&self, caller: &str, op: Operation) -> Result<Receipt, AuditorError> {
        let contract =
            AuditorContract::new(&self.config, &self.store, &self.ledger, &self.authority);
        contract.execute(&ExecutionContext::new(name(caller), self.clock.now()), &op)
    }

    fn fund(&self, who: &str, amount: &str) {
        self.ledger.set_balance(&name(who), &bos(amount));
    }

    /// Move `amount` from `who` into the contract and report the credit.
    fn stake(&self, who: &str, amount: &str) {
        let transfer = Transfer {
            from: name(who),
            to: self.config.contract_account.clone(),
            quantity: bos(amount),
            memo: "stake".into(),
        };
        self.ledger.transfer_batch(&[transfer.clone()]).unwrap();
        let token = self.config.token_contract.to_string();
        self.exec(&token, Operation::Transfer(transfer)).unwrap();
    }

    /// Fund, stake the bond, and nominate.
    fn enrol(&self, who: &str) {
        let bond = self.config.lockupasset.to_string();
        let amount = bond.trim_end_matches(" BOS");
        self.fund(who, amount);
        self.stake(who, amount);
        self.exec(who, Operation::Nominate { cand: name(who) }).unwrap();
    }

    fn vote(&self, voter: &str, candidates: &[&str]) -> Result<Receipt, AuditorError> {
        self.exec(
            voter,
            Operation::Vote {
                voter: name(voter),
                candidates: candidates.iter().map(|c| name(c)).collect(),
            },
        )
    }

    fn new_tenure(&self, advisory: &[&str]) -> Result<Receipt, AuditorError> {
        self.exec(
            "anyone",
            Operation::NewTenure {
                candidates: advisory.iter().map(|c| name(c)).collect(),
                message: "rotation".into(),
            },
        )
    }

    fn votes_for(&self, who: &str) -> u128 {
        self.store.get_candidate(&name(who)).unwrap().unwrap().total_votes
    }

    fn locked_sum(&self) -> u128 {
        self.store
            .iter_candidates()
            .unwrap()
            .iter()
            .map(|c| c.locked_tokens.amount())
            .sum()
    }

    fn custodied(&self) -> u128 {
        self.ledger
            .raw_balance(&self.config.contract_account, &self.symbol())
    }
}

fn small_committee() -> AuditorConfig {
    AuditorConfig {
        numelected: 3,
        auth_threshold_auditors: 2,
        ..AuditorConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn scenario_a_stake_nominate_withdraw_unstake() {
    let h = Harness::new(AuditorConfig::default());
    h.enrol("alice");
    let alice = h.store.get_candidate(&name("alice")).unwrap().unwrap();
    assert!(alice.is_active);
    assert_eq!(alice.locked_tokens, h.config.lockupasset);

    h.clock.advance(10);
    h.exec("alice", Operation::Withdraw { cand: name("alice") })
        .unwrap();
    let alice = h.store.get_candidate(&name("alice")).unwrap().unwrap();
    assert!(!alice.is_active);
    assert_eq!(alice.unstaking_end_time, h.clock.now());

    h.exec("alice", Operation::Unstake { cand: name("alice") })
        .unwrap();
    let alice = h.store.get_candidate(&name("alice")).unwrap().unwrap();
    assert!(alice.locked_tokens.is_zero());
    assert_eq!(
        h.ledger.raw_balance(&name("alice"), &h.symbol()),
        h.config.lockupasset.amount()
    );
    assert_eq!(h.custodied(), 0);
}

#[test]
fn scenario_b_vote_changes_move_weight() {
    let h = Harness::new(AuditorConfig::default());
    h.enrol("alice");
    h.enrol("bob");
    for v in ["v1", "v2", "v3"] {
        h.fund(v, "0.0100");
        h.vote(v, &["alice"]).unwrap();
    }
    assert_eq!(h.votes_for("alice"), 300);

    h.vote("v2", &["bob"]).unwrap();
    assert_eq!(h.votes_for("alice"), 200);
    assert_eq!(h.votes_for("bob"), 100);
}

#[test]
fn scenario_c_short_committee_is_not_padded() {
    let mut config = small_committee();
    config.initial_vote_quorum_percent = 0;
    let h = Harness::new(config);
    h.enrol("alice");
    h.enrol("bob");
    h.enrol("carol");
    h.fund("voter", "5.0000");
    h.vote("voter", &["alice", "bob"]).unwrap();

    let receipt = h.new_tenure(&[]).unwrap();
    assert_eq!(receipt.auditors, vec![name("alice"), name("bob")]);
    assert_eq!(h.store.auditors().unwrap(), vec![name("alice"), name("bob")]);
    let policy = h.authority.last_policy().unwrap();
    assert_eq!(policy.threshold, 2);
    assert_eq!(policy.accounts.len(), 2);
}

#[test]
fn scenario_d_second_rotation_within_period_fails() {
    let mut config = small_committee();
    config.initial_vote_quorum_percent = 0;
    config.vote_quorum_percent = 0;
    let h = Harness::new(config);
    h.enrol("alice");
    h.fund("voter", "1.0000");
    h.vote("voter", &["alice"]).unwrap();
    h.new_tenure(&[]).unwrap();

    let state_before = h.store.election_state().unwrap();
    h.clock.advance(h.config.period_length - 1);
    let err = h.new_tenure(&[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PeriodNotElapsed);
    assert_eq!(h.store.election_state().unwrap(), state_before);
    assert_eq!(h.authority.applied().len(), 1);

    h.clock.advance(1);
    h.new_tenure(&[]).unwrap();
}

#[test]
fn scenario_e_fireauditor_on_non_auditor_fails() {
    let h = Harness::new(small_committee());
    h.enrol("alice");
    let boss = name("boss");
    h.authority.grant_elevated(&boss);

    let err = h
        .exec("boss", Operation::FireAuditor { auditor: name("alice") })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert!(h.store.auditors().unwrap().is_empty());
    assert!(h.store.get_candidate(&name("alice")).unwrap().unwrap().is_active);
}

// ---------------------------------------------------------------------------
// Gates and rotation behaviour
// ---------------------------------------------------------------------------

#[test]
fn quorum_is_checked_fresh_each_call() {
    let h = Harness::new(small_committee());
    h.enrol("alice");
    // 15% of 1_000_000.0000 is 150_000.0000.
    h.fund("whale", "149999.9999");
    h.vote("whale", &["alice"]).unwrap();
    let err = h.new_tenure(&[]).unwrap_err();
    assert!(matches!(err, AuditorError::QuorumNotMet { required_percent: 15, .. }));

    h.fund("whale", "150000.0000");
    h.exec("anyone", Operation::RefreshVoteWeight { voter: name("whale") })
        .unwrap();
    h.new_tenure(&[]).unwrap();

    // Steady-state quorum (10%) applies from now on.
    h.fund("whale", "99999.0000");
    h.exec("anyone", Operation::RefreshVoteWeight { voter: name("whale") })
        .unwrap();
    h.clock.advance(h.config.period_length);
    let err = h.new_tenure(&[]).unwrap_err();
    assert!(matches!(err, AuditorError::QuorumNotMet { required_percent: 10, .. }));
}

#[test]
fn advisory_list_does_not_influence_selection() {
    let mut config = small_committee();
    config.numelected = 1;
    config.auth_threshold_auditors = 1;
    config.initial_vote_quorum_percent = 0;
    let h = Harness::new(config);
    h.enrol("alice");
    h.enrol("bob");
    h.fund("v1", "2.0000");
    h.fund("v2", "2.0000");
    h.vote("v1", &["bob"]).unwrap();
    h.vote("v2", &["alice"]).unwrap();

    // Tied on weight: ascending name wins, whatever the caller proposes.
    let receipt = h.new_tenure(&["bob"]).unwrap();
    assert_eq!(receipt.auditors, vec![name("alice")]);
}

#[test]
fn displaced_auditor_is_locked_then_released() {
    let mut config = small_committee();
    config.numelected = 1;
    config.auth_threshold_auditors = 1;
    config.initial_vote_quorum_percent = 0;
    config.vote_quorum_percent = 0;
    let h = Harness::new(config);
    h.enrol("alice");
    h.enrol("bob");
    h.fund("v1", "1.0000");
    h.fund("v2", "3.0000");
    h.vote("v1", &["alice"]).unwrap();
    h.new_tenure(&[]).unwrap();
    assert_eq!(h.store.auditors().unwrap(), vec![name("alice")]);

    h.vote("v2", &["bob"]).unwrap();
    h.clock.advance(h.config.period_length);
    h.new_tenure(&[]).unwrap();
    assert_eq!(h.store.auditors().unwrap(), vec![name("bob")]);

    let alice = h.store.get_candidate(&name("alice")).unwrap().unwrap();
    assert!(!alice.is_active);
    let release_at = h.clock.now().plus_secs(h.config.lockup_release_time_delay);
    assert_eq!(alice.unstaking_end_time, release_at);

    h.clock.advance(h.config.lockup_release_time_delay - 1);
    let err = h
        .exec("alice", Operation::Unstake { cand: name("alice") })
        .unwrap_err();
    assert!(matches!(err, AuditorError::StakeLocked { .. }));

    h.clock.advance_to(release_at);
    h.exec("alice", Operation::Unstake { cand: name("alice") })
        .unwrap();
    assert!(h
        .store
        .get_candidate(&name("alice"))
        .unwrap()
        .unwrap()
        .locked_tokens
        .is_zero());
}

#[test]
fn resignation_refills_the_seat() {
    let mut config = small_committee();
    config.numelected = 2;
    config.initial_vote_quorum_percent = 0;
    let h = Harness::new(config);
    for c in ["alice", "bob", "carol"] {
        h.enrol(c);
    }
    h.fund("v1", "3.0000");
    h.fund("v2", "2.0000");
    h.fund("v3", "1.0000");
    h.vote("v1", &["alice"]).unwrap();
    h.vote("v2", &["bob"]).unwrap();
    h.vote("v3", &["carol"]).unwrap();
    h.new_tenure(&[]).unwrap();
    assert_eq!(h.store.auditors().unwrap(), vec![name("alice"), name("bob")]);

    let err = h
        .exec("bob", Operation::Resign { auditor: name("alice") })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthorizationDenied);

    let receipt = h
        .exec("alice", Operation::Resign { auditor: name("alice") })
        .unwrap();
    assert_eq!(receipt.auditors, vec![name("bob"), name("carol")]);
    let policy = h.authority.last_policy().unwrap();
    let actors: Vec<_> = policy.accounts.iter().map(|a| a.actor.clone()).collect();
    assert_eq!(actors, vec![name("bob"), name("carol")]);

    let alice = h.store.get_candidate(&name("alice")).unwrap().unwrap();
    assert!(!alice.is_active);
    assert!(alice.is_locked(h.clock.now()));
    assert_eq!(h.store.election_state().unwrap().number_active_candidates, 2);
}

#[test]
fn fired_auditor_is_locked_and_replaced() {
    let mut config = small_committee();
    config.numelected = 2;
    config.initial_vote_quorum_percent = 0;
    let h = Harness::new(config);
    for c in ["alice", "bob", "carol"] {
        h.enrol(c);
    }
    h.fund("v1", "3.0000");
    h.fund("v2", "2.0000");
    h.fund("v3", "1.0000");
    h.vote("v1", &["alice"]).unwrap();
    h.vote("v2", &["bob"]).unwrap();
    h.vote("v3", &["carol"]).unwrap();
    h.new_tenure(&[]).unwrap();
    assert_eq!(h.store.auditors().unwrap(), vec![name("alice"), name("bob")]);
    h.authority.grant_elevated(&name("boss"));

    h.clock.advance(60);
    let receipt = h
        .exec("boss", Operation::FireAuditor { auditor: name("alice") })
        .unwrap();
    assert_eq!(receipt.auditors, vec![name("bob"), name("carol")]);
    assert_eq!(h.store.auditors().unwrap(), vec![name("bob"), name("carol")]);
    assert_eq!(h.authority.applied().len(), 2);
    let policy = h.authority.last_policy().unwrap();
    let actors: Vec<_> = policy.accounts.iter().map(|a| a.actor.clone()).collect();
    assert_eq!(actors, vec![name("bob"), name("carol")]);
    assert_eq!(policy.threshold, 2);

    let alice = h.store.get_candidate(&name("alice")).unwrap().unwrap();
    assert!(!alice.is_active);
    let release_at = h.clock.now().plus_secs(h.config.lockup_release_time_delay);
    assert_eq!(alice.unstaking_end_time, release_at);
    assert_eq!(h.store.election_state().unwrap().number_active_candidates, 2);

    let err = h
        .exec("alice", Operation::Unstake { cand: name("alice") })
        .unwrap_err();
    assert!(matches!(err, AuditorError::StakeLocked { .. }));
}

#[test]
fn unfunded_pay_aborts_the_whole_rotation() {
    let mut config = small_committee();
    config.initial_vote_quorum_percent = 0;
    config.auditor_pay = bos("50.0000");
    config.pay_account = name("pay.bos");
    let h = Harness::new(config);
    h.enrol("alice");
    h.enrol("bob");
    h.fund("voter", "1.0000");
    h.vote("voter", &["alice", "bob"]).unwrap();
    h.fund("pay.bos", "99.9999");

    let err = h.new_tenure(&[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
    assert!(h.store.auditors().unwrap().is_empty());
    assert!(h.store.election_state().unwrap().last_tenure.is_none());
    assert!(h.authority.applied().is_empty());

    h.fund("pay.bos", "100.0000");
    let receipt = h.new_tenure(&[]).unwrap();
    assert_eq!(receipt.transfers.len(), 2);
    assert_eq!(h.ledger.raw_balance(&name("pay.bos"), &h.symbol()), 0);
    assert_eq!(h.ledger.raw_balance(&name("alice"), &h.symbol()), 500_000);
}

#[test]
fn retracted_vote_is_deleted() {
    let h = Harness::new(AuditorConfig::default());
    h.enrol("alice");
    h.fund("voter", "1.0000");
    h.vote("voter", &["alice"]).unwrap();
    assert!(h.store.get_vote(&name("voter")).unwrap().is_some());

    h.vote("voter", &[]).unwrap();
    assert!(h.store.get_vote(&name("voter")).unwrap().is_none());
    assert_eq!(h.votes_for("alice"), 0);
    assert_eq!(h.store.election_state().unwrap().total_weight_of_votes, 0);
}

#[test]
fn staking_voter_loses_the_staked_weight() {
    let h = Harness::new(AuditorConfig::default());
    h.enrol("alice");
    h.fund("bob", "3.0000");
    h.vote("bob", &["alice"]).unwrap();
    assert_eq!(h.votes_for("alice"), 30_000);

    h.stake("bob", "1.0000");
    assert_eq!(h.votes_for("alice"), 20_000);
    assert_eq!(h.store.get_vote(&name("bob")).unwrap().unwrap().weight, 20_000);
    assert_eq!(h.store.election_state().unwrap().total_weight_of_votes, 20_000);
}

#[test]
fn custody_matches_locked_stake() {
    let h = Harness::new(AuditorConfig::default());
    h.enrol("alice");
    h.fund("bob", "5.0000");
    h.stake("bob", "2.5000");
    h.stake("bob", "2.5000");
    assert_eq!(h.locked_sum(), h.custodied());

    h.exec("alice", Operation::Withdraw { cand: name("alice") })
        .unwrap();
    h.exec("alice", Operation::Unstake { cand: name("alice") })
        .unwrap();
    assert_eq!(h.locked_sum(), h.custodied());
}
