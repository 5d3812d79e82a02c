//! Contract configuration — the process-wide singleton read by every operation.
//!
//! The contract never mutates its configuration; it is loaded from TOML (or
//! built programmatically in tests) and handed to the contract by reference.

use crate::{AccountName, Asset, TypesError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// All configuration values consumed by the election contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditorConfig {
    // ── Accounts ─────────────────────────────────────────────────────────
    /// The account this contract runs as; credits to it become stake.
    #[serde(default = "default_contract_account")]
    pub contract_account: AccountName,

    /// The token contract whose transfers are observed.
    #[serde(default = "default_token_contract")]
    pub token_contract: AccountName,

    /// Managed account whose `auditors` permission is rederived on each tenure.
    #[serde(default = "default_authaccount")]
    pub authaccount: AccountName,

    // ── Candidacy ────────────────────────────────────────────────────────
    /// Bond each candidate must have locked before nominating.
    #[serde(default = "default_lockupasset")]
    pub lockupasset: Asset,

    /// Seconds before released stake can be withdrawn with `unstake`.
    #[serde(default = "default_lockup_release_time_delay")]
    pub lockup_release_time_delay: u64,

    // ── Voting ───────────────────────────────────────────────────────────
    /// Maximum number of candidates a single voter may vote for.
    #[serde(default = "default_maxvotes")]
    pub maxvotes: u8,

    // ── Tenure ───────────────────────────────────────────────────────────
    /// Number of auditors elected per tenure.
    #[serde(default = "default_numelected")]
    pub numelected: u8,

    /// Number of auditor signatures required on the managed account.
    #[serde(default = "default_auth_threshold_auditors")]
    pub auth_threshold_auditors: u8,

    /// Minimum seconds between two successful tenure rotations.
    #[serde(default = "default_period_length")]
    pub period_length: u64,

    /// Participation (percent of max supply) required for the first tenure.
    #[serde(default = "default_initial_vote_quorum_percent")]
    pub initial_vote_quorum_percent: u8,

    /// Participation (percent of max supply) required for later tenures.
    #[serde(default = "default_vote_quorum_percent")]
    pub vote_quorum_percent: u8,

    // ── Pay ──────────────────────────────────────────────────────────────
    /// Flat pay credited to every elected auditor on each tenure.
    #[serde(default = "default_auditor_pay")]
    pub auditor_pay: Asset,

    /// Account the tenure pay is drawn from.
    #[serde(default = "default_authaccount")]
    pub pay_account: AccountName,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn account(name: &str) -> AccountName {
    AccountName::new(name).expect("static account name is valid")
}

fn asset(s: &str) -> Asset {
    s.parse().expect("static asset literal is valid")
}

fn default_contract_account() -> AccountName {
    account("auditor.bos")
}

fn default_token_contract() -> AccountName {
    account("eosio.token")
}

fn default_authaccount() -> AccountName {
    account("bos.auditors")
}

fn default_lockupasset() -> Asset {
    asset("10000.0000 BOS")
}

fn default_lockup_release_time_delay() -> u64 {
    // 90 days
    7_776_000
}

fn default_maxvotes() -> u8 {
    3
}

fn default_numelected() -> u8 {
    5
}

fn default_auth_threshold_auditors() -> u8 {
    3
}

fn default_period_length() -> u64 {
    // 7 days
    604_800
}

fn default_initial_vote_quorum_percent() -> u8 {
    15
}

fn default_vote_quorum_percent() -> u8 {
    10
}

fn default_auditor_pay() -> Asset {
    asset("0.0000 BOS")
}

// ── Impl ───────────────────────────────────────────────────────────────

impl AuditorConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, TypesError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| TypesError::InvalidConfig(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, TypesError> {
        let config: Self =
            toml::from_str(s).map_err(|e| TypesError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, TypesError> {
        toml::to_string_pretty(self).map_err(|e| TypesError::InvalidConfig(e.to_string()))
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), TypesError> {
        let invalid = |msg: String| Err(TypesError::InvalidConfig(msg));
        if self.numelected == 0 {
            return invalid("numelected must be at least 1".into());
        }
        if self.maxvotes == 0 {
            return invalid("maxvotes must be at least 1".into());
        }
        if self.auth_threshold_auditors == 0 || self.auth_threshold_auditors > self.numelected {
            return invalid(format!(
                "auth_threshold_auditors must be within 1..={}, got {}",
                self.numelected, self.auth_threshold_auditors
            ));
        }
        if self.initial_vote_quorum_percent > 100 || self.vote_quorum_percent > 100 {
            return invalid("quorum percentages must not exceed 100".into());
        }
        self.lockupasset.ensure_same_symbol(&self.auditor_pay)?;
        if !self.auditor_pay.is_zero() && self.pay_account == self.contract_account {
            return invalid("pay_account must not be the contract's custody account".into());
        }
        Ok(())
    }
}

impl Default for AuditorConfig {
    fn default() -> Self {
        Self {
            contract_account: default_contract_account(),
            token_contract: default_token_contract(),
            authaccount: default_authaccount(),
            lockupasset: default_lockupasset(),
            lockup_release_time_delay: default_lockup_release_time_delay(),
            maxvotes: default_maxvotes(),
            numelected: default_numelected(),
            auth_threshold_auditors: default_auth_threshold_auditors(),
            period_length: default_period_length(),
            initial_vote_quorum_percent: default_initial_vote_quorum_percent(),
            vote_quorum_percent: default_vote_quorum_percent(),
            auditor_pay: default_auditor_pay(),
            pay_account: default_authaccount(),
        }
    }
}
