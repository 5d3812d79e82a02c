//! The closed set of operations the contract accepts.

use auditor_host::Transfer;
use auditor_types::{AccountName, Timestamp};
use serde::{Deserialize, Serialize};

/// Who is invoking an operation, and when.
///
/// `caller` is the account whose authority the host has already verified
/// for this invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionContext {
    pub caller: AccountName,
    pub now: Timestamp,
}

impl ExecutionContext {
    pub fn new(caller: AccountName, now: Timestamp) -> Self {
        Self { caller, now }
    }
}

/// Every caller-facing operation, plus the inbound credit notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Operation {
    /// A completed token transfer reported by the token contract.
    #[serde(rename = "transfer")]
    Transfer(Transfer),

    #[serde(rename = "nominatecand")]
    Nominate { cand: AccountName },

    #[serde(rename = "withdrawcand")]
    Withdraw { cand: AccountName },

    #[serde(rename = "firecand")]
    FireCandidate {
        cand: AccountName,
        #[serde(default)]
        lockup_stake: bool,
    },

    #[serde(rename = "resign")]
    Resign { auditor: AccountName },

    #[serde(rename = "fireauditor")]
    FireAuditor { auditor: AccountName },

    #[serde(rename = "updatebio")]
    UpdateBio { cand: AccountName, bio: String },

    #[serde(rename = "voteauditor")]
    Vote {
        voter: AccountName,
        #[serde(default)]
        candidates: Vec<AccountName>,
    },

    #[serde(rename = "refreshvote")]
    RefreshVoteWeight { voter: AccountName },

    /// Rotate the committee. `candidates` and `message` are advisory and
    /// only logged; the selection is derived from stored vote weights.
    #[serde(rename = "newtenure")]
    NewTenure {
        #[serde(default)]
        candidates: Vec<AccountName>,
        #[serde(default)]
        message: String,
    },

    #[serde(rename = "unstake")]
    Unstake { cand: AccountName },
}

impl Operation {
    /// The action name, as used in logs and receipts.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Transfer(_) => "transfer",
            Self::Nominate { .. } => "nominatecand",
            Self::Withdraw { .. } => "withdrawcand",
            Self::FireCandidate { .. } => "firecand",
            Self::Resign { .. } => "resign",
            Self::FireAuditor { .. } => "fireauditor",
            Self::UpdateBio { .. } => "updatebio",
            Self::Vote { .. } => "voteauditor",
            Self::RefreshVoteWeight { .. } => "refreshvote",
            Self::NewTenure { .. } => "newtenure",
            Self::Unstake { .. } => "unstake",
        }
    }
}
