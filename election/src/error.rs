//! Election errors.
//!
//! Every rejection has its own variant; [`AuditorError::kind`] folds them into
//! the coarse categories callers branch on.

use auditor_host::{AuthorityError, LedgerError};
use auditor_store::StoreError;
use auditor_types::{AccountName, Asset, Timestamp, TypesError};
use thiserror::Error;

/// Coarse classification of an [`AuditorError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    AuthorizationDenied,
    InvalidState,
    ConstraintViolation,
    QuorumNotMet,
    PeriodNotElapsed,
    InsufficientFunds,
    Storage,
    Collaborator,
}

#[derive(Debug, Error)]
pub enum AuditorError {
    #[error("{caller} is not authorized to {action}")]
    NotAuthorized {
        caller: AccountName,
        action: &'static str,
    },

    #[error("candidate {0} is not registered")]
    CandidateNotFound(AccountName),

    #[error("candidate {0} is already active")]
    AlreadyActive(AccountName),

    #[error("candidate {0} is not active")]
    NotActive(AccountName),

    #[error("{0} holds an auditor seat; resign instead of withdrawing")]
    SeatedAuditor(AccountName),

    #[error("{0} is not an elected auditor")]
    NotAnAuditor(AccountName),

    #[error("candidate {0} must withdraw before unstaking")]
    StillActive(AccountName),

    #[error("stake of {candidate} is locked until {until}")]
    StakeLocked {
        candidate: AccountName,
        until: Timestamp,
    },

    #[error("candidate {0} has no stake to release")]
    NothingToUnstake(AccountName),

    #[error("{0} has no recorded vote")]
    NoVoteRecorded(AccountName),

    #[error("no active candidate has any votes")]
    NoElectableCandidates,

    #[error("too many votes: {submitted} submitted, at most {max} allowed")]
    TooManyVotes { submitted: usize, max: u8 },

    #[error("candidate {0} appears more than once in the vote")]
    DuplicateVote(AccountName),

    #[error("{0} is not an active candidate")]
    IneligibleCandidate(AccountName),

    #[error("bio is {len} characters, at most {max} allowed")]
    BioTooLong { len: usize, max: usize },

    #[error("candidate {candidate} has {locked} locked, {required} required")]
    InsufficientStake {
        candidate: AccountName,
        locked: Asset,
        required: Asset,
    },

    #[error("symbol mismatch: expected {expected}, got {actual}")]
    SymbolMismatch { expected: String, actual: String },

    #[error("vote quorum not met: {cast} of {max_supply} cast, {required_percent}% required")]
    QuorumNotMet {
        cast: u128,
        max_supply: u128,
        required_percent: u8,
    },

    #[error("tenure period has not elapsed: last tenure at {last}, next allowed at {next}")]
    PeriodNotElapsed { last: Timestamp, next: Timestamp },

    #[error("insufficient funds on {account}: need {needed}, have {available}")]
    InsufficientFunds {
        account: String,
        needed: Asset,
        available: Asset,
    },

    #[error("vote tally for {0} would go negative")]
    TallyUnderflow(AccountName),

    #[error("arithmetic overflow")]
    Overflow,

    #[error("ledger error: {0}")]
    Ledger(LedgerError),

    #[error("authority error: {0}")]
    Authority(#[from] AuthorityError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl AuditorError {
    pub fn kind(&self) -> ErrorKind {
        use AuditorError::*;
        match self {
            NotAuthorized { .. } => ErrorKind::AuthorizationDenied,
            CandidateNotFound(_)
            | AlreadyActive(_)
            | NotActive(_)
            | SeatedAuditor(_)
            | NotAnAuditor(_)
            | StillActive(_)
            | StakeLocked { .. }
            | NothingToUnstake(_)
            | NoVoteRecorded(_)
            | NoElectableCandidates => ErrorKind::InvalidState,
            TooManyVotes { .. }
            | DuplicateVote(_)
            | IneligibleCandidate(_)
            | BioTooLong { .. }
            | InsufficientStake { .. }
            | SymbolMismatch { .. }
            | Overflow => ErrorKind::ConstraintViolation,
            QuorumNotMet { .. } => ErrorKind::QuorumNotMet,
            PeriodNotElapsed { .. } => ErrorKind::PeriodNotElapsed,
            InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            TallyUnderflow(_) | Store(_) => ErrorKind::Storage,
            Ledger(_) | Authority(_) => ErrorKind::Collaborator,
        }
    }
}

impl From<LedgerError> for AuditorError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::InsufficientFunds {
                account,
                needed,
                available,
            } => AuditorError::InsufficientFunds {
                account,
                needed,
                available,
            },
            other => AuditorError::Ledger(other),
        }
    }
}

impl From<TypesError> for AuditorError {
    fn from(e: TypesError) -> Self {
        match e {
            TypesError::SymbolMismatch { expected, actual } => {
                AuditorError::SymbolMismatch { expected, actual }
            }
            _ => AuditorError::Overflow,
        }
    }
}
