//! Error types for ecomm-client.
//!
//! Every failure is surfaced to the immediate caller. Nothing in this crate
//! retries or recovers on its own.

use solana_program::pubkey::Pubkey;
use thiserror::Error;

use crate::records::RecordKind;

pub type EcommResult<T> = Result<T, EcommError>;

/// Failure while decoding a fixed-layout record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("truncated {kind} record: need {expected} bytes, got {actual}")]
    TruncatedInput {
        kind: RecordKind,
        expected: usize,
        actual: usize,
    },
}

/// Failure reported by the ledger collaborator while reading or submitting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("network failure: {0}")]
    Network(String),
    #[error("rejected by program: {0}")]
    Rejected(String),
    #[error("timed out: {0}")]
    Timeout(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EcommError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("unknown opcode {0}")]
    UnknownOpcode(u8),

    #[error("seed {tag:?} is {len} bytes, longer than {max}")]
    SeedTooLong { tag: String, len: usize, max: usize },

    #[error("no valid bump found for seed {tag:?}")]
    NoValidBumpFound { tag: String },

    #[error("account not found: {0}")]
    AccountNotFound(Pubkey),

    #[error("account already initialized: {0}")]
    AlreadyInitialized(Pubkey),

    #[error("program not found: {0}")]
    ProgramNotFound(Pubkey),

    #[error("program is not executable: {0}")]
    ProgramNotExecutable(Pubkey),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

impl EcommError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedPayload(msg.into())
    }

    /// True for builder misuse that must never reach the ledger.
    pub fn is_programmer_error(&self) -> bool {
        matches!(self, Self::MalformedPayload(_) | Self::UnknownOpcode(_) | Self::SeedTooLong { .. })
    }
}
