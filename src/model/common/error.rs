use thiserror::Error;

use crate::model::common::{address::Address, credential::CredentialId};

/// A rejected ledger operation. Every variant describes a guard that failed
/// before anything was mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Address {0} already holds a credential")]
    AlreadyHasCredential(Address),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Address {0} is not the administrator")]
    NotAuthorized(Address),
    #[error("No credential with ID {0}")]
    NotFound(CredentialId),
    #[error("Credential {0} has not been verified")]
    NotVerified(CredentialId),
    #[error("Address {0} is not eligible to vote")]
    NotEligible(Address),
    #[error("Address {0} has already voted")]
    AlreadyVoted(Address),
    #[error("Unknown candidate: {0}")]
    UnknownCandidate(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl LedgerError {
    /// Stable name of the failure kind, suitable for clients to match on.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AlreadyHasCredential(_) => "AlreadyHasCredential",
            Self::InvalidInput(_) => "InvalidInput",
            Self::NotAuthorized(_) => "NotAuthorized",
            Self::NotFound(_) => "NotFound",
            Self::NotVerified(_) => "NotVerified",
            Self::NotEligible(_) => "NotEligible",
            Self::AlreadyVoted(_) => "AlreadyVoted",
            Self::UnknownCandidate(_) => "UnknownCandidate",
            Self::InvalidConfiguration(_) => "InvalidConfiguration",
        }
    }
}
