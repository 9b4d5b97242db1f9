use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    common::{address::Address, credential::CredentialId},
    identity::Credential,
};

/// A participant's request to mint their own credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintRequest {
    pub display_name: String,
    /// The identifier anchor. Digested on receipt; never stored or echoed back.
    pub national_id: String,
}

/// An administrator's request to mint a credential for someone else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminMintRequest {
    pub owner: Address,
    pub display_name: String,
    pub national_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_uri: Option<String>,
}

/// Response to a successful mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Minted {
    pub id: CredentialId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityRequest {
    pub eligible: bool,
}

/// Public view of a credential. The identifier anchor is deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialDesc {
    pub id: CredentialId,
    pub owner: Address,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_uri: Option<String>,
    pub verified: bool,
    pub eligible: bool,
    pub minted_at: DateTime<Utc>,
}

impl From<&Credential> for CredentialDesc {
    fn from(credential: &Credential) -> Self {
        Self {
            id: credential.id(),
            owner: credential.owner(),
            display_name: credential.display_name().to_string(),
            metadata_uri: credential.metadata_uri().map(str::to_string),
            verified: credential.is_verified(),
            eligible: credential.is_eligible(),
            minted_at: credential.minted_at(),
        }
    }
}
