//! The identity registry: one credential per address, verified and made
//! eligible only by the administrator.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};
use hmac::{digest::Output, Hmac, Mac};
use sha2::Sha256;

use crate::model::common::{address::Address, credential::CredentialId, error::LedgerError};

pub type HmacSha256 = Hmac<Sha256>;

/// Keyed digest of a national identifier. The plaintext is never stored.
pub type AnchorDigest = Output<HmacSha256>;

/// A per-address identity record.
///
/// Fields are only readable from outside this module; all mutation goes
/// through [`IdentityRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    id: CredentialId,
    owner: Address,
    display_name: String,
    anchor: AnchorDigest,
    metadata_uri: Option<String>,
    verified: bool,
    eligible: bool,
    minted_at: DateTime<Utc>,
}

impl Credential {
    pub fn id(&self) -> CredentialId {
        self.id
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn metadata_uri(&self) -> Option<&str> {
        self.metadata_uri.as_deref()
    }

    pub fn is_verified(&self) -> bool {
        self.verified
    }

    pub fn is_eligible(&self) -> bool {
        self.eligible
    }

    pub fn minted_at(&self) -> DateTime<Utc> {
        self.minted_at
    }

    /// Does this credential's anchor match the given national identifier under `key`?
    pub fn anchor_matches(&self, key: &[u8], national_id: &str) -> bool {
        anchor_digest(key, national_id.trim()) == self.anchor
    }
}

/// Compute the keyed digest stored in place of a national identifier.
fn anchor_digest(key: &[u8], national_id: &str) -> AnchorDigest {
    let mut hmac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    hmac.update(national_id.as_bytes());
    hmac.finalize().into_bytes()
}

/// Reject empty or whitespace-only fields, returning the trimmed value.
fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, LedgerError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(trimmed)
}

/// Owner of all credential records.
#[derive(Clone, PartialEq, Eq)]
pub struct IdentityRegistry {
    administrator: Address,
    anchor_key: Vec<u8>,
    credentials: BTreeMap<CredentialId, Credential>,
    owners: HashMap<Address, CredentialId>,
    next_id: CredentialId,
}

// The anchor key is a secret, so keep it out of debug output.
impl fmt::Debug for IdentityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityRegistry")
            .field("administrator", &self.administrator)
            .field("credentials", &self.credentials)
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

impl IdentityRegistry {
    /// Create an empty registry administered by `administrator`. National
    /// identifiers are digested under `anchor_key` before storage.
    pub fn new(administrator: Address, anchor_key: impl Into<Vec<u8>>) -> Self {
        Self {
            administrator,
            anchor_key: anchor_key.into(),
            credentials: BTreeMap::new(),
            owners: HashMap::new(),
            next_id: CredentialId::FIRST,
        }
    }

    /// The fixed administrator address.
    pub fn administrator(&self) -> Address {
        self.administrator
    }

    /// Mint a credential for the caller.
    pub fn mint(
        &mut self,
        caller: Address,
        display_name: &str,
        national_id: &str,
    ) -> Result<CredentialId, LedgerError> {
        self.insert(caller, display_name, national_id, None)
    }

    /// Mint a credential on behalf of `target`, optionally attaching a metadata URI.
    pub fn admin_mint(
        &mut self,
        admin: Address,
        target: Address,
        display_name: &str,
        national_id: &str,
        metadata_uri: Option<&str>,
    ) -> Result<CredentialId, LedgerError> {
        self.ensure_administrator(admin)?;
        self.insert(target, display_name, national_id, metadata_uri)
    }

    /// Mark a credential as verified. Verifying twice is a no-op.
    pub fn verify(&mut self, admin: Address, id: CredentialId) -> Result<(), LedgerError> {
        self.ensure_administrator(admin)?;
        let credential = self
            .credentials
            .get_mut(&id)
            .ok_or(LedgerError::NotFound(id))?;
        credential.verified = true;
        Ok(())
    }

    /// Grant or revoke voting eligibility. Granting requires prior verification.
    pub fn set_eligibility(
        &mut self,
        admin: Address,
        id: CredentialId,
        eligible: bool,
    ) -> Result<(), LedgerError> {
        self.ensure_administrator(admin)?;
        let credential = self
            .credentials
            .get_mut(&id)
            .ok_or(LedgerError::NotFound(id))?;
        if eligible && !credential.verified {
            return Err(LedgerError::NotVerified(id));
        }
        credential.eligible = eligible;
        Ok(())
    }

    /// Does the address hold an eligible credential?
    pub fn is_eligible(&self, address: &Address) -> bool {
        self.credential_of(address)
            .map(Credential::is_eligible)
            .unwrap_or(false)
    }

    pub fn credential_id_of(&self, address: &Address) -> Option<CredentialId> {
        self.owners.get(address).copied()
    }

    pub fn credential_of(&self, address: &Address) -> Option<&Credential> {
        self.credential_id_of(address)
            .and_then(|id| self.credentials.get(&id))
    }

    pub fn credential(&self, id: CredentialId) -> Option<&Credential> {
        self.credentials.get(&id)
    }

    pub fn is_verified(&self, id: CredentialId) -> Result<bool, LedgerError> {
        self.credential(id)
            .map(Credential::is_verified)
            .ok_or(LedgerError::NotFound(id))
    }

    pub fn is_eligible_by_id(&self, id: CredentialId) -> Result<bool, LedgerError> {
        self.credential(id)
            .map(Credential::is_eligible)
            .ok_or(LedgerError::NotFound(id))
    }

    /// All credentials in id order.
    pub fn credentials(&self) -> impl Iterator<Item = &Credential> {
        self.credentials.values()
    }

    /// Number of credentials minted so far.
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    fn ensure_administrator(&self, caller: Address) -> Result<(), LedgerError> {
        if caller != self.administrator {
            return Err(LedgerError::NotAuthorized(caller));
        }
        Ok(())
    }

    fn insert(
        &mut self,
        owner: Address,
        display_name: &str,
        national_id: &str,
        metadata_uri: Option<&str>,
    ) -> Result<CredentialId, LedgerError> {
        if self.owners.contains_key(&owner) {
            return Err(LedgerError::AlreadyHasCredential(owner));
        }
        let display_name = required("display name", display_name)?;
        let national_id = required("national ID", national_id)?;
        let metadata_uri = metadata_uri
            .map(|uri| required("metadata URI", uri))
            .transpose()?;

        let id = self.next_id;
        let next_id = id.next().ok_or_else(|| {
            LedgerError::InvalidInput("credential ID space is exhausted".to_string())
        })?;

        let credential = Credential {
            id,
            owner,
            display_name: display_name.to_string(),
            anchor: anchor_digest(&self.anchor_key, national_id),
            metadata_uri: metadata_uri.map(str::to_string),
            verified: false,
            eligible: false,
            minted_at: Utc::now(),
        };
        self.credentials.insert(id, credential);
        self.owners.insert(owner, id);
        self.next_id = next_id;
        Ok(id)
    }
}


#[cfg(test)]
mod tests {
    use super::examples::ANCHOR_KEY;
    use super::*;

    #[test]
    fn mint_allocates_sequential_ids() {
        let mut registry = IdentityRegistry::example();
        let alice = Address::participant(1);
        let bob = Address::participant(2);

        let first = registry.mint(alice, "Alice", "1").unwrap();
        let second = registry.mint(bob, "Bob", "2").unwrap();

        assert_eq!(first, CredentialId::FIRST);
        assert_eq!(second.get(), 2);
        assert_eq!(registry.credential_id_of(&alice), Some(first));
        assert_eq!(registry.credential_id_of(&bob), Some(second));
        assert_eq!(registry.len(), 2);

        let credential = registry.credential(first).unwrap();
        assert_eq!(credential.owner(), alice);
        assert_eq!(credential.display_name(), "Alice");
        assert!(!credential.is_verified());
        assert!(!credential.is_eligible());
        assert_eq!(credential.metadata_uri(), None);
    }

    #[test]
    fn one_credential_per_address() {
        let mut registry = IdentityRegistry::example();
        let alice = Address::participant(1);
        registry.mint(alice, "Alice", "1").unwrap();
        let before = registry.clone();

        assert_eq!(
            registry.mint(alice, "Alice again", "9"),
            Err(LedgerError::AlreadyHasCredential(alice))
        );
        assert_eq!(
            registry.admin_mint(Address::admin(), alice, "Alice", "1", None),
            Err(LedgerError::AlreadyHasCredential(alice))
        );
        assert!(registry == before);
    }

    #[test]
    fn mint_rejects_blank_fields() {
        let mut registry = IdentityRegistry::example();
        let alice = Address::participant(1);

        assert!(matches!(
            registry.mint(alice, "", "1"),
            Err(LedgerError::InvalidInput(_))
        ));
        assert!(matches!(
            registry.mint(alice, "Alice", "   "),
            Err(LedgerError::InvalidInput(_))
        ));
        assert!(matches!(
            registry.admin_mint(Address::admin(), alice, "Alice", "1", Some(" ")),
            Err(LedgerError::InvalidInput(_))
        ));
        assert!(registry.is_empty());
        assert_eq!(registry.credential_id_of(&alice), None);

        // A failed mint does not burn an id.
        assert_eq!(registry.mint(alice, "Alice", "1"), Ok(CredentialId::FIRST));
    }

    #[test]
    fn admin_mint_requires_administrator() {
        let mut registry = IdentityRegistry::example();
        let mallory = Address::participant(66);
        let target = Address::participant(2);

        assert_eq!(
            registry.admin_mint(mallory, target, "Bob", "2", None),
            Err(LedgerError::NotAuthorized(mallory))
        );
        assert!(registry.is_empty());

        let id = registry
            .admin_mint(Address::admin(), target, "Bob", "2", Some("ipfs://QmExample2"))
            .unwrap();
        let credential = registry.credential(id).unwrap();
        assert_eq!(credential.owner(), target);
        assert_eq!(credential.metadata_uri(), Some("ipfs://QmExample2"));
        assert_eq!(registry.credential_id_of(&Address::admin()), None);
    }

    #[test]
    fn verify_is_admin_only_and_idempotent() {
        let mut registry = IdentityRegistry::example();
        let alice = Address::participant(1);
        let id = registry.mint(alice, "Alice", "1").unwrap();

        assert_eq!(
            registry.verify(alice, id),
            Err(LedgerError::NotAuthorized(alice))
        );
        assert_eq!(registry.is_verified(id), Ok(false));

        registry.verify(Address::admin(), id).unwrap();
        assert_eq!(registry.is_verified(id), Ok(true));
        registry.verify(Address::admin(), id).unwrap();
        assert_eq!(registry.is_verified(id), Ok(true));

        let missing = CredentialId::new(42).unwrap();
        assert_eq!(
            registry.verify(Address::admin(), missing),
            Err(LedgerError::NotFound(missing))
        );
    }

    #[test]
    fn eligibility_requires_verification() {
        let mut registry = IdentityRegistry::example();
        let alice = Address::participant(1);
        let id = registry.mint(alice, "Alice", "1").unwrap();
        let before = registry.clone();

        assert_eq!(
            registry.set_eligibility(Address::admin(), id, true),
            Err(LedgerError::NotVerified(id))
        );
        assert!(registry == before);
        assert!(!registry.is_eligible(&alice));

        // Clearing eligibility on an unverified credential is allowed.
        registry.set_eligibility(Address::admin(), id, false).unwrap();

        registry.verify(Address::admin(), id).unwrap();
        registry.set_eligibility(Address::admin(), id, true).unwrap();
        assert!(registry.is_eligible(&alice));
        assert_eq!(registry.is_eligible_by_id(id), Ok(true));
    }

    #[test]
    fn eligibility_can_be_revoked() {
        let mut registry = IdentityRegistry::example();
        let alice = Address::participant(1);
        let id = registry.enrol(alice);
        assert!(registry.is_eligible(&alice));

        registry.set_eligibility(Address::admin(), id, false).unwrap();
        assert!(!registry.is_eligible(&alice));
        // Revocation keeps the identity verified.
        assert_eq!(registry.is_verified(id), Ok(true));

        registry.set_eligibility(Address::admin(), id, true).unwrap();
        assert!(registry.is_eligible(&alice));
    }

    #[test]
    fn set_eligibility_guards() {
        let mut registry = IdentityRegistry::example();
        let alice = Address::participant(1);
        let id = registry.mint(alice, "Alice", "1").unwrap();
        let missing = CredentialId::new(7).unwrap();

        assert_eq!(
            registry.set_eligibility(alice, id, true),
            Err(LedgerError::NotAuthorized(alice))
        );
        assert_eq!(
            registry.set_eligibility(Address::admin(), missing, false),
            Err(LedgerError::NotFound(missing))
        );
        assert_eq!(
            registry.is_eligible_by_id(missing),
            Err(LedgerError::NotFound(missing))
        );
    }

    #[test]
    fn unknown_address_is_not_eligible() {
        let registry = IdentityRegistry::example();
        assert!(!registry.is_eligible(&Address::participant(3)));
        assert_eq!(registry.credential_id_of(&Address::participant(3)), None);
        assert_eq!(registry.administrator(), Address::admin());
    }

    #[test]
    fn national_id_is_stored_as_keyed_digest() {
        let mut registry = IdentityRegistry::example();
        let id = registry
            .mint(Address::participant(1), "Alice", " 12345678 ")
            .unwrap();
        let credential = registry.credential(id).unwrap();

        assert!(credential.anchor_matches(ANCHOR_KEY, "12345678"));
        assert!(!credential.anchor_matches(ANCHOR_KEY, "12345679"));
        assert!(!credential.anchor_matches(b"another key", "12345678"));
    }
}
