//! The shared ledger: the identity registry and the ballot, each behind its
//! own lock, linked by a read-only registry handle.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::model::{
    ballot::{BallotLedger, Eligibility},
    common::{address::Address, error::LedgerError},
    identity::IdentityRegistry,
};

/// A read-only handle on a shared registry. The ballot holds one of these, so
/// it can ask about eligibility but never change it.
#[derive(Clone)]
pub struct RegistryReader(Arc<RwLock<IdentityRegistry>>);

impl Eligibility for RegistryReader {
    fn is_eligible(&self, address: &Address) -> bool {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_eligible(address)
    }
}

/// Managed state owning both components.
///
/// Each state-changing call holds its component's write lock from first check
/// to last write, so calls are applied one at a time and readers only ever see
/// committed state. Locks are only ever nested ballot-then-registry.
pub struct Ledger {
    registry: Arc<RwLock<IdentityRegistry>>,
    ballot: RwLock<BallotLedger<RegistryReader>>,
}

impl Ledger {
    pub fn new(
        administrator: Address,
        anchor_key: impl Into<Vec<u8>>,
        candidates: Vec<String>,
    ) -> Result<Self, LedgerError> {
        let registry = Arc::new(RwLock::new(IdentityRegistry::new(administrator, anchor_key)));
        let ballot = BallotLedger::new(RegistryReader(registry.clone()), candidates)?;
        Ok(Self {
            registry,
            ballot: RwLock::new(ballot),
        })
    }

    pub fn registry(&self) -> RwLockReadGuard<'_, IdentityRegistry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn registry_mut(&self) -> RwLockWriteGuard<'_, IdentityRegistry> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn ballot(&self) -> RwLockReadGuard<'_, BallotLedger<RegistryReader>> {
        self.ballot.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn ballot_mut(&self) -> RwLockWriteGuard<'_, BallotLedger<RegistryReader>> {
        self.ballot.write().unwrap_or_else(PoisonError::into_inner)
    }
}
