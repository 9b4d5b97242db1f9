//! The ballot ledger: a fixed candidate list, an exact tally, and the set of
//! addresses that have voted.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::{
    common::{address::Address, error::LedgerError},
    identity::IdentityRegistry,
};

/// Anything that can answer whether an address may vote.
pub trait Eligibility {
    fn is_eligible(&self, address: &Address) -> bool;
}

impl Eligibility for IdentityRegistry {
    fn is_eligible(&self, address: &Address) -> bool {
        IdentityRegistry::is_eligible(self, address)
    }
}

impl<T: Eligibility + ?Sized> Eligibility for &T {
    fn is_eligible(&self, address: &Address) -> bool {
        (**self).is_eligible(address)
    }
}

/// Owner of the candidate list and vote state. Eligibility is consulted
/// through the registry handle `R` on every vote, never copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BallotLedger<R> {
    registry: R,
    candidates: Vec<String>,
    tally: HashMap<String, u64>,
    voted: HashSet<Address>,
}

impl<R> BallotLedger<R> {
    /// Create a ledger over a non-empty, duplicate-free candidate list.
    pub fn new(registry: R, candidates: Vec<String>) -> Result<Self, LedgerError> {
        if candidates.is_empty() {
            return Err(LedgerError::InvalidConfiguration(
                "candidate list is empty".to_string(),
            ));
        }
        let mut tally = HashMap::with_capacity(candidates.len());
        for candidate in &candidates {
            if candidate.trim().is_empty() {
                return Err(LedgerError::InvalidConfiguration(
                    "candidate names must not be empty".to_string(),
                ));
            }
            if tally.insert(candidate.clone(), 0).is_some() {
                return Err(LedgerError::InvalidConfiguration(format!(
                    "duplicate candidate {candidate}"
                )));
            }
        }
        Ok(Self {
            registry,
            candidates,
            tally,
            voted: HashSet::new(),
        })
    }

    /// Number of votes recorded for `candidate`; zero for any unknown name.
    pub fn total_votes_for(&self, candidate: &str) -> u64 {
        self.tally.get(candidate).copied().unwrap_or(0)
    }

    pub fn has_voted(&self, address: &Address) -> bool {
        self.voted.contains(address)
    }

    /// The candidates, in construction order.
    pub fn candidate_list(&self) -> &[String] {
        &self.candidates
    }

    /// Number of votes cast across all candidates.
    pub fn total_votes(&self) -> u64 {
        self.voted.len() as u64
    }

    /// Votes per candidate, in construction order.
    pub fn results(&self) -> Vec<CandidateTotal> {
        self.candidates
            .iter()
            .map(|candidate| CandidateTotal {
                candidate: candidate.clone(),
                votes: self.total_votes_for(candidate),
            })
            .collect()
    }

    /// The complete public ballot state.
    pub fn dump(&self) -> BallotDump {
        let mut voted = self.voted.iter().copied().collect::<Vec<_>>();
        voted.sort_unstable();
        BallotDump {
            candidates: self.candidates.clone(),
            tally: self.results(),
            voted,
        }
    }
}

impl<R> BallotLedger<R>
where
    R: Eligibility,
{
    /// Cast the caller's single vote.
    ///
    /// Guards are checked in order: eligibility, then prior vote, then
    /// candidate validity. Nothing is mutated unless all of them pass.
    pub fn vote_for_candidate(
        &mut self,
        caller: Address,
        candidate: &str,
    ) -> Result<(), LedgerError> {
        if !self.registry.is_eligible(&caller) {
            return Err(LedgerError::NotEligible(caller));
        }
        if self.voted.contains(&caller) {
            return Err(LedgerError::AlreadyVoted(caller));
        }
        let count = self
            .tally
            .get_mut(candidate)
            .ok_or_else(|| LedgerError::UnknownCandidate(candidate.to_string()))?;

        *count += 1;
        self.voted.insert(caller);
        Ok(())
    }
}

/// The number of votes for one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTotal {
    pub candidate: String,
    pub votes: u64,
}

/// A full dump of the public ballot state, suitable for offline verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotDump {
    /// Candidates in construction order.
    pub candidates: Vec<String>,
    /// Votes per candidate.
    pub tally: Vec<CandidateTotal>,
    /// Every address that has voted, in ascending order.
    pub voted: Vec<Address>,
}

/// Reasons a ballot dump can fail verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    /// There are no candidates at all.
    NoCandidates,
    /// A candidate is listed more than once.
    DuplicateCandidate(String),
    /// A tally entry names something outside the candidate list.
    UnknownCandidate(String),
    /// A candidate has no tally entry, or more than one.
    MissingTally(String),
    /// An address appears more than once in the voted set.
    DuplicateVoter(Address),
    /// The tallies do not add up to the number of voters.
    TotalMismatch { tallied: u64, voters: u64 },
}

impl BallotDump {
    /// Check every structural invariant of the ballot.
    pub fn verify(&self) -> Result<(), VerificationError> {
        if self.candidates.is_empty() {
            return Err(VerificationError::NoCandidates);
        }
        let mut candidates = HashSet::with_capacity(self.candidates.len());
        for candidate in &self.candidates {
            if !candidates.insert(candidate.as_str()) {
                return Err(VerificationError::DuplicateCandidate(candidate.clone()));
            }
        }

        let mut tallied = HashSet::with_capacity(self.tally.len());
        let mut sum: u64 = 0;
        for total in &self.tally {
            if !candidates.contains(total.candidate.as_str()) {
                return Err(VerificationError::UnknownCandidate(total.candidate.clone()));
            }
            if !tallied.insert(total.candidate.as_str()) {
                return Err(VerificationError::MissingTally(total.candidate.clone()));
            }
            sum = sum.saturating_add(total.votes);
        }
        if let Some(missing) = self
            .candidates
            .iter()
            .find(|candidate| !tallied.contains(candidate.as_str()))
        {
            return Err(VerificationError::MissingTally(missing.clone()));
        }

        let mut voters = HashSet::with_capacity(self.voted.len());
        for address in &self.voted {
            if !voters.insert(address) {
                return Err(VerificationError::DuplicateVoter(*address));
            }
        }

        let voters = self.voted.len() as u64;
        if sum != voters {
            return Err(VerificationError::TotalMismatch {
                tallied: sum,
                voters,
            });
        }
        Ok(())
    }
}

/// Example data for tests.
#[cfg(test)]
pub mod examples {
    use super::CandidateTotal;

    pub fn candidates() -> Vec<String> {
        vec!["Hong".to_string(), "Kim".to_string(), "Lee".to_string()]
    }

    impl CandidateTotal {
        pub fn new(candidate: &str, votes: u64) -> Self {
            Self {
                candidate: candidate.to_string(),
                votes,
            }
        }
    }
}
