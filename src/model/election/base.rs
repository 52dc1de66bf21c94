use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::access::Principal;
use crate::model::ballot::Ballot;
use crate::model::registration::Registration;
use crate::model::ContentRef;

use super::metadata::ElectionMetadata;
use super::CandidateId;

/// Core election data: metadata plus the sub-state the election owns by
/// value, namely its candidates, registrations and ballots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Election {
    /// Unique ID.
    pub id: super::ElectionId,
    /// Top-level metadata.
    #[serde(flatten)]
    pub metadata: ElectionMetadata,
    /// Candidates in registration order; a candidate's ID is its index
    /// plus one.
    candidates: Vec<Candidate>,
    /// Voter registrations by principal.
    registrations: BTreeMap<Principal, Registration>,
    /// Cast ballots by principal. Presence of an entry is the
    /// "has voted" flag.
    ballots: BTreeMap<Principal, Ballot>,
    /// Total votes cast; always equals the sum of the candidate tallies.
    total_votes: u64,
    /// Winning candidate, set exactly once at finalization.
    winner: Option<CandidateId>,
}

impl Election {
    /// Create a new election with no candidates, registrations or ballots.
    pub fn new(id: super::ElectionId, metadata: ElectionMetadata) -> Self {
        Self {
            id,
            metadata,
            candidates: Vec::new(),
            registrations: BTreeMap::new(),
            ballots: BTreeMap::new(),
            total_votes: 0,
            winner: None,
        }
    }

    /// Candidates in ascending ID order.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Look up a candidate by its 1-based ID.
    pub fn candidate(&self, id: CandidateId) -> Option<&Candidate> {
        id.checked_sub(1)
            .and_then(|index| self.candidates.get(index as usize))
    }

    pub(crate) fn candidate_mut(&mut self, id: CandidateId) -> Option<&mut Candidate> {
        id.checked_sub(1)
            .and_then(|index| self.candidates.get_mut(index as usize))
    }

    /// Append a candidate, returning its new ID.
    pub(crate) fn push_candidate(&mut self, name: String, details: ContentRef) -> CandidateId {
        let id = self.candidates.len() as CandidateId + 1;
        self.candidates.push(Candidate {
            id,
            name,
            details,
            tally: 0,
            active: true,
        });
        id
    }

    /// A voter's registration, if any.
    pub fn registration(&self, voter: &Principal) -> Option<&Registration> {
        self.registrations.get(voter)
    }

    pub(crate) fn registration_mut(&mut self, voter: &Principal) -> Option<&mut Registration> {
        self.registrations.get_mut(voter)
    }

    /// Insert or replace a voter's registration.
    pub(crate) fn insert_registration(&mut self, voter: Principal, registration: Registration) {
        self.registrations.insert(voter, registration);
    }

    /// A voter's cast ballot, if any.
    pub fn ballot(&self, voter: &Principal) -> Option<&Ballot> {
        self.ballots.get(voter)
    }

    /// Has the voter cast a ballot in this election?
    pub fn has_voted(&self, voter: &Principal) -> bool {
        self.ballots.contains_key(voter)
    }

    /// Total votes cast across all candidates.
    pub fn total_votes(&self) -> u64 {
        self.total_votes
    }

    /// The winning candidate, present once finalized.
    pub fn winner(&self) -> Option<CandidateId> {
        self.winner
    }

    pub(crate) fn set_winner(&mut self, winner: Option<CandidateId>) {
        self.winner = winner;
    }

    /// Commit a vote: record the ballot, bump the candidate's tally and the
    /// total in one step so the two can never drift apart. Re-verifies the
    /// double-vote and candidate checks, leaving the election untouched on
    /// failure.
    pub(crate) fn record_vote(
        &mut self,
        voter: Principal,
        candidate: CandidateId,
        ballot: Ballot,
    ) -> Result<()> {
        if self.ballots.contains_key(&voter) {
            return Err(Error::AlreadyVoted(self.id));
        }
        match self.candidate_mut(candidate) {
            Some(chosen) if chosen.active => {
                chosen.tally += 1;
            }
            _ => {
                return Err(Error::InvalidCandidate(format!(
                    "no active candidate with ID {candidate} in election {}",
                    self.id
                )))
            }
        }
        self.total_votes += 1;
        self.ballots.insert(voter, ballot);
        Ok(())
    }

    /// The candidate with the strictly greatest tally, scanning in
    /// ascending ID order so the earliest-registered candidate wins exact
    /// ties. `None` when no votes were cast.
    pub fn compute_winner(&self) -> Option<CandidateId> {
        let mut winner = None;
        let mut best = 0;
        for candidate in &self.candidates {
            if candidate.tally > best {
                best = candidate.tally;
                winner = Some(candidate.id);
            }
        }
        winner
    }
}

/// A candidate standing in an election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Unique ID within the election, starting at 1.
    pub id: CandidateId,
    /// Candidate name.
    pub name: String,
    /// Reference to candidate details (bio, photo) in external content
    /// storage.
    pub details: ContentRef,
    /// Number of votes received so far.
    pub tally: u64,
    /// Inactive candidates remain listed but cannot receive votes.
    pub active: bool,
}
