use chrono::{DateTime, Utc};
use log::info;

use crate::error::{Error, Result};
use crate::model::access::Principal;
use crate::model::ballot::{Ballot, Receipt};
use crate::model::election::{CandidateId, ElectionId, ElectionKind, ElectionState};
use crate::model::event::Event;
use crate::model::registration::RegistrationStatus;

use super::Engine;

impl Engine {
    /// Cast a vote. All checks pass before anything mutates, and the commit
    /// is a single step: the ballot record, the candidate tally, the
    /// election total and the receipt appear together or not at all.
    /// Returns the receipt issued to the voter.
    pub fn cast_vote(
        &mut self,
        voter: &Principal,
        id: ElectionId,
        candidate: CandidateId,
        now: DateTime<Utc>,
    ) -> Result<Receipt> {
        let election = self.election(id)?;
        let metadata = &election.metadata;
        if metadata.state != ElectionState::Active {
            return Err(Error::InvalidState(format!(
                "election {id} is not accepting votes"
            )));
        }
        if now < metadata.voting_start || now > metadata.voting_end {
            return Err(Error::InvalidState(format!(
                "election {id} is outside its voting window"
            )));
        }
        if election.has_voted(voter) {
            return Err(Error::AlreadyVoted(id));
        }
        match election.candidate(candidate) {
            Some(chosen) if chosen.active => {}
            _ => {
                return Err(Error::InvalidCandidate(format!(
                    "no active candidate with ID {candidate} in election {id}"
                )))
            }
        }
        let eligible = metadata.kind == ElectionKind::Public
            || election
                .registration(voter)
                .map_or(false, |registration| {
                    registration.status == RegistrationStatus::Approved
                });
        if !eligible {
            return Err(Error::NotEligible(format!(
                "{voter} is not approved to vote in election {id}"
            )));
        }

        let receipt = Receipt::for_vote(self.config.hmac_secret(), id, voter, candidate, now);
        let ballot = Ballot {
            receipt: receipt.clone(),
            cast_at: now,
        };
        self.election_mut(id)?
            .record_vote(voter.clone(), candidate, ballot)?;
        info!("election {id}: vote cast");
        self.emit(Event::VoteCast {
            election: id,
            voter: voter.clone(),
        });
        Ok(receipt)
    }

    /// Has the voter cast a ballot in this election?
    pub fn has_voted(&self, id: ElectionId, voter: &Principal) -> Result<bool> {
        Ok(self.election(id)?.has_voted(voter))
    }

    /// Check a receipt against the stored one for this voter. Says nothing
    /// about the candidate chosen; `false` when the voter has no ballot.
    pub fn verify_receipt(
        &self,
        id: ElectionId,
        voter: &Principal,
        receipt: &Receipt,
    ) -> Result<bool> {
        Ok(self
            .election(id)?
            .ballot(voter)
            .map_or(false, |ballot| ballot.receipt == *receipt))
    }
}
