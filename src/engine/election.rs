use chrono::{DateTime, Utc};
use log::info;

use crate::error::{Error, Result};
use crate::model::access::Principal;
use crate::model::election::{CandidateId, ElectionId, ElectionKind, ElectionSpec, ElectionState};
use crate::model::event::Event;
use crate::model::ContentRef;

use super::Engine;

impl Engine {
    /// Create an election from a spec, assigning the next sequential ID.
    /// The caller becomes its owning admin.
    pub fn create_election(
        &mut self,
        caller: &Principal,
        spec: ElectionSpec,
        now: DateTime<Utc>,
    ) -> Result<ElectionId> {
        self.access.require_election_admin(caller)?;
        if spec.title.trim().is_empty() {
            return Err(Error::InvalidInput(
                "election title must not be empty".to_string(),
            ));
        }
        if spec.registration_start >= spec.voting_start || spec.voting_start >= spec.voting_end {
            return Err(Error::InvalidInput(
                "times must satisfy registration start < voting start < voting end".to_string(),
            ));
        }
        if spec.registration_start < now {
            return Err(Error::InvalidInput(
                "registration must not start in the past".to_string(),
            ));
        }
        match (spec.kind, &spec.organization) {
            (ElectionKind::Organization, None) => {
                return Err(Error::InvalidInput(
                    "organization elections must name their organization".to_string(),
                ))
            }
            (ElectionKind::Organization, Some(organization)) => {
                if self.access.organization(organization).is_none() {
                    return Err(Error::InvalidInput(format!(
                        "no organization with ID {organization}"
                    )));
                }
            }
            (_, Some(_)) => {
                return Err(Error::InvalidInput(
                    "only organization elections may name an organization".to_string(),
                ))
            }
            (_, None) => {}
        }

        let id = self.election_ids.next();
        let admin = caller.clone();
        self.elections.insert(id, spec.into_election(id, admin.clone()));
        info!("election {id} created by {admin}");
        self.emit(Event::ElectionCreated { election: id, admin });
        Ok(id)
    }

    /// Move an election one stage forward through its lifecycle. Each edge
    /// has its own guard; `Ended -> Finalized` is reserved to
    /// [`Engine::finalize_election`].
    pub fn advance_election(
        &mut self,
        caller: &Principal,
        id: ElectionId,
        target: ElectionState,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let election = self.election(id)?;
        self.require_manager(election, caller)?;
        let from = election.metadata.state;
        match (from, target) {
            (ElectionState::Draft, ElectionState::Registration) => {
                if election.candidates().is_empty() {
                    return Err(Error::InvalidState(format!(
                        "election {id} has no candidates"
                    )));
                }
            }
            (ElectionState::Registration, ElectionState::Active) => {
                if now < election.metadata.voting_start {
                    return Err(Error::InvalidState(format!(
                        "voting in election {id} has not opened yet"
                    )));
                }
            }
            (ElectionState::Active, ElectionState::Ended) => {
                if now < election.metadata.voting_end {
                    return Err(Error::InvalidState(format!(
                        "voting in election {id} has not closed yet"
                    )));
                }
            }
            (ElectionState::Ended, ElectionState::Finalized) => {
                return Err(Error::InvalidTransition(
                    "finalization goes through finalize_election".to_string(),
                ))
            }
            (from, to) => {
                return Err(Error::InvalidTransition(format!("{from} -> {to}")));
            }
        }

        self.election_mut(id)?.metadata.state = target;
        info!("election {id}: {from} -> {target}");
        self.emit(Event::ElectionAdvanced {
            election: id,
            from,
            to: target,
        });
        Ok(())
    }

    /// Add a candidate to a draft election, returning its new ID.
    pub fn add_candidate(
        &mut self,
        caller: &Principal,
        id: ElectionId,
        name: String,
        details: ContentRef,
    ) -> Result<CandidateId> {
        let election = self.election(id)?;
        self.require_manager(election, caller)?;
        if election.metadata.state != ElectionState::Draft {
            return Err(Error::InvalidState(format!(
                "election {id} is no longer in draft"
            )));
        }
        if name.trim().is_empty() {
            return Err(Error::InvalidInput(
                "candidate name must not be empty".to_string(),
            ));
        }

        let candidate = self.election_mut(id)?.push_candidate(name, details);
        info!("election {id}: candidate {candidate} added");
        self.emit(Event::CandidateAdded {
            election: id,
            candidate,
        });
        Ok(candidate)
    }

    /// Deactivate a candidate while the election is still in draft. The
    /// candidate stays listed but can no longer receive votes.
    pub fn deactivate_candidate(
        &mut self,
        caller: &Principal,
        id: ElectionId,
        candidate: CandidateId,
    ) -> Result<()> {
        let election = self.election(id)?;
        self.require_manager(election, caller)?;
        if election.metadata.state != ElectionState::Draft {
            return Err(Error::InvalidState(format!(
                "election {id} is no longer in draft"
            )));
        }
        match self.election_mut(id)?.candidate_mut(candidate) {
            Some(chosen) => chosen.active = false,
            None => {
                return Err(Error::InvalidCandidate(format!(
                    "no candidate with ID {candidate} in election {id}"
                )))
            }
        }
        info!("election {id}: candidate {candidate} deactivated");
        self.emit(Event::CandidateDeactivated {
            election: id,
            candidate,
        });
        Ok(())
    }
}
