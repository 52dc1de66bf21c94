//! The public operation surface of the engine.
//!
//! Every operation takes `&mut self` and executes to completion before the
//! next begins, which is the whole concurrency model: a single writer,
//! equivalent to one global exclusive lock around each call. Reads borrow
//! `&self` and therefore always observe a consistent snapshot.

mod access;
mod election;
mod finalize;
mod registration;
mod voting;

use std::collections::BTreeMap;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::access::{AccessControl, Principal, Role};
use crate::model::election::{
    Candidate, CandidateId, Election, ElectionId, ElectionResults,
};
use crate::model::event::{Event, EventRecord};
use crate::model::registration::Registration;

/// A counter implementing gap-free auto-increment IDs.
#[derive(Debug, Clone)]
struct Counter {
    next: u32,
}

impl Counter {
    fn new(start: u32) -> Self {
        Self { next: start }
    }

    /// Retrieve the next value of the counter.
    fn next(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// The election lifecycle engine: role grants, elections and the
/// sub-state they own, plus the journal of everything that happened.
pub struct Engine {
    config: Config,
    access: AccessControl,
    elections: BTreeMap<ElectionId, Election>,
    election_ids: Counter,
    events: Vec<EventRecord>,
}

impl Engine {
    /// Create an engine whose initializing principal holds super-admin.
    pub fn new(config: Config, root: Principal) -> Self {
        Self {
            config,
            access: AccessControl::new(root),
            elections: BTreeMap::new(),
            election_ids: Counter::new(1),
            events: Vec::new(),
        }
    }

    /// Look up an election.
    pub fn election(&self, id: ElectionId) -> Result<&Election> {
        self.elections
            .get(&id)
            .ok_or_else(|| Error::NotFound(format!("no election with ID {id}")))
    }

    /// All elections, in ascending ID order.
    pub fn elections(&self) -> impl Iterator<Item = &Election> {
        self.elections.values()
    }

    /// Look up a candidate.
    pub fn candidate(&self, election: ElectionId, candidate: CandidateId) -> Result<&Candidate> {
        self.election(election)?.candidate(candidate).ok_or_else(|| {
            Error::NotFound(format!(
                "no candidate with ID {candidate} in election {election}"
            ))
        })
    }

    /// Candidates of an election, in ascending ID order. Readable in any
    /// state.
    pub fn candidates(&self, election: ElectionId) -> Result<&[Candidate]> {
        Ok(self.election(election)?.candidates())
    }

    /// A voter's registration for an election, if any.
    pub fn registration(
        &self,
        election: ElectionId,
        voter: &Principal,
    ) -> Result<Option<&Registration>> {
        Ok(self.election(election)?.registration(voter))
    }

    /// Live results: per-candidate tallies, the running total, and the
    /// winner once finalized.
    pub fn results(&self, election: ElectionId) -> Result<ElectionResults> {
        let election = self.election(election)?;
        Ok(ElectionResults {
            election: election.id,
            tallies: election
                .candidates()
                .iter()
                .map(|candidate| (candidate.id, candidate.tally))
                .collect(),
            total_votes: election.total_votes(),
            winner: election.winner(),
        })
    }

    /// Does the principal hold the role? Side-effect-free.
    pub fn has_role(&self, role: Role, principal: &Principal) -> bool {
        self.access.has_role(role, principal)
    }

    /// The full event journal, for audit consumers.
    pub fn audit_log(&self, caller: &Principal) -> Result<&[EventRecord]> {
        if self.access.has_role(Role::Auditor, caller)
            || self.access.has_role(Role::SuperAdmin, caller)
        {
            Ok(&self.events)
        } else {
            Err(Error::PermissionDenied(format!(
                "{caller} is not an auditor"
            )))
        }
    }

    fn election_mut(&mut self, id: ElectionId) -> Result<&mut Election> {
        self.elections
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("no election with ID {id}")))
    }

    /// Fail unless the caller is the election's manager: its owning admin
    /// or any super-admin.
    fn require_manager(&self, election: &Election, caller: &Principal) -> Result<()> {
        if election.metadata.admin == *caller || self.access.has_role(Role::SuperAdmin, caller) {
            Ok(())
        } else {
            Err(Error::PermissionDenied(format!(
                "{caller} does not manage election {}",
                election.id
            )))
        }
    }

    /// Append to the journal.
    fn emit(&mut self, event: Event) {
        let seq = self.events.len() as u64;
        self.events.push(EventRecord { seq, event });
    }
}

/// Shared setup for the operation tests.
#[cfg(test)]
pub(crate) mod testing {
    use chrono::{DateTime, Duration, Utc};

    use crate::config::Config;
    use crate::model::access::{Principal, Role};
    use crate::model::election::{ElectionId, ElectionSpec, ElectionState};

    use super::Engine;

    pub(crate) fn root() -> Principal {
        Principal::from("root")
    }

    pub(crate) fn admin() -> Principal {
        Principal::from("admin")
    }

    /// An engine with super-admin `root` and election admin `admin`.
    pub(crate) fn engine() -> Engine {
        let mut engine = Engine::new(Config::example(), root());
        engine
            .grant_role(&root(), Role::ElectionAdmin, admin())
            .unwrap();
        engine
    }

    /// Create `spec` as `admin` and add two candidates while in draft.
    pub(crate) fn create_with_candidates(engine: &mut Engine, spec: ElectionSpec) -> ElectionId {
        let created_at = spec.registration_start - Duration::seconds(5);
        let id = engine.create_election(&admin(), spec, created_at).unwrap();
        engine
            .add_candidate(&admin(), id, "Ada".to_string(), "content:ada".to_string())
            .unwrap();
        engine
            .add_candidate(&admin(), id, "Grace".to_string(), "content:grace".to_string())
            .unwrap();
        id
    }

    /// Drive an election through registration into active voting, and
    /// return the logical time voting opened at.
    pub(crate) fn open_voting(engine: &mut Engine, id: ElectionId) -> DateTime<Utc> {
        let registration_start = engine.election(id).unwrap().metadata.registration_start;
        let voting_start = engine.election(id).unwrap().metadata.voting_start;
        engine
            .advance_election(&admin(), id, ElectionState::Registration, registration_start)
            .unwrap();
        engine
            .advance_election(&admin(), id, ElectionState::Active, voting_start)
            .unwrap();
        voting_start
    }
}
