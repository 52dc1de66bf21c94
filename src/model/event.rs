use serde::{Deserialize, Serialize};

use crate::model::access::{OrganizationId, Principal, Role};
use crate::model::election::{CandidateId, ElectionId, ElectionState};
use crate::model::registration::RegistrationStatus;

/// A state change notification carrying the relevant identifiers. The
/// engine appends these to its journal for external observers (UI, audit
/// trail) but never reads them back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    RoleGranted {
        role: Role,
        principal: Principal,
    },
    RoleRevoked {
        role: Role,
        principal: Principal,
    },
    OrganizationCreated {
        organization: OrganizationId,
    },
    OrganizationMemberAdded {
        organization: OrganizationId,
        member: Principal,
    },
    ElectionCreated {
        election: ElectionId,
        admin: Principal,
    },
    CandidateAdded {
        election: ElectionId,
        candidate: CandidateId,
    },
    CandidateDeactivated {
        election: ElectionId,
        candidate: CandidateId,
    },
    ElectionAdvanced {
        election: ElectionId,
        from: ElectionState,
        to: ElectionState,
    },
    RegistrationSubmitted {
        election: ElectionId,
        voter: Principal,
        status: RegistrationStatus,
    },
    RegistrationStatusChanged {
        election: ElectionId,
        voter: Principal,
        status: RegistrationStatus,
    },
    /// Deliberately omits the candidate: observers learn that a vote
    /// happened, not what it was.
    VoteCast {
        election: ElectionId,
        voter: Principal,
    },
    ElectionFinalized {
        election: ElectionId,
        winner: Option<CandidateId>,
    },
}

/// An event with its position in the journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Monotonic sequence number, starting at 0.
    pub seq: u64,
    /// What happened.
    pub event: Event,
}
