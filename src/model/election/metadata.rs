use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::access::{OrganizationId, Principal};
use crate::model::ContentRef;

use super::state::ElectionState;

/// How eligibility works for an election.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElectionKind {
    /// Anyone may vote; registrations are auto-approved and stay open
    /// while voting is in progress.
    Public,
    /// Only voters approved by the election manager may vote.
    Private,
    /// Approval is restricted to members of the owning organization.
    Organization,
}

/// A view on just the election's top-level metadata. The three timing
/// fields are fixed at creation and never mutated afterwards.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ElectionMetadata {
    /// Election title.
    pub title: String,
    /// Reference to the full description in external content storage.
    pub description: ContentRef,
    /// Eligibility model.
    pub kind: ElectionKind,
    /// Election state.
    pub state: ElectionState,
    /// When voter registration opens.
    pub registration_start: DateTime<Utc>,
    /// When voting opens.
    pub voting_start: DateTime<Utc>,
    /// When voting closes.
    pub voting_end: DateTime<Utc>,
    /// The admin who created the election and manages it.
    pub admin: Principal,
    /// The owning organization, present exactly for
    /// [`ElectionKind::Organization`] elections.
    pub organization: Option<OrganizationId>,
    /// Reference to additional metadata in external content storage.
    pub extra: ContentRef,
}
