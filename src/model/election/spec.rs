use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::access::{OrganizationId, Principal};
use crate::model::ContentRef;

use super::metadata::{ElectionKind, ElectionMetadata};
use super::state::ElectionState;
use super::{base::Election, ElectionId};

/// An election specification, as submitted by an election admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectionSpec {
    /// Election title.
    pub title: String,
    /// Reference to the full description in external content storage.
    pub description: ContentRef,
    /// Eligibility model.
    pub kind: ElectionKind,
    /// When voter registration opens.
    pub registration_start: DateTime<Utc>,
    /// When voting opens.
    pub voting_start: DateTime<Utc>,
    /// When voting closes.
    pub voting_end: DateTime<Utc>,
    /// Owning organization; required exactly when `kind` is
    /// [`ElectionKind::Organization`].
    pub organization: Option<OrganizationId>,
    /// Reference to additional metadata in external content storage.
    pub extra: ContentRef,
}

impl ElectionSpec {
    /// Convert this spec into a draft election with the given unique ID,
    /// owned by the admin who submitted it.
    pub fn into_election(self, id: ElectionId, admin: Principal) -> Election {
        Election::new(
            id,
            ElectionMetadata {
                title: self.title,
                description: self.description,
                kind: self.kind,
                state: ElectionState::Draft,
                registration_start: self.registration_start,
                voting_start: self.voting_start,
                voting_end: self.voting_end,
                admin,
                organization: self.organization,
                extra: self.extra,
            },
        )
    }
}
