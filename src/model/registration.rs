use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::access::Principal;
use crate::model::ContentRef;

/// Lifecycle of a voter registration. An unregistered (election, voter)
/// pair has no stored entry at all rather than an explicit "none" status.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationStatus {
    /// Awaiting a decision from the election manager.
    Pending,
    /// May vote.
    Approved,
    /// Turned down; the voter may apply again.
    Rejected,
    /// Permanently barred from this election.
    Blacklisted,
}

impl Display for RegistrationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Pending => "pending",
                Self::Approved => "approved",
                Self::Rejected => "rejected",
                Self::Blacklisted => "blacklisted",
            }
        )
    }
}

/// The decisions an election manager may take on a pending registration.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationDecision {
    Approved,
    Rejected,
    Blacklisted,
}

impl From<RegistrationDecision> for RegistrationStatus {
    fn from(decision: RegistrationDecision) -> Self {
        match decision {
            RegistrationDecision::Approved => Self::Approved,
            RegistrationDecision::Rejected => Self::Rejected,
            RegistrationDecision::Blacklisted => Self::Blacklisted,
        }
    }
}

/// A voter's application to vote in one election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Current status.
    pub status: RegistrationStatus,
    /// When the application was submitted (logical time).
    pub registered_at: DateTime<Utc>,
    /// Who decided the application; `None` while pending or when a public
    /// election auto-approved it.
    pub decided_by: Option<Principal>,
    /// Reference to verification documents in external content storage.
    pub verification: ContentRef,
}

impl Registration {
    /// A fresh application with no decision recorded yet.
    pub fn new(
        status: RegistrationStatus,
        registered_at: DateTime<Utc>,
        verification: ContentRef,
    ) -> Self {
        Self {
            status,
            registered_at,
            decided_by: None,
            verification,
        }
    }
}
