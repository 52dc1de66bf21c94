use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{CandidateId, ElectionId};

/// A point-in-time view of an election's tallies, suitable for handing to
/// observers while voting is still in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionResults {
    /// Which election this snapshot describes.
    pub election: ElectionId,
    /// Votes per candidate, keyed by candidate ID.
    pub tallies: BTreeMap<CandidateId, u64>,
    /// Total votes cast; always equals the sum of `tallies`.
    pub total_votes: u64,
    /// The winning candidate, present once the election is finalized.
    pub winner: Option<CandidateId>,
}
