mod base;
mod metadata;
mod results;
mod spec;
mod state;

pub use base::{Candidate, Election};
pub use metadata::{ElectionKind, ElectionMetadata};
pub use results::ElectionResults;
pub use spec::ElectionSpec;
pub use state::ElectionState;

/// Our election IDs are integers, assigned sequentially from 1 and never
/// reused.
pub type ElectionId = u32;
/// Our candidate IDs are integers, sequential from 1 within an election.
pub type CandidateId = u32;
