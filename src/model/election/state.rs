use std::fmt::{Display, Formatter};

use serde_repr::{Deserialize_repr, Serialize_repr};

/// States in the election lifecycle. The ordinal encoding is meaningful:
/// elections only ever move to a strictly greater state, one stage at a
/// time, and `Finalized` is terminal.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize_repr, Deserialize_repr,
)]
#[repr(u8)]
pub enum ElectionState {
    /// Under construction: candidates may still change.
    Draft = 0,
    /// Accepting voter registrations.
    Registration = 1,
    /// Voting is open.
    Active = 2,
    /// Voting has closed, results not yet sealed.
    Ended = 3,
    /// Results are sealed.
    Finalized = 4,
}

impl Display for ElectionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Draft => "draft",
                Self::Registration => "registration",
                Self::Active => "active",
                Self::Ended => "ended",
                Self::Finalized => "finalized",
            }
        )
    }
}
