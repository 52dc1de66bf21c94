use log::info;

use crate::error::{Error, Result};
use crate::model::access::Principal;
use crate::model::election::{CandidateId, ElectionId, ElectionState};
use crate::model::event::Event;

use super::Engine;

impl Engine {
    /// Seal an ended election: compute the winner, move to `Finalized` and
    /// report the result. The winner is the candidate with the strictly
    /// greatest tally, lowest ID first on exact ties; an election with no
    /// votes finalizes successfully with no winner. One-way door: a second
    /// call fails with `AlreadyFinalized`.
    pub fn finalize_election(
        &mut self,
        caller: &Principal,
        id: ElectionId,
    ) -> Result<Option<CandidateId>> {
        let election = self.election(id)?;
        self.require_manager(election, caller)?;
        match election.metadata.state {
            ElectionState::Finalized => return Err(Error::AlreadyFinalized(id)),
            ElectionState::Ended => {}
            state => {
                return Err(Error::InvalidState(format!(
                    "election {id} is {state}, not ended"
                )))
            }
        }

        let winner = election.compute_winner();
        let election = self.election_mut(id)?;
        election.metadata.state = ElectionState::Finalized;
        election.set_winner(winner);
        match winner {
            Some(candidate) => info!("election {id} finalized, winner is candidate {candidate}"),
            None => info!("election {id} finalized with no votes cast"),
        }
        self.emit(Event::ElectionFinalized {
            election: id,
            winner,
        });
        Ok(winner)
    }
}
