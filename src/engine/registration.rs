use chrono::{DateTime, Utc};
use log::info;

use crate::error::{Error, Result};
use crate::model::access::{AccessControl, Principal};
use crate::model::election::{Election, ElectionId, ElectionKind, ElectionState};
use crate::model::event::Event;
use crate::model::registration::{Registration, RegistrationDecision, RegistrationStatus};
use crate::model::ContentRef;

use super::Engine;

impl Engine {
    /// Apply to vote in an election. Open while the election is in
    /// registration, and additionally while voting is active for public
    /// elections. Public elections auto-approve; everything else waits for
    /// the election manager. Returns the resulting status.
    pub fn register(
        &mut self,
        voter: &Principal,
        id: ElectionId,
        verification: ContentRef,
        now: DateTime<Utc>,
    ) -> Result<RegistrationStatus> {
        let election = self.election(id)?;
        let metadata = &election.metadata;
        let window_open = metadata.state == ElectionState::Registration
            || (metadata.state == ElectionState::Active && metadata.kind == ElectionKind::Public);
        if !window_open {
            return Err(Error::InvalidState(format!(
                "election {id} is not accepting registrations"
            )));
        }
        match election.registration(voter).map(|existing| existing.status) {
            Some(RegistrationStatus::Pending) | Some(RegistrationStatus::Approved) => {
                return Err(Error::AlreadyRegistered(format!(
                    "{voter} already has a registration for election {id}"
                )))
            }
            Some(RegistrationStatus::Blacklisted) => {
                return Err(Error::NotEligible(format!(
                    "{voter} is blacklisted from election {id}"
                )))
            }
            // A rejected voter may apply again.
            Some(RegistrationStatus::Rejected) | None => {}
        }

        let status = if metadata.kind == ElectionKind::Public {
            RegistrationStatus::Approved
        } else {
            RegistrationStatus::Pending
        };
        self.election_mut(id)?
            .insert_registration(voter.clone(), Registration::new(status, now, verification));
        info!("election {id}: registration from {voter} is {status}");
        self.emit(Event::RegistrationSubmitted {
            election: id,
            voter: voter.clone(),
            status,
        });
        Ok(status)
    }

    /// Decide a single pending registration. Fails with `InvalidTransition`
    /// if the registration has already been decided.
    pub fn update_registration(
        &mut self,
        caller: &Principal,
        id: ElectionId,
        voter: &Principal,
        decision: RegistrationDecision,
    ) -> Result<()> {
        let election = self.election(id)?;
        self.require_manager(election, caller)?;

        let Self {
            access, elections, ..
        } = self;
        let election = elections
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("no election with ID {id}")))?;
        Self::decide_registration(access, election, voter, decision, caller)?;

        let status: RegistrationStatus = decision.into();
        info!("election {id}: registration from {voter} is now {status}");
        self.emit(Event::RegistrationStatusChanged {
            election: id,
            voter: voter.clone(),
            status,
        });
        Ok(())
    }

    /// Decide many registrations at once, best-effort: entries that are not
    /// currently pending (or that fail the membership rule for organization
    /// elections) are silently skipped rather than failing the batch.
    /// Returns how many entries were applied.
    pub fn bulk_update_registrations(
        &mut self,
        caller: &Principal,
        id: ElectionId,
        voters: &[Principal],
        decision: RegistrationDecision,
    ) -> Result<usize> {
        let election = self.election(id)?;
        self.require_manager(election, caller)?;

        let mut applied = Vec::new();
        {
            let Self {
                access, elections, ..
            } = self;
            let election = elections
                .get_mut(&id)
                .ok_or_else(|| Error::NotFound(format!("no election with ID {id}")))?;
            for voter in voters {
                if Self::decide_registration(access, election, voter, decision, caller).is_ok() {
                    applied.push(voter.clone());
                }
            }
        }

        let status: RegistrationStatus = decision.into();
        let count = applied.len();
        for voter in applied {
            self.emit(Event::RegistrationStatusChanged {
                election: id,
                voter,
                status,
            });
        }
        info!("election {id}: bulk decision {status} applied to {count} registrations");
        Ok(count)
    }

    /// The shared per-entry rule: only pending registrations can be
    /// decided, and approval on an organization election requires the voter
    /// to be a member of the owning organization.
    fn decide_registration(
        access: &AccessControl,
        election: &mut Election,
        voter: &Principal,
        decision: RegistrationDecision,
        caller: &Principal,
    ) -> Result<()> {
        match election.registration(voter).map(|existing| existing.status) {
            None => {
                return Err(Error::NotFound(format!(
                    "no registration from {voter} for election {}",
                    election.id
                )))
            }
            Some(RegistrationStatus::Pending) => {}
            Some(status) => {
                return Err(Error::InvalidTransition(format!(
                    "registration from {voter} is {status}, not pending"
                )))
            }
        }
        if decision == RegistrationDecision::Approved
            && election.metadata.kind == ElectionKind::Organization
        {
            let member = election
                .metadata
                .organization
                .as_deref()
                .map_or(false, |organization| access.is_member(organization, voter));
            if !member {
                return Err(Error::NotEligible(format!(
                    "{voter} is not a member of the owning organization"
                )));
            }
        }
        if let Some(registration) = election.registration_mut(voter) {
            registration.status = decision.into();
            registration.decided_by = Some(caller.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::super::testing::*;
    use super::*;
    use crate::model::election::ElectionSpec;

    /// A private election in its registration stage, plus the logical time
    /// it entered it.
    fn private_in_registration(engine: &mut Engine) -> (ElectionId, DateTime<Utc>) {
        let id = create_with_candidates(engine, ElectionSpec::example());
        let registration_start = engine.election(id).unwrap().metadata.registration_start;
        engine
            .advance_election(&admin(), id, ElectionState::Registration, registration_start)
            .unwrap();
        (id, registration_start)
    }

    #[test]
    fn draft_elections_do_not_accept_registrations() {
        let mut engine = engine();
        let id = create_with_candidates(&mut engine, ElectionSpec::example());
        let now = engine.election(id).unwrap().metadata.registration_start;

        let err = engine
            .register(&Principal::from("alice"), id, "content:docs".to_string(), now)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }

    #[test]
    fn private_registrations_start_pending() {
        let mut engine = engine();
        let (id, now) = private_in_registration(&mut engine);
        let alice = Principal::from("alice");

        let status = engine
            .register(&alice, id, "content:docs".to_string(), now)
            .unwrap();
        assert_eq!(status, RegistrationStatus::Pending);

        let registration = engine.registration(id, &alice).unwrap().unwrap();
        assert_eq!(registration.status, RegistrationStatus::Pending);
        assert_eq!(registration.registered_at, now);
        assert_eq!(registration.decided_by, None);
    }

    #[test]
    fn public_registrations_are_auto_approved() {
        let mut engine = engine();
        let id = create_with_candidates(&mut engine, ElectionSpec::public_example());
        let now = engine.election(id).unwrap().metadata.registration_start;
        engine
            .advance_election(&admin(), id, ElectionState::Registration, now)
            .unwrap();

        let status = engine
            .register(&Principal::from("alice"), id, "content:docs".to_string(), now)
            .unwrap();
        assert_eq!(status, RegistrationStatus::Approved);
    }

    #[test]
    fn late_registration_is_public_only() {
        let mut engine = engine();
        let public = create_with_candidates(&mut engine, ElectionSpec::public_example());
        let private = create_with_candidates(&mut engine, ElectionSpec::example());
        let public_now = open_voting(&mut engine, public);
        let private_now = open_voting(&mut engine, private);
        let alice = Principal::from("alice");

        let status = engine
            .register(&alice, public, "content:docs".to_string(), public_now)
            .unwrap();
        assert_eq!(status, RegistrationStatus::Approved);

        let err = engine
            .register(&alice, private, "content:docs".to_string(), private_now)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }

    #[test]
    fn pending_and_approved_cannot_reapply() {
        let mut engine = engine();
        let (id, now) = private_in_registration(&mut engine);
        let alice = Principal::from("alice");

        engine
            .register(&alice, id, "content:docs".to_string(), now)
            .unwrap();
        let err = engine
            .register(&alice, id, "content:docs".to_string(), now)
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyRegistered(_)));

        engine
            .update_registration(&admin(), id, &alice, RegistrationDecision::Approved)
            .unwrap();
        let err = engine
            .register(&alice, id, "content:docs".to_string(), now)
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyRegistered(_)));
    }

    #[test]
    fn rejected_voters_may_reapply() {
        let mut engine = engine();
        let (id, now) = private_in_registration(&mut engine);
        let alice = Principal::from("alice");

        engine
            .register(&alice, id, "content:docs".to_string(), now)
            .unwrap();
        engine
            .update_registration(&admin(), id, &alice, RegistrationDecision::Rejected)
            .unwrap();

        let later = now + Duration::seconds(2);
        let status = engine
            .register(&alice, id, "content:better-docs".to_string(), later)
            .unwrap();
        assert_eq!(status, RegistrationStatus::Pending);
        let registration = engine.registration(id, &alice).unwrap().unwrap();
        assert_eq!(registration.registered_at, later);
        assert_eq!(registration.verification, "content:better-docs");
    }

    #[test]
    fn blacklisted_voters_may_never_reapply() {
        let mut engine = engine();
        let (id, now) = private_in_registration(&mut engine);
        let alice = Principal::from("alice");

        engine
            .register(&alice, id, "content:docs".to_string(), now)
            .unwrap();
        engine
            .update_registration(&admin(), id, &alice, RegistrationDecision::Blacklisted)
            .unwrap();

        let err = engine
            .register(&alice, id, "content:docs".to_string(), now)
            .unwrap_err();
        assert!(matches!(err, Error::NotEligible(_)));
    }

    #[test]
    fn decisions_only_apply_to_pending_registrations() {
        let mut engine = engine();
        let (id, now) = private_in_registration(&mut engine);
        let alice = Principal::from("alice");

        let err = engine
            .update_registration(&admin(), id, &alice, RegistrationDecision::Approved)
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        engine
            .register(&alice, id, "content:docs".to_string(), now)
            .unwrap();
        engine
            .update_registration(&admin(), id, &alice, RegistrationDecision::Approved)
            .unwrap();

        let err = engine
            .update_registration(&admin(), id, &alice, RegistrationDecision::Rejected)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTransition(_)));

        let registration = engine.registration(id, &alice).unwrap().unwrap();
        assert_eq!(registration.status, RegistrationStatus::Approved);
        assert_eq!(registration.decided_by, Some(admin()));
    }

    #[test]
    fn decisions_are_manager_only() {
        let mut engine = engine();
        let (id, now) = private_in_registration(&mut engine);
        let alice = Principal::from("alice");
        engine
            .register(&alice, id, "content:docs".to_string(), now)
            .unwrap();

        let err = engine
            .update_registration(&alice, id, &alice, RegistrationDecision::Approved)
            .unwrap_err();
        assert!(matches!(err, Error::PermissionDenied(_)));
    }

    #[test]
    fn organization_approval_requires_membership() {
        let mut engine = engine();
        engine
            .create_organization(&root(), "acme".to_string(), "ACME Cooperative".to_string())
            .unwrap();
        let id = create_with_candidates(&mut engine, ElectionSpec::organization_example("acme"));
        let now = engine.election(id).unwrap().metadata.registration_start;
        engine
            .advance_election(&admin(), id, ElectionState::Registration, now)
            .unwrap();
        let bob = Principal::from("bob");
        engine
            .register(&bob, id, "content:docs".to_string(), now)
            .unwrap();

        let err = engine
            .update_registration(&admin(), id, &bob, RegistrationDecision::Approved)
            .unwrap_err();
        assert!(matches!(err, Error::NotEligible(_)));

        engine
            .add_organization_member(&root(), "acme", bob.clone())
            .unwrap();
        engine
            .update_registration(&admin(), id, &bob, RegistrationDecision::Approved)
            .unwrap();
    }

    #[test]
    fn bulk_decisions_skip_settled_entries() {
        let mut engine = engine();
        let (id, now) = private_in_registration(&mut engine);
        let alice = Principal::from("alice");
        let bob = Principal::from("bob");
        let carol = Principal::from("carol");

        engine
            .register(&alice, id, "content:docs".to_string(), now)
            .unwrap();
        engine
            .register(&bob, id, "content:docs".to_string(), now)
            .unwrap();
        engine
            .update_registration(&admin(), id, &alice, RegistrationDecision::Approved)
            .unwrap();

        // alice is settled and carol never registered; only bob applies.
        let applied = engine
            .bulk_update_registrations(
                &admin(),
                id,
                &[alice.clone(), bob.clone(), carol],
                RegistrationDecision::Approved,
            )
            .unwrap();
        assert_eq!(applied, 1);
        assert_eq!(
            engine.registration(id, &bob).unwrap().unwrap().status,
            RegistrationStatus::Approved
        );
        assert_eq!(
            engine.registration(id, &alice).unwrap().unwrap().status,
            RegistrationStatus::Approved
        );
    }
}
