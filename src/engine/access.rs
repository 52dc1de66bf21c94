use log::info;

use crate::error::{Error, Result};
use crate::model::access::{OrganizationId, Principal, Role};
use crate::model::event::Event;

use super::Engine;

impl Engine {
    /// Grant a role to a principal. Idempotent: re-granting a held role
    /// succeeds without emitting anything.
    pub fn grant_role(&mut self, caller: &Principal, role: Role, principal: Principal) -> Result<()> {
        self.access.require_super_admin(caller)?;
        if self.access.grant(role, principal.clone()) {
            info!("role {role} granted to {principal}");
            self.emit(Event::RoleGranted { role, principal });
        }
        Ok(())
    }

    /// Revoke a role from a principal. Idempotent for unheld roles. A
    /// super-admin can never revoke its own super-admin role, so the engine
    /// always retains at least one.
    pub fn revoke_role(&mut self, caller: &Principal, role: Role, principal: &Principal) -> Result<()> {
        self.access.require_super_admin(caller)?;
        if role == Role::SuperAdmin && principal == caller {
            return Err(Error::PermissionDenied(
                "a super-admin cannot revoke its own super-admin role".to_string(),
            ));
        }
        if self.access.revoke(role, principal) {
            info!("role {role} revoked from {principal}");
            self.emit(Event::RoleRevoked {
                role,
                principal: principal.clone(),
            });
        }
        Ok(())
    }

    /// Register an organization under a caller-assigned ID.
    pub fn create_organization(
        &mut self,
        caller: &Principal,
        id: OrganizationId,
        name: String,
    ) -> Result<()> {
        self.access.require_super_admin(caller)?;
        self.access.insert_organization(id.clone(), name)?;
        info!("organization {id} registered");
        self.emit(Event::OrganizationCreated { organization: id });
        Ok(())
    }

    /// Add a member to an organization. Idempotent for existing members.
    pub fn add_organization_member(
        &mut self,
        caller: &Principal,
        id: &str,
        member: Principal,
    ) -> Result<()> {
        self.access.require_super_admin(caller)?;
        if self.access.add_member(id, member.clone())? {
            info!("{member} added to organization {id}");
            self.emit(Event::OrganizationMemberAdded {
                organization: id.to_string(),
                member,
            });
        }
        Ok(())
    }
}
