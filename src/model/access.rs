use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An opaque caller identity. The engine never interprets principals; it
/// only compares them and feeds them into receipt digests.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Byte view, used when deriving receipt digests.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl Display for Principal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Principal {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Grantable roles. These are additive capability sets, not a hierarchy: a
/// principal's effective permissions are the union of its granted roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    SuperAdmin,
    ElectionAdmin,
    Auditor,
    Voter,
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::SuperAdmin => "super-admin",
                Self::ElectionAdmin => "election-admin",
                Self::Auditor => "auditor",
                Self::Voter => "voter",
            }
        )
    }
}

/// Organization IDs are opaque, caller-assigned strings.
pub type OrganizationId = String;

/// A registered organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Organization name.
    pub name: String,
    /// Principals whose registrations may be approved on this
    /// organization's elections.
    pub members: BTreeSet<Principal>,
}

impl Organization {
    pub fn new(name: String) -> Self {
        Self {
            name,
            members: BTreeSet::new(),
        }
    }
}

/// Role grants and the organization registry. Constructed with the engine
/// and consulted by every operation; never ambient state, so tests can
/// build isolated instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
    grants: BTreeMap<Principal, BTreeSet<Role>>,
    organizations: BTreeMap<OrganizationId, Organization>,
}

impl AccessControl {
    /// Create an access control whose `root` principal holds super-admin.
    pub fn new(root: Principal) -> Self {
        let mut grants = BTreeMap::new();
        grants.insert(root, BTreeSet::from([Role::SuperAdmin]));
        Self {
            grants,
            organizations: BTreeMap::new(),
        }
    }

    /// Does the principal hold the role? Side-effect-free.
    pub fn has_role(&self, role: Role, principal: &Principal) -> bool {
        self.grants
            .get(principal)
            .map_or(false, |roles| roles.contains(&role))
    }

    /// Grant a role. Returns whether anything changed; re-grants are no-ops.
    pub fn grant(&mut self, role: Role, principal: Principal) -> bool {
        self.grants.entry(principal).or_default().insert(role)
    }

    /// Revoke a role. Returns whether anything changed; revoking an unheld
    /// role is a no-op.
    pub fn revoke(&mut self, role: Role, principal: &Principal) -> bool {
        self.grants
            .get_mut(principal)
            .map_or(false, |roles| roles.remove(&role))
    }

    /// Fail unless the caller is a super-admin.
    pub fn require_super_admin(&self, caller: &Principal) -> Result<()> {
        if self.has_role(Role::SuperAdmin, caller) {
            Ok(())
        } else {
            Err(Error::PermissionDenied(format!(
                "{caller} is not a super-admin"
            )))
        }
    }

    /// Fail unless the caller may create elections.
    pub fn require_election_admin(&self, caller: &Principal) -> Result<()> {
        if self.has_role(Role::ElectionAdmin, caller) || self.has_role(Role::SuperAdmin, caller) {
            Ok(())
        } else {
            Err(Error::PermissionDenied(format!(
                "{caller} is not an election admin"
            )))
        }
    }

    /// Look up an organization.
    pub fn organization(&self, id: &str) -> Option<&Organization> {
        self.organizations.get(id)
    }

    /// Register an organization. The id must not be taken.
    pub fn insert_organization(&mut self, id: OrganizationId, name: String) -> Result<()> {
        if self.organizations.contains_key(&id) {
            return Err(Error::AlreadyExists(format!(
                "an organization with ID {id} is already registered"
            )));
        }
        self.organizations.insert(id, Organization::new(name));
        Ok(())
    }

    /// Add a member to an organization. Returns whether anything changed;
    /// re-adding a member is a no-op.
    pub fn add_member(&mut self, id: &str, member: Principal) -> Result<bool> {
        let organization = self
            .organizations
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(format!("no organization with ID {id}")))?;
        Ok(organization.members.insert(member))
    }

    /// Is the principal a member of the organization?
    pub fn is_member(&self, id: &str, principal: &Principal) -> bool {
        self.organizations
            .get(id)
            .map_or(false, |organization| organization.members.contains(principal))
    }
}
