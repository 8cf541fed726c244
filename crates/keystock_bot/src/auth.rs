//! Role-based authorization.

use derive_getters::Getters;

/// Authorization level a command can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Role {
    /// Admins who upload stock and control the bot.
    #[display("issuer")]
    Issuer,
    /// Clients who draw keys from stock.
    #[display("consumer")]
    Consumer,
}

/// Platform role ids mapped to each [`Role`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleIds {
    /// Role id granting [`Role::Issuer`].
    pub issuer: u64,
    /// Role id granting [`Role::Consumer`].
    pub consumer: u64,
}

impl RoleIds {
    /// Platform role id for a role.
    pub fn id(&self, role: Role) -> u64 {
        match role {
            Role::Issuer => self.issuer,
            Role::Consumer => self.consumer,
        }
    }
}

/// Who sent a command and which roles they hold.
#[derive(Debug, Clone, Getters)]
pub struct Invocation {
    /// Display name of the author.
    author: String,
    /// Platform role ids held by the author in the guild.
    role_ids: Vec<u64>,
}

impl Invocation {
    /// Create an invocation for an author holding `role_ids`.
    pub fn new(author: impl Into<String>, role_ids: Vec<u64>) -> Self {
        Self {
            author: author.into(),
            role_ids,
        }
    }

    /// Whether the author holds the platform role mapped to `role`.
    pub fn has_role(&self, role: Role, ids: &RoleIds) -> bool {
        self.role_ids.contains(&ids.id(role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDS: RoleIds = RoleIds {
        issuer: 10,
        consumer: 20,
    };

    #[test]
    fn membership_is_checked_per_role() {
        let client = Invocation::new("client", vec![20, 99]);
        assert!(client.has_role(Role::Consumer, &IDS));
        assert!(!client.has_role(Role::Issuer, &IDS));
    }

    #[test]
    fn no_roles_grants_nothing() {
        let stranger = Invocation::new("stranger", Vec::new());
        assert!(!stranger.has_role(Role::Consumer, &IDS));
        assert!(!stranger.has_role(Role::Issuer, &IDS));
    }
}
