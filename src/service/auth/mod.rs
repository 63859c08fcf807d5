//! Authorization: who may drive the wizard.
//!
//! The check runs before any token decode or state transition; an
//! unauthorized event is rejected outright with no other effect.

use std::{collections::HashSet, ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::{config::Config, types::SubmitterIdentity};

// Traits.

/// Generic role-membership check that auth backends must implement.
#[async_trait]
pub trait GenericAuthClient: Send + Sync + 'static {
    /// Whether this user may use the wizard at all.
    async fn is_authorized(&self, submitter: &SubmitterIdentity) -> bool;
}

// Structs.

/// Authorization client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed
/// around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct AuthClient {
    inner: Arc<dyn GenericAuthClient>,
}

impl Deref for AuthClient {
    type Target = dyn GenericAuthClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl AuthClient {
    pub fn new(inner: Arc<dyn GenericAuthClient>) -> Self {
        Self { inner }
    }

    /// Creates the static allow-list client from configuration.
    pub fn role_allow_list(config: &Config) -> Self {
        Self::new(Arc::new(RoleAllowListClient {
            allowed: config.allowed_role_ids.iter().cloned().collect(),
        }))
    }
}

/// Allow-list implementation: authorized iff the user holds at least
/// one configured role.
struct RoleAllowListClient {
    allowed: HashSet<String>,
}

#[async_trait]
impl GenericAuthClient for RoleAllowListClient {
    async fn is_authorized(&self, submitter: &SubmitterIdentity) -> bool {
        submitter.role_ids.iter().any(|r| self.allowed.contains(r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submitter(roles: &[&str]) -> SubmitterIdentity {
        SubmitterIdentity {
            id: "1".to_string(),
            tag: "user#0001".to_string(),
            role_ids: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn authorizes_on_any_matching_role() {
        let client = RoleAllowListClient {
            allowed: ["10".to_string(), "20".to_string()].into_iter().collect(),
        };
        assert!(client.is_authorized(&submitter(&["99", "20"])).await);
    }

    #[tokio::test]
    async fn rejects_without_a_matching_role() {
        let client = RoleAllowListClient {
            allowed: ["10".to_string()].into_iter().collect(),
        };
        assert!(!client.is_authorized(&submitter(&["99"])).await);
        assert!(!client.is_authorized(&submitter(&[])).await);
    }
}
