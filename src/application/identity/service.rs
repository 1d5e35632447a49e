//! Credential checks against the configured user table

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::config::UserConfig;
use crate::domain::{DomainError, DomainResult, User};
use crate::infrastructure::crypto::password::{hash_password, verify_password};

/// Fixed user table, keyed by username.
#[derive(Debug, Clone, Default)]
pub struct IdentityService {
    users: HashMap<String, User>,
}

impl IdentityService {
    pub fn new(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: users
                .into_iter()
                .map(|u| (u.username.clone(), u))
                .collect(),
        }
    }

    /// Build from config entries, hashing plain-text passwords with `cost`.
    pub fn from_config(entries: &[UserConfig], cost: u32) -> DomainResult<Self> {
        let mut users = Vec::with_capacity(entries.len());

        for entry in entries {
            let password_hash = match (&entry.password_hash, &entry.password) {
                (Some(hash), _) => hash.clone(),
                (None, Some(plain)) => hash_password(plain, cost).map_err(|e| {
                    DomainError::Validation(format!("Failed to hash password: {}", e))
                })?,
                (None, None) => {
                    return Err(DomainError::Validation(format!(
                        "User '{}' has no credentials",
                        entry.username
                    )))
                }
            };

            users.push(User {
                username: entry.username.clone(),
                password_hash,
                role: entry.role,
            });
        }

        debug!(count = users.len(), "User table loaded");
        Ok(Self::new(users))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn get(&self, username: &str) -> Option<&User> {
        self.users.get(username)
    }

    /// Check a username / password pair.
    pub fn authenticate(&self, username: &str, password: &str) -> DomainResult<User> {
        let Some(user) = self.users.get(username) else {
            warn!(username, "Login failed: unknown user");
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            warn!(username, "Login failed: wrong password");
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        info!(username, role = %user.role, "User logged in");
        Ok(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;

    fn entries() -> Vec<UserConfig> {
        vec![
            UserConfig {
                username: "admin".into(),
                password: Some("1234".into()),
                password_hash: None,
                role: UserRole::Staff,
            },
            UserConfig {
                username: "user".into(),
                password: None,
                password_hash: Some(hash_password("pass", 4).unwrap()),
                role: UserRole::Customer,
            },
        ]
    }

    #[test]
    fn valid_credentials_authenticate() {
        let identity = IdentityService::from_config(&entries(), 4).unwrap();
        assert_eq!(identity.len(), 2);

        let admin = identity.authenticate("admin", "1234").unwrap();
        assert_eq!(admin.role, UserRole::Staff);

        let user = identity.authenticate("user", "pass").unwrap();
        assert_eq!(user.role, UserRole::Customer);
    }

    #[test]
    fn wrong_password_is_unauthorized() {
        let identity = IdentityService::from_config(&entries(), 4).unwrap();
        let err = identity.authenticate("admin", "wrong").unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[test]
    fn unknown_user_is_unauthorized() {
        let identity = IdentityService::from_config(&entries(), 4).unwrap();
        let err = identity.authenticate("ghost", "1234").unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[test]
    fn usernames_are_case_sensitive() {
        let identity = IdentityService::from_config(&entries(), 4).unwrap();
        assert!(identity.authenticate("Admin", "1234").is_err());
    }

    #[test]
    fn plain_passwords_are_not_stored() {
        let identity = IdentityService::from_config(&entries(), 4).unwrap();
        let admin = identity.get("admin").unwrap();
        assert_ne!(admin.password_hash, "1234");
    }

    #[test]
    fn entry_without_credentials_is_rejected() {
        let entries = vec![UserConfig {
            username: "x".into(),
            password: None,
            password_hash: None,
            role: UserRole::Customer,
        }];
        assert!(IdentityService::from_config(&entries, 4).is_err());
    }
}
