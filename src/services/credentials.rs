//! Credential verification seam.
//!
//! The login guard never sees passwords; it only learns whether the
//! authentication collaborator accepted them.

use std::{collections::HashMap, env};
use tracing::warn;

/// External authentication collaborator
pub trait CredentialVerifier: Send + Sync {
    /// Returns `true` if `secret` is the correct credential for `identifier`
    fn verify(&self, identifier: &str, secret: &str) -> bool;
}

/// In-memory credential table, for development and tests
#[derive(Clone, Debug, Default)]
pub struct StaticCredentialVerifier {
    users: HashMap<String, String>,
}

impl StaticCredentialVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a user
    pub fn with_user(mut self, identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        self.users.insert(identifier.into(), secret.into());
        self
    }

    /// Parse `id:secret,id2:secret2`. Malformed entries are skipped.
    pub fn parse(users: &str) -> Self {
        let mut verifier = Self::new();
        for entry in users.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            match entry.split_once(':') {
                Some((id, secret)) if !id.trim().is_empty() => {
                    verifier = verifier.with_user(id.trim(), secret);
                }
                _ => warn!(entry, "Skipping malformed AUTH_USERS entry"),
            }
        }
        verifier
    }

    /// Load users from `AUTH_USERS`, defaulting to the `admin` demo account
    pub fn from_env() -> Self {
        env::var("AUTH_USERS")
            .map(|users| Self::parse(&users))
            .unwrap_or_else(|_| Self::new().with_user("admin", "password123"))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl CredentialVerifier for StaticCredentialVerifier {
    fn verify(&self, identifier: &str, secret: &str) -> bool {
        self.users
            .get(identifier)
            .is_some_and(|expected| expected == secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_known_user() {
        let verifier = StaticCredentialVerifier::new().with_user("alice@example.com", "hunter2");
        assert!(verifier.verify("alice@example.com", "hunter2"));
        assert!(!verifier.verify("alice@example.com", "wrong"));
        assert!(!verifier.verify("bob@example.com", "hunter2"));
    }

    #[test]
    fn test_parse_skips_malformed_entries() {
        let verifier = StaticCredentialVerifier::parse("a@x.org:one, b@x.org:two:three ,broken,:nope,");
        assert_eq!(verifier.len(), 2);
        assert!(verifier.verify("a@x.org", "one"));
        // Only the first colon separates identifier from secret.
        assert!(verifier.verify("b@x.org", "two:three"));
    }
}
