//! Shared-password checks behind `login` and `verifyAdmin`.
//!
//! These are plain equality checks against configured secrets. There are no
//! sessions: the client keeps its own logged-in state.

use crate::config::AuthConfig;

#[derive(Clone)]
pub struct CredentialVerifier {
    login_password: Option<String>,
    admin_password: Option<String>,
}

impl CredentialVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let verifier = Self {
            login_password: config.login_password.clone().filter(|p| !p.is_empty()),
            admin_password: config.admin_password.clone().filter(|p| !p.is_empty()),
        };
        if verifier.login_password.is_none() {
            tracing::warn!("`auth.login_password` is not set; every login will be rejected");
        }
        if verifier.admin_password.is_none() {
            tracing::warn!("`auth.admin_password` is not set; admin verification will always fail");
        }
        verifier
    }

    pub fn verify_login(&self, provided: &str) -> bool {
        matches_secret(self.login_password.as_deref(), provided)
    }

    pub fn verify_admin(&self, provided: &str) -> bool {
        matches_secret(self.admin_password.as_deref(), provided)
    }
}

fn matches_secret(expected: Option<&str>, provided: &str) -> bool {
    let Some(expected) = expected else {
        return false;
    };
    constant_time_eq(expected.as_bytes(), provided.as_bytes())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for i in 0..a.len() {
        diff |= a[i] ^ b[i];
    }
    diff == 0
}
