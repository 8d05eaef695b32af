//! Admin session gate.
//!
//! # Responsibility
//! - Check admin credentials and hand out session tokens.
//! - Answer whether a session may write content or upload files.
//!
//! # Invariants
//! - Deny by default: no session, or a revoked one, is never authorized.
//! - Tokens are random (uuid v4) and never reused.

use log::{info, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Mutex;
use uuid::Uuid;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    InvalidCredentials,
    /// No admin account is configured; sign-in is disabled.
    NotConfigured,
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "invalid email or password"),
            Self::NotConfigured => write!(f, "admin sign-in is not configured"),
        }
    }
}

impl Error for AuthError {}

/// Live admin session handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: Uuid,
    pub email: String,
}

/// Single-account credential check plus the set of live sessions.
pub struct AdminAuth {
    email: String,
    password: String,
    sessions: Mutex<BTreeSet<Uuid>>,
}

impl AdminAuth {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_ascii_lowercase(),
            password: password.into(),
            sessions: Mutex::new(BTreeSet::new()),
        }
    }

    /// Validates credentials and opens a session.
    pub fn sign_in(&self, email: &str, password: &str) -> AuthResult<Session> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(AuthError::NotConfigured);
        }

        let email = email.trim().to_ascii_lowercase();
        let email_ok = constant_time_eq(email.as_bytes(), self.email.as_bytes());
        let password_ok = constant_time_eq(password.as_bytes(), self.password.as_bytes());
        if !(email_ok && password_ok) {
            warn!("event=auth_sign_in module=auth status=denied");
            return Err(AuthError::InvalidCredentials);
        }

        let token = Uuid::new_v4();
        self.lock_sessions().insert(token);
        info!("event=auth_sign_in module=auth status=ok");
        Ok(Session { token, email })
    }

    /// Revokes a session; unknown sessions are ignored.
    pub fn sign_out(&self, session: &Session) {
        if self.lock_sessions().remove(&session.token) {
            info!("event=auth_sign_out module=auth status=ok");
        }
    }

    pub fn is_authenticated(&self, session: Option<&Session>) -> bool {
        match session {
            Some(session) => self.lock_sessions().contains(&session.token),
            None => false,
        }
    }

    fn lock_sessions(&self) -> std::sync::MutexGuard<'_, BTreeSet<Uuid>> {
        // A poisoned set still holds valid tokens.
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    left.iter()
        .zip(right)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
