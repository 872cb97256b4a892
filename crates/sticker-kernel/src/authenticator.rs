//! [`Authenticator`] – verifies the operator's login and vouches for sessions.
//!
//! Login checks the submitted username and password against the configured
//! [`Credential`][crate::Credential]; on success a fresh salted Argon2 hash of
//! the password is minted and handed back as a [`SessionToken`].
//!
//! # Session validation
//!
//! [`Authenticator::validate`] accepts any non-empty token.  It does **not**
//! re-verify the token against the stored credential, so a client that sets
//! its own non-empty `session` cookie is treated as logged in.  This is a
//! known gap kept for compatibility with existing clients.
//!
//! # Example
//!
//! ```
//! use sticker_kernel::{Authenticator, Credential, HashCost, StaticCredentialStore};
//!
//! let cost = HashCost::minimal();
//! let credential = Credential::from_password("hello", "world", &cost).unwrap();
//! let auth = Authenticator::new(StaticCredentialStore::new(credential), cost);
//!
//! let token = auth.authenticate("hello", "world").unwrap();
//! assert!(auth.validate(&token));
//! assert!(auth.authenticate("hello", "wrong").is_err());
//! ```

use thiserror::Error;
use tracing::{debug, warn};

use crate::credential::{CredentialStore, HashCost, StaticCredentialStore};
use crate::session::SessionToken;

/// Why a login attempt did not produce a [`SessionToken`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("password hashing failed: {0}")]
    HashFailure(String),
}

/// Verifies logins against a [`CredentialStore`] and mints session tokens.
pub struct Authenticator<S = StaticCredentialStore> {
    store: S,
    cost: HashCost,
}

impl<S: CredentialStore> Authenticator<S> {
    /// `cost` applies to newly minted session tokens; the stored credential
    /// keeps whatever parameters it was hashed with.
    pub fn new(store: S, cost: HashCost) -> Self {
        Self { store, cost }
    }

    /// Check `username`/`password` and, on success, mint a session token.
    ///
    /// Both the username and the password are always checked so the time
    /// taken does not reveal which one was wrong.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidCredentials`] – either value does not match.
    /// - [`AuthError::HashFailure`] – verifying or minting the hash failed.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<SessionToken, AuthError> {
        let credential = self.store.credential();

        let username_ok = constant_time_eq(username.as_bytes(), credential.username().as_bytes());
        let password_ok = credential.verify_password(password)?;

        if !(username_ok & password_ok) {
            warn!(username, "login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.mint(password)?;
        debug!(username, "login accepted, session minted");
        Ok(token)
    }

    /// `true` when `token` is non-empty.  See the module docs for why this is
    /// weaker than it looks.
    pub fn validate(&self, token: &SessionToken) -> bool {
        !token.is_empty()
    }

    fn mint(&self, password: &str) -> Result<SessionToken, AuthError> {
        let hash = self.cost.hash(password).inspect_err(|e| {
            warn!(error = %e, "failed to mint session token");
        })?;
        Ok(SessionToken::new(hash))
    }
}

/// Constant-time byte comparison to prevent timing side-channel attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (&x, &y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
