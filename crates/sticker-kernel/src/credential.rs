//! The single operator [`Credential`] and the store it is read from.
//!
//! Passwords are never held in plaintext: a [`Credential`] stores the Argon2id
//! PHC string of the configured password.  How expensive each hash is can be
//! tuned through [`HashCost`].

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::authenticator::AuthError;

/// Argon2id cost parameters.
///
/// Raising any of these makes every login (and every brute-force guess)
/// slower.  The defaults are the Argon2 crate's recommended values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashCost {
    /// Memory per hash, in KiB.
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    /// Number of passes over memory.
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Degree of parallelism (lanes).
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

fn default_memory_kib() -> u32 {
    Params::DEFAULT_M_COST
}
fn default_iterations() -> u32 {
    Params::DEFAULT_T_COST
}
fn default_parallelism() -> u32 {
    Params::DEFAULT_P_COST
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

impl HashCost {
    /// The cheapest parameters Argon2 accepts.  Only suitable for tests.
    pub fn minimal() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST,
            iterations: Params::MIN_T_COST,
            parallelism: Params::MIN_P_COST,
        }
    }

    /// Build an Argon2id hasher with these parameters.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::HashFailure`] when the parameters are out of the
    /// range Argon2 accepts (e.g. less than 8 KiB of memory per lane).
    pub fn hasher(&self) -> Result<Argon2<'static>, AuthError> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| AuthError::HashFailure(format!("invalid hash cost: {e}")))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Hash `secret` under a fresh random salt and return the PHC string.
    pub fn hash(&self, secret: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .hasher()?
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| AuthError::HashFailure(e.to_string()))?;
        Ok(hash.to_string())
    }
}

/// A username plus the Argon2 hash of its password.  Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    username: String,
    password_hash: String,
}

impl Credential {
    /// Hash `password` with `cost` and pair it with `username`.
    pub fn from_password(
        username: impl Into<String>,
        password: &str,
        cost: &HashCost,
    ) -> Result<Self, AuthError> {
        Ok(Self {
            username: username.into(),
            password_hash: cost.hash(password)?,
        })
    }

    /// Use a pre-computed PHC string (e.g. from the config file).
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::HashFailure`] if `phc` is not a valid PHC string.
    pub fn from_phc(username: impl Into<String>, phc: impl Into<String>) -> Result<Self, AuthError> {
        let password_hash = phc.into();
        PasswordHash::new(&password_hash)
            .map_err(|e| AuthError::HashFailure(format!("malformed password hash: {e}")))?;
        Ok(Self {
            username: username.into(),
            password_hash,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Check `password` against the stored hash.
    ///
    /// The parameters encoded in the PHC string are used, so a credential
    /// hashed under one [`HashCost`] still verifies after the cost changes.
    pub fn verify_password(&self, password: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(&self.password_hash)
            .map_err(|e| AuthError::HashFailure(format!("malformed password hash: {e}")))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::HashFailure(e.to_string())),
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Where the [`Authenticator`][crate::Authenticator] reads the operator
/// credential from.
pub trait CredentialStore: Send + Sync {
    /// The one credential allowed to log in.
    fn credential(&self) -> &Credential;
}

/// A store holding exactly one credential fixed at construction time.
#[derive(Debug, Clone)]
pub struct StaticCredentialStore {
    credential: Credential,
}

impl StaticCredentialStore {
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }
}

impl CredentialStore for StaticCredentialStore {
    fn credential(&self) -> &Credential {
        &self.credential
    }
}
