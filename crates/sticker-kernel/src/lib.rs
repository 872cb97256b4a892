//! `sticker-kernel` – Session & Authorization Gate
//!
//! Decides who may drive the robot. It never touches the robot itself.
//!
//! # Modules
//!
//! - [`credential`] – the single configured [`Credential`][credential::Credential],
//!   the [`CredentialStore`][credential::CredentialStore] seam it is read
//!   through, and the Argon2 [`HashCost`][credential::HashCost] knobs.
//! - [`session`] – [`SessionToken`][session::SessionToken]: the opaque value
//!   the browser carries in its `session` cookie.
//! - [`authenticator`] – [`Authenticator`][authenticator::Authenticator]:
//!   verifies a username/password pair, mints session tokens, and validates
//!   tokens presented on later requests.

pub mod authenticator;
pub mod credential;
pub mod session;

pub use authenticator::{AuthError, Authenticator};
pub use credential::{Credential, CredentialStore, HashCost, StaticCredentialStore};
pub use session::SessionToken;
