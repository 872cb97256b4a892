//! [`SessionToken`] – the opaque credential a browser carries after login.

/// Name of the cookie that carries the token.
pub const SESSION_COOKIE: &str = "session";

/// Opaque value proving that the client authenticated at some point.
///
/// The value is an Argon2 PHC string minted at login.  Tokens carry no expiry
/// and are not tied back to the server: anyone holding a non-empty value is
/// treated as logged in (see [`Authenticator::validate`]).
///
/// [`Authenticator::validate`]: crate::authenticator::Authenticator::validate
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
    value: String,
}

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Build a token from the raw cookie value, if the request carried one.
    pub fn from_cookie(value: Option<&str>) -> Option<Self> {
        value.map(Self::new)
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionToken")
            .field(
                "value",
                if self.value.is_empty() { &"<empty>" } else { &"<redacted>" },
            )
            .finish()
    }
}
