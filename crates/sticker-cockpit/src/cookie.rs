//! Reading and writing the `session` cookie.
//!
//! The cookie is scoped to `/` and has no `Max-Age`, `Secure`, or `HttpOnly`
//! attributes, so it lives until the browser discards it and is readable by
//! page scripts.  Deployments that need more should terminate TLS in a
//! reverse proxy that rewrites `Set-Cookie`.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use sticker_kernel::SessionToken;
use sticker_kernel::session::SESSION_COOKIE;

/// The first `session` cookie on the request, if any.  Surrounding double
/// quotes are removed.
pub fn session_from_headers(headers: &HeaderMap) -> Option<SessionToken> {
    let value = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| unquote(value.trim()))?;
    SessionToken::from_cookie(Some(value))
}

/// `Set-Cookie` value that stores `token`.
///
/// Values containing a space or comma are double-quoted.  Returns `None` if
/// the token holds bytes a header cannot carry.
pub fn set_session(token: &SessionToken) -> Option<HeaderValue> {
    let value = token.value();
    let value = if value.contains([' ', ',']) {
        format!("\"{value}\"")
    } else {
        value.to_string()
    };
    HeaderValue::from_str(&format!("{SESSION_COOKIE}={value}; Path=/")).ok()
}

/// `Set-Cookie` value that makes the browser drop the session.
pub fn clear_session() -> HeaderValue {
    HeaderValue::from_static("session=; Path=/; Max-Age=0")
}

/// Append `value` as a `Set-Cookie` header.
pub fn append(headers: &mut HeaderMap, value: HeaderValue) {
    headers.append(SET_COOKIE, value);
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
