//! Compiled-in HTML pages.

/// Shown to clients holding a session: movement and camera pads.
pub const CONTROL_PAGE: &str = include_str!("control.html");

/// Shown to everyone else.
pub const LOGIN_PAGE: &str = include_str!("login.html");
