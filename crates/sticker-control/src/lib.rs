//! `sticker-control` – The Command Protocol
//!
//! Turns raw `/api` request bodies into actuator calls.
//!
//! # Modules
//!
//! - [`decoder`] – [`decode`][decoder::decode]: parses the JSON control
//!   message into a [`CommandEnvelope`][sticker_types::CommandEnvelope].
//!   Unrecognised values are carried through, not rejected.
//! - [`dispatcher`] – [`Dispatcher`][dispatcher::Dispatcher]: the robot
//!   state machine.  Maps each envelope to at most one
//!   [`ActuatorCall`][sticker_types::ActuatorCall] and keeps one active
//!   direction per axis group.
//! - [`actor`] – [`DispatcherHandle`][actor::DispatcherHandle]: serializes
//!   concurrent requests through a single task that owns the dispatcher.

pub mod actor;
pub mod decoder;
pub mod dispatcher;

pub use actor::{DispatcherHandle, spawn_dispatcher};
pub use decoder::{DecodeError, decode};
pub use dispatcher::{Dispatcher, transition};
