//! Generic `Robot` trait for the drive base and camera mount.
//!
//! Drivers implement this trait and hand a boxed instance to the dispatcher.
//! The rest of the server only ever talks to the trait, so drivers can be
//! swapped without touching the command protocol.

use sticker_types::{ActuatorCall, StickerError};

/// A robot that can turn, drive, and aim its camera.
pub trait Robot: Send {
    /// Stable identifier for this robot, used in logs and fault reports.
    fn id(&self) -> &str;

    /// Apply one actuator call.
    ///
    /// Calls are fire-and-forget from the caller's perspective: the
    /// dispatcher logs a returned error and moves on.
    ///
    /// # Errors
    ///
    /// Returns [`StickerError::ActuatorFault`] if the hardware rejects the
    /// command (e.g. a motor controller is in a fault state).
    fn actuate(&mut self, call: ActuatorCall) -> Result<(), StickerError>;
}
