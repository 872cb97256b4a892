//! `sticker-hal` – Robot abstraction
//!
//! The dispatcher only ever talks to the [`Robot`] trait, so the concrete
//! meaning of "turn left" on a given chassis lives entirely in a driver.
//!
//! # Modules
//!
//! - [`robot`] – the [`Robot`] trait drivers implement.
//! - [`sim`] – [`SimRobot`][sim::SimRobot], an in-process driver that records
//!   every call for headless runs and tests.

pub mod robot;
pub mod sim;

pub use robot::Robot;
pub use sim::{CallLog, DEFAULT_LOG_CAPACITY, SimRobot};
