//! In-process simulated robot for running without physical hardware.
//!
//! [`SimRobot`] accepts every [`ActuatorCall`], logs it, and appends it to a
//! shared [`CallLog`].  Tests keep a clone of the log to assert on the exact
//! sequence of calls the dispatcher issued.  The log is bounded: once it holds
//! [`DEFAULT_LOG_CAPACITY`] calls the oldest is dropped for each new one, so a
//! long-running server does not grow without limit.
//!
//! # Example
//!
//! ```rust
//! use sticker_hal::{Robot, SimRobot};
//! use sticker_types::ActuatorCall;
//!
//! let robot = SimRobot::new("sticker");
//! let log = robot.log();
//!
//! let mut driver: Box<dyn Robot> = Box::new(robot);
//! driver.actuate(ActuatorCall::TurnLeft).expect("sim call must succeed");
//!
//! assert_eq!(log.calls(), vec![ActuatorCall::TurnLeft]);
//! ```

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use sticker_types::{ActuatorCall, StickerError};
use tracing::info;

use crate::robot::Robot;

/// Calls a [`CallLog`] keeps unless told otherwise.
pub const DEFAULT_LOG_CAPACITY: usize = 1024;

// ────────────────────────────────────────────────────────────────────────────
// Call log
// ────────────────────────────────────────────────────────────────────────────

/// Record of the most recent actuator calls, shared between a [`SimRobot`]
/// and whoever wants to inspect it.  Clone it cheaply – all clones share the
/// same underlying list.
#[derive(Clone, Debug)]
pub struct CallLog {
    calls: Arc<Mutex<VecDeque<ActuatorCall>>>,
    capacity: usize,
}

impl Default for CallLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A log that keeps at most `capacity` calls (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            calls: Arc::new(Mutex::new(VecDeque::with_capacity(capacity.min(64)))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshot of the retained calls, oldest first.
    pub fn calls(&self) -> Vec<ActuatorCall> {
        self.guard().iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    /// Most recent call, if any.
    pub fn last(&self) -> Option<ActuatorCall> {
        self.guard().back().copied()
    }

    pub fn clear(&self) {
        self.guard().clear();
    }

    fn push(&self, call: ActuatorCall) {
        let mut calls = self.guard();
        if calls.len() == self.capacity {
            calls.pop_front();
        }
        calls.push_back(call);
    }

    // A panicking test thread must not hide the calls recorded before it.
    fn guard(&self) -> MutexGuard<'_, VecDeque<ActuatorCall>> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// SimRobot
// ────────────────────────────────────────────────────────────────────────────

/// A simulated robot that records every call.  Succeeds unless a fault has
/// been injected for that call with [`SimRobot::with_fault`].
pub struct SimRobot {
    id: String,
    log: CallLog,
    faults: HashSet<ActuatorCall>,
}

impl SimRobot {
    /// Create a simulated robot with the given identifier and a fresh log.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            log: CallLog::new(),
            faults: HashSet::new(),
        }
    }

    /// Make every future `call` fail with [`StickerError::ActuatorFault`].
    /// The call is still recorded in the log before failing.
    pub fn with_fault(mut self, call: ActuatorCall) -> Self {
        self.faults.insert(call);
        self
    }

    /// Replace the call log with a fresh one holding at most `capacity`
    /// calls.  Handles taken from [`SimRobot::log`] before this point keep
    /// pointing at the old log.
    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log = CallLog::with_capacity(capacity);
        self
    }

    /// A handle onto this robot's call log.
    pub fn log(&self) -> CallLog {
        self.log.clone()
    }
}

impl Robot for SimRobot {
    fn id(&self) -> &str {
        &self.id
    }

    fn actuate(&mut self, call: ActuatorCall) -> Result<(), StickerError> {
        self.log.push(call);
        if self.faults.contains(&call) {
            return Err(StickerError::ActuatorFault {
                robot: self.id.clone(),
                call,
                details: "simulated fault".to_string(),
            });
        }
        info!(robot = %self.id, %call, "sim actuator call");
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
