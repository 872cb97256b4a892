//! Single-owner task that serializes access to the [`Dispatcher`].
//!
//! HTTP handlers run concurrently, but the robot state must change in one
//! well-defined order.  [`spawn_dispatcher`] moves the dispatcher into a tokio
//! task fed by an `mpsc` channel; every [`DispatcherHandle`] clone sends
//! requests into that channel and awaits a `oneshot` reply.  Requests are
//! applied in the order they enter the channel, so within an axis group the
//! last command to arrive wins.
//!
//! # Example
//!
//! ```rust
//! use sticker_control::{Dispatcher, spawn_dispatcher};
//! use sticker_hal::SimRobot;
//! use sticker_types::{CommandEnvelope, CommandKind, Direction, MotionAxis, PressState};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let (handle, _task) = spawn_dispatcher(Dispatcher::new(Box::new(SimRobot::new("sim"))));
//! let state = handle
//!     .dispatch(CommandEnvelope::new(CommandKind::Move, Direction::Up, PressState::Pressed))
//!     .await
//!     .expect("dispatcher running");
//! assert_eq!(state.motion, MotionAxis::Forward);
//! # }
//! ```

use sticker_types::{CommandEnvelope, RobotState, StickerError};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::dispatcher::Dispatcher;

/// Requests buffered before senders start waiting.
const DEFAULT_CAPACITY: usize = 64;

enum Request {
    Dispatch {
        envelope: CommandEnvelope,
        reply: oneshot::Sender<RobotState>,
    },
    Halt {
        reply: oneshot::Sender<RobotState>,
    },
    Snapshot {
        reply: oneshot::Sender<RobotState>,
    },
}

/// Cloneable sender side of the dispatcher task.
#[derive(Clone, Debug)]
pub struct DispatcherHandle {
    tx: mpsc::Sender<Request>,
}

/// Move `dispatcher` into its own task.
///
/// The task exits once every [`DispatcherHandle`] has been dropped.
pub fn spawn_dispatcher(dispatcher: Dispatcher) -> (DispatcherHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(DEFAULT_CAPACITY);
    let task = tokio::spawn(run(dispatcher, rx));
    (DispatcherHandle { tx }, task)
}

async fn run(mut dispatcher: Dispatcher, mut rx: mpsc::Receiver<Request>) {
    while let Some(request) = rx.recv().await {
        // A dropped reply receiver just means the caller stopped waiting.
        match request {
            Request::Dispatch { envelope, reply } => {
                dispatcher.dispatch(&envelope);
                let _ = reply.send(dispatcher.state());
            }
            Request::Halt { reply } => {
                dispatcher.halt();
                let _ = reply.send(dispatcher.state());
            }
            Request::Snapshot { reply } => {
                let _ = reply.send(dispatcher.state());
            }
        }
    }
    debug!("dispatcher task finished: all handles dropped");
}

impl DispatcherHandle {
    /// Queue `envelope` and wait for it to be applied.
    ///
    /// # Errors
    ///
    /// Returns [`StickerError::DispatcherClosed`] if the task is gone.
    pub async fn dispatch(&self, envelope: CommandEnvelope) -> Result<RobotState, StickerError> {
        self.request(|reply| Request::Dispatch { envelope, reply })
            .await
    }

    /// Stop both axis groups.
    pub async fn halt(&self) -> Result<RobotState, StickerError> {
        self.request(|reply| Request::Halt { reply }).await
    }

    /// Current state, after every request queued before this one.
    pub async fn state(&self) -> Result<RobotState, StickerError> {
        self.request(|reply| Request::Snapshot { reply }).await
    }

    async fn request(
        &self,
        build: impl FnOnce(oneshot::Sender<RobotState>) -> Request,
    ) -> Result<RobotState, StickerError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(build(reply))
            .await
            .map_err(|_| StickerError::DispatcherClosed)?;
        rx.await.map_err(|_| StickerError::DispatcherClosed)
    }
}
