//! `sticker-cockpit` – The Operator Web Front Door
//!
//! Boots an axum HTTP server (default port `8080`) that:
//!
//! 1. **Serves** the login page or the control page at `/`, depending on
//!    whether the request carries a session cookie.
//!
//! 2. **Authenticates** the operator at `POST /login` through the
//!    [`Authenticator`] and hands back a `session` cookie.
//!
//! 3. **Accepts** JSON control messages at `POST /api`, decodes them, and
//!    forwards them to the dispatcher task that owns the robot.
//!
//! 4. **Serves** static assets from `static/` and `images/`.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sticker_cockpit::CockpitServer;
//! use sticker_control::{Dispatcher, spawn_dispatcher};
//! use sticker_hal::SimRobot;
//! use sticker_kernel::{Authenticator, Credential, HashCost, StaticCredentialStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let cost = HashCost::default();
//!     let credential = Credential::from_password("hello", "world", &cost).unwrap();
//!     let auth = Arc::new(Authenticator::new(StaticCredentialStore::new(credential), cost));
//!     let (dispatcher, _task) = spawn_dispatcher(Dispatcher::new(Box::new(SimRobot::new("sim"))));
//!
//!     CockpitServer::new(auth, dispatcher)
//!         .with_static_dir("./web")
//!         .run()
//!         .await
//!         .expect("cockpit server failed");
//! }
//! ```
//!
//! [`Authenticator`]: sticker_kernel::Authenticator

pub mod cookie;
pub mod pages;
pub mod server;

pub use server::{CockpitServer, DEFAULT_PORT};
