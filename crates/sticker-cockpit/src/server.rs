//! [`CockpitServer`] – HTTP front door for the operator UI.
//!
//! Listens on `0.0.0.0:8080` (configurable via [`CockpitServer::with_port`]).
//!
//! | Route | Behaviour |
//! |---|---|
//! | `GET /` (and any unrouted path) | control page with a session, login page without |
//! | `POST /login` | form `username` + `password`; sets the session cookie on success; always `308` → `/` |
//! | `POST /logout` | clears the session cookie; `303` → `/` |
//! | `POST /api` | JSON control message; `401` without a session, `200` with an empty body otherwise |
//! | `/static/*`, `/images/*` | files under the configured static directory |
//!
//! Login failures and malformed control messages are logged, never reported
//! to the client.

use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::http::header::LOCATION;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use sticker_control::{DispatcherHandle, decode};
use sticker_kernel::{AuthError, Authenticator, SessionToken};
use sticker_types::StickerError;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::{debug, error, info, warn};

use crate::cookie;
use crate::pages::{CONTROL_PAGE, LOGIN_PAGE};

/// Default TCP port for the cockpit.
pub const DEFAULT_PORT: u16 = 8080;

/// How often the graceful-shutdown watcher polls the shutdown flag.
const SHUTDOWN_POLL: Duration = Duration::from_millis(200);

// ---------------------------------------------------------------------------
// Shared handler state
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct AppState {
    auth: Arc<Authenticator>,
    dispatcher: DispatcherHandle,
}

impl AppState {
    fn logged_in(&self, headers: &HeaderMap) -> bool {
        cookie::session_from_headers(headers)
            .map(|token| self.auth.validate(&token))
            .unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// CockpitServer
// ---------------------------------------------------------------------------

/// HTTP server that authenticates the operator and forwards control messages
/// to the dispatcher.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use sticker_cockpit::CockpitServer;
/// use sticker_control::{Dispatcher, spawn_dispatcher};
/// use sticker_hal::SimRobot;
/// use sticker_kernel::{Authenticator, Credential, HashCost, StaticCredentialStore};
///
/// #[tokio::main]
/// async fn main() {
///     let cost = HashCost::default();
///     let credential = Credential::from_password("hello", "world", &cost).unwrap();
///     let auth = Arc::new(Authenticator::new(StaticCredentialStore::new(credential), cost));
///     let (dispatcher, _task) = spawn_dispatcher(Dispatcher::new(Box::new(SimRobot::new("sim"))));
///
///     CockpitServer::new(auth, dispatcher)
///         .run()
///         .await
///         .expect("cockpit server failed");
/// }
/// ```
pub struct CockpitServer {
    state: AppState,
    port: u16,
    static_dir: PathBuf,
    shutdown: Option<Arc<AtomicBool>>,
}

impl CockpitServer {
    /// Create a server on the [`DEFAULT_PORT`] serving static files from the
    /// current directory.
    pub fn new(auth: Arc<Authenticator>, dispatcher: DispatcherHandle) -> Self {
        Self {
            state: AppState { auth, dispatcher },
            port: DEFAULT_PORT,
            static_dir: PathBuf::from("."),
            shutdown: None,
        }
    }

    /// Override the listening port (builder-style).
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Directory holding the `static/` and `images/` trees.
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }

    /// Stop accepting connections once `flag` becomes `true`.
    pub fn with_shutdown(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown = Some(flag);
        self
    }

    /// Return the configured port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Build the route table.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(index).post(index))
            .route("/login", post(login))
            .route("/logout", post(logout))
            .route("/api", post(api))
            .nest_service("/static", ServeDir::new(self.static_dir.join("static")))
            .nest_service("/images", ServeDir::new(self.static_dir.join("images")))
            .fallback(index)
            .with_state(self.state.clone())
    }

    /// Bind and serve until the shutdown flag (if any) is raised.
    ///
    /// # Errors
    ///
    /// - [`StickerError::Bind`] if the listener cannot bind.
    /// - [`StickerError::Server`] if the server stops with an I/O error.
    pub async fn run(self) -> Result<(), StickerError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| StickerError::Bind {
                addr: addr.to_string(),
                details: e.to_string(),
            })?;

        info!(%addr, static_dir = %self.static_dir.display(), "cockpit listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal(self.shutdown))
            .await
            .map_err(|e| StickerError::Server(e.to_string()))
    }
}

fn shutdown_signal(flag: Option<Arc<AtomicBool>>) -> impl Future<Output = ()> {
    async move {
        let Some(flag) = flag else {
            return std::future::pending().await;
        };
        while !flag.load(Ordering::Relaxed) {
            tokio::time::sleep(SHUTDOWN_POLL).await;
        }
        info!("cockpit shutting down");
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index(State(state): State<AppState>, headers: HeaderMap) -> Html<&'static str> {
    if state.logged_in(&headers) {
        Html(CONTROL_PAGE)
    } else {
        Html(LOGIN_PAGE)
    }
}

#[derive(Deserialize)]
struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

async fn login(
    State(state): State<AppState>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(LOCATION, HeaderValue::from_static("/"));

    match form {
        Ok(Form(form)) => match authenticate(&state, form).await {
            Ok(token) => match cookie::set_session(&token) {
                Some(value) => cookie::append(&mut headers, value),
                None => warn!("session token cannot be sent as a cookie"),
            },
            Err(AuthError::InvalidCredentials) => {}
            Err(e) => warn!(error = %e, "login failed"),
        },
        Err(e) => debug!(error = %e, "unreadable login form"),
    }

    (StatusCode::PERMANENT_REDIRECT, headers).into_response()
}

/// Argon2 is deliberately slow, so keep it off the async workers.
async fn authenticate(state: &AppState, form: LoginForm) -> Result<SessionToken, AuthError> {
    let auth = Arc::clone(&state.auth);
    tokio::task::spawn_blocking(move || auth.authenticate(&form.username, &form.password))
        .await
        .unwrap_or_else(|e| Err(AuthError::HashFailure(format!("login task failed: {e}"))))
}

async fn logout() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(LOCATION, HeaderValue::from_static("/"));
    cookie::append(&mut headers, cookie::clear_session());
    (StatusCode::SEE_OTHER, headers).into_response()
}

async fn api(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> StatusCode {
    if !state.logged_in(&headers) {
        warn!("control message without a session");
        return StatusCode::UNAUTHORIZED;
    }

    let envelope = match decode(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(error = %e, "dropping control message");
            return StatusCode::OK;
        }
    };

    if let Err(e) = state.dispatcher.dispatch(envelope).await {
        error!(error = %e, "control message not applied");
    }
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
