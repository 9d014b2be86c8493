//! HTTP layer for Terrarium.
//!
//! Exposes an axum [`Router`] serving sensor ingestion, per-snake pages and
//! charts, and cookie-session accounts, backed by any [`TerrariumStore`].

pub mod auth;
pub mod error;
pub mod etag;
pub mod handlers;
pub mod html;
pub mod pages;
pub mod session;

pub use error::{ApiError, Error};

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, post},
};
use serde::Deserialize;
use terrarium_core::store::TerrariumStore;
use tower_http::trace::TraceLayer;
use tower_sessions::{
  Expiry, MemoryStore, SessionManagerLayer,
  cookie::{SameSite, time::Duration},
};

use handlers::{account, admin, home, plot, sensors, snakes};

/// Largest accepted `POST /sensors` body.
pub const SENSOR_BODY_LIMIT: usize = 64 * 1024;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `TERRARIUM_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                  String,
  pub port:                  u16,
  pub store_path:            PathBuf,
  /// Set the `Secure` flag on the session cookie (requires HTTPS).
  pub session_secure_cookie: bool,
  /// Sessions expire after this much inactivity.
  pub session_ttl_minutes:   i64,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                  "127.0.0.1".to_string(),
      port:                  5000,
      store_path:            PathBuf::from("terrarium.db"),
      session_secure_cookie: false,
      session_ttl_minutes:   24 * 60,
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers. Built once at startup.
#[derive(Clone)]
pub struct AppState<S: TerrariumStore> {
  pub store:    Arc<S>,
  pub config:   Arc<ServerConfig>,
  /// Server-side session records; the cookie only carries the session id.
  pub sessions: MemoryStore,
}

impl<S: TerrariumStore> AppState<S> {
  pub fn new(store: S, config: ServerConfig) -> Self {
    Self {
      store:    Arc::new(store),
      config:   Arc::new(config),
      sessions: MemoryStore::default(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the Terrarium server.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: TerrariumStore + Clone + 'static,
{
  let sessions = SessionManagerLayer::new(state.sessions.clone())
    .with_secure(state.config.session_secure_cookie)
    .with_same_site(SameSite::Lax)
    .with_expiry(Expiry::OnInactivity(Duration::minutes(
      state.config.session_ttl_minutes,
    )));

  Router::new()
    .route("/",                   get(home::handler))
    .route("/health",             get(|| async { "ok" }))
    .route(
      "/sensors",
      post(sensors::ingest::<S>).layer(DefaultBodyLimit::max(SENSOR_BODY_LIMIT)),
    )
    .route("/name/{subject}",     get(snakes::by_name::<S>))
    .route("/snake/{name}",       get(snakes::owned::<S>))
    .route("/plot/{subject}",     get(plot::handler::<S>))
    // Older chart links. Static routes win, so `/name/plot.png` is the
    // summary of a snake called `plot.png`; pages link to `/plot/{subject}`.
    .route("/{subject}/plot.png", get(plot::handler::<S>))
    .route("/list",               get(snakes::list::<S>))
    .route("/snakes",             get(snakes::list::<S>))
    .route("/register",           get(account::register_form).post(account::register::<S>))
    .route("/login",              get(account::login_form).post(account::login::<S>))
    .route("/logout",             get(account::logout))
    .route("/admin",              get(admin::handler::<S>))
    .layer(sessions)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
