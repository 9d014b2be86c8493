//! Error types and axum `IntoResponse` implementations.
//!
//! [`Error`] renders as an HTML error page for browser-facing routes.
//! [`ApiError`] wraps the same error for the sensor endpoint, which answers
//! with `{"error": "..."}` instead.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use terrarium_core::store::StoreError;
use thiserror::Error;

use crate::pages;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Domain(#[from] terrarium_core::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("chart error: {0}")]
  Chart(#[from] terrarium_chart::Error),

  #[error("session error: {0}")]
  Session(String),

  #[error("password hashing error: {0}")]
  Hashing(String),
}

impl Error {
  /// Keep domain failures (not found, conflict, …) distinguishable; anything
  /// else from the backend is an opaque storage error.
  pub fn from_store<E: StoreError>(err: E) -> Self {
    match err.domain() {
      Some(domain) => Error::Domain(domain.clone()),
      None => Error::Store(Box::new(err)),
    }
  }

  pub fn status(&self) -> StatusCode {
    use terrarium_core::Error as D;
    match self {
      Error::Domain(D::MalformedRequest(_))
      | Error::Domain(D::MissingField(_))
      | Error::Domain(D::Validation(_)) => StatusCode::BAD_REQUEST,
      Error::Domain(D::NotFound(_)) => StatusCode::NOT_FOUND,
      Error::Domain(D::Unauthorized) | Error::Domain(D::InvalidCredentials) => {
        StatusCode::UNAUTHORIZED
      }
      Error::Domain(D::Forbidden) => StatusCode::FORBIDDEN,
      Error::Domain(D::Conflict(_)) => StatusCode::CONFLICT,
      Error::Store(_) | Error::Chart(_) | Error::Session(_) | Error::Hashing(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  /// Message safe to show to a client. Internal failures are logged and
  /// replaced by a generic message.
  fn public_message(&self) -> String {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
      "internal server error".to_owned()
    } else {
      self.to_string()
    }
  }
}

impl From<tower_sessions::session::Error> for Error {
  fn from(err: tower_sessions::session::Error) -> Self {
    Error::Session(err.to_string())
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status  = self.status();
    let message = self.public_message();
    (status, pages::error(status, &message)).into_response()
  }
}

/// JSON-bodied error for the sensor ingestion endpoint.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl<E: Into<Error>> From<E> for ApiError {
  fn from(err: E) -> Self { ApiError(err.into()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status  = self.0.status();
    let message = self.0.public_message();
    (status, Json(json!({ "error": message }))).into_response()
  }
}
