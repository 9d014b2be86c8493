//! Error types for `terrarium-core`.
//!
//! These are the domain failures every layer agrees on. Storage backends wrap
//! them (see [`crate::store::StoreError`]) and the HTTP layer maps them onto
//! status codes.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  /// The request body could not be decoded into the expected shape.
  #[error("malformed request: {0}")]
  MalformedRequest(String),

  #[error("missing field: {0}")]
  MissingField(&'static str),

  #[error("invalid value: {0}")]
  Validation(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("authentication required")]
  Unauthorized,

  #[error("forbidden")]
  Forbidden,

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("invalid credentials")]
  InvalidCredentials,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
