//! The `TerrariumStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `terrarium-store-sqlite`). The web layer depends on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::{
  Error,
  reading::{NewReading, Reading, SubjectSummary},
  user::{NewUser, User, UserId},
};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// A backend error that may carry one of the shared domain failures.
///
/// Callers use [`StoreError::domain`] to tell a `NotFound` or `Conflict` apart
/// from an I/O or driver failure without knowing the backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn domain(&self) -> Option<&Error>;
}

impl StoreError for Error {
  fn domain(&self) -> Option<&Error> { Some(self) }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Terrarium store backend.
///
/// Readings are append-only. A subject is identified by its owner and name:
/// `owner` parameters scope a lookup to one user's subjects, and `None` is
/// the unowned scope (readings ingested without an owner). No scoped lookup
/// ever returns another owner's readings.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait TerrariumStore: Send + Sync {
  type Error: StoreError;

  // ── Readings ──────────────────────────────────────────────────────────

  /// Validate and append a reading. `id` and `received_at` are assigned by
  /// the store.
  fn insert_reading(
    &self,
    input: NewReading,
  ) -> impl Future<Output = Result<Reading, Self::Error>> + Send + '_;

  /// Every reading for `subject`, oldest first. Empty when none exist.
  fn query_by_subject<'a>(
    &'a self,
    subject: &'a str,
    owner: Option<UserId>,
  ) -> impl Future<Output = Result<Vec<Reading>, Self::Error>> + Send + 'a;

  /// The most recently inserted reading for `subject`.
  ///
  /// Fails with [`Error::NotFound`] when there is none.
  fn latest<'a>(
    &'a self,
    subject: &'a str,
    owner: Option<UserId>,
  ) -> impl Future<Output = Result<Reading, Self::Error>> + Send + 'a;

  /// Distinct subjects with their newest reading, ordered by name.
  fn subjects(
    &self,
    owner: Option<UserId>,
  ) -> impl Future<Output = Result<Vec<SubjectSummary>, Self::Error>> + Send + '_;

  /// Every `(owner, subject)` pair in the store, ordered by name then owner.
  /// Administrative listings only.
  fn all_subjects(
    &self,
  ) -> impl Future<Output = Result<Vec<SubjectSummary>, Self::Error>> + Send + '_;

  /// Total number of stored readings.
  fn count_readings(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new account. Fails with [`Error::Conflict`] when the email is
  /// already registered.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  fn user_by_id(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// The first account ever created; it administers the instance.
  fn first_user_id(
    &self,
  ) -> impl Future<Output = Result<Option<UserId>, Self::Error>> + Send + '_;

  /// Every account, oldest first.
  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;
}
