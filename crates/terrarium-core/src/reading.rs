//! Readings — the fundamental unit of the Terrarium store.
//!
//! A reading is an immutable temperature sample for one subject (a snake).
//! Readings are only ever appended and read; nothing updates or deletes them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, user::UserId};

// ─── Identity ────────────────────────────────────────────────────────────────

/// Store-assigned, monotonically increasing reading identifier.
///
/// Ordering by id is insertion order.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize,
)]
#[serde(transparent)]
pub struct ReadingId(pub i64);

impl fmt::Display for ReadingId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ─── Reading ─────────────────────────────────────────────────────────────────

/// A stored temperature sample. Once written, no field is ever updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
  pub id:          ReadingId,
  /// Name of the animal the sensor is attached to.
  pub subject:     String,
  pub temperature: f64,
  /// Timestamp exactly as reported by the sensor; never parsed.
  pub timestamp:   String,
  pub owner:       Option<UserId>,
  /// Server-assigned instant of insertion.
  pub received_at: DateTime<Utc>,
}

// ─── NewReading ──────────────────────────────────────────────────────────────

/// Input to [`crate::store::TerrariumStore::insert_reading`].
/// `id` and `received_at` are always set by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReading {
  pub subject:     String,
  pub temperature: f64,
  pub timestamp:   String,
  pub owner:       Option<UserId>,
}

impl NewReading {
  pub fn new(
    subject: impl Into<String>,
    temperature: f64,
    timestamp: impl Into<String>,
  ) -> Self {
    Self {
      subject: subject.into(),
      temperature,
      timestamp: timestamp.into(),
      owner: None,
    }
  }

  pub fn owned_by(mut self, owner: UserId) -> Self {
    self.owner = Some(owner);
    self
  }

  /// Reject blank names and timestamps and non-finite temperatures.
  pub fn validate(&self) -> Result<()> {
    if self.subject.trim().is_empty() {
      return Err(Error::Validation("subject must not be empty".into()));
    }
    if self.timestamp.trim().is_empty() {
      return Err(Error::Validation("timestamp must not be empty".into()));
    }
    if !self.temperature.is_finite() {
      return Err(Error::Validation(format!(
        "temperature must be a finite number, got {}",
        self.temperature
      )));
    }
    Ok(())
  }
}

// ─── Subject summary ─────────────────────────────────────────────────────────

/// One row of a subject listing: a distinct `(owner, subject)` pair together
/// with its newest reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectSummary {
  pub subject:       String,
  pub owner:         Option<UserId>,
  pub reading_count: u64,
  pub latest:        Reading,
}
