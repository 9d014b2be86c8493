//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Server-assigned instants are stored as RFC 3339 strings. Identifiers are
//! plain integers.

use chrono::{DateTime, Utc};
use terrarium_core::{
  reading::{Reading, ReadingId, SubjectSummary},
  user::{User, UserId},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawReading::from_row`].
pub const READING_COLUMNS: &str =
  "id, subject, owner_id, temperature, timestamp, received_at";

/// Raw values read directly from a `readings` row.
pub struct RawReading {
  pub id:          i64,
  pub subject:     String,
  pub owner_id:    Option<i64>,
  pub temperature: f64,
  pub timestamp:   String,
  pub received_at: String,
}

impl RawReading {
  /// Read the six [`READING_COLUMNS`] starting at column `offset`.
  pub fn from_row(row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(offset)?,
      subject:     row.get(offset + 1)?,
      owner_id:    row.get(offset + 2)?,
      temperature: row.get(offset + 3)?,
      timestamp:   row.get(offset + 4)?,
      received_at: row.get(offset + 5)?,
    })
  }

  pub fn into_reading(self) -> Result<Reading> {
    Ok(Reading {
      id:          ReadingId(self.id),
      subject:     self.subject,
      temperature: self.temperature,
      timestamp:   self.timestamp,
      owner:       self.owner_id.map(UserId),
      received_at: decode_dt(&self.received_at)?,
    })
  }
}

/// A `readings` row joined with its per-subject aggregate.
pub struct RawSummary {
  pub latest:        RawReading,
  pub reading_count: i64,
}

impl RawSummary {
  pub fn into_summary(self) -> Result<SubjectSummary> {
    let latest = self.latest.into_reading()?;
    Ok(SubjectSummary {
      subject:       latest.subject.clone(),
      owner:         latest.owner,
      reading_count: self.reading_count.max(0) as u64,
      latest,
    })
  }
}

/// Column list matching [`RawUser::from_row`].
pub const USER_COLUMNS: &str = "id, email, password_hash, name, created_at";

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub id:            i64,
  pub email:         String,
  pub password_hash: String,
  pub name:          String,
  pub created_at:    String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      email:         row.get(1)?,
      password_hash: row.get(2)?,
      name:          row.get(3)?,
      created_at:    row.get(4)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:            UserId(self.id),
      email:         self.email,
      password_hash: self.password_hash,
      name:          self.name,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}
