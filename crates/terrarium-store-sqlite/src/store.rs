//! [`SqliteStore`] — the SQLite implementation of [`TerrariumStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{ErrorCode, OptionalExtension as _};
use terrarium_core::{
  reading::{NewReading, Reading, ReadingId, SubjectSummary},
  store::TerrariumStore,
  user::{NewUser, User, UserId, normalize_email},
};

use crate::{
  Error, Result,
  encode::{
    READING_COLUMNS, RawReading, RawSummary, RawUser, USER_COLUMNS, encode_dt,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Terrarium store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::debug!(path = %path.display(), "opened sqlite store");
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// One row per `(subject, owner)` group matching `filter`, carrying the
  /// group's newest reading and its size.
  async fn summaries(
    &self,
    filter: &'static str,
    params: Vec<Option<i64>>,
  ) -> Result<Vec<SubjectSummary>> {
    let raws: Vec<RawSummary> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT r.id, r.subject, r.owner_id, r.temperature, r.timestamp,
                  r.received_at, g.n
           FROM readings r
           JOIN (
             SELECT COUNT(*) AS n, MAX(id) AS last_id
             FROM readings
             {filter}
             GROUP BY subject, owner_id
           ) g ON r.id = g.last_id
           ORDER BY r.subject ASC, r.owner_id ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), |row| {
            Ok(RawSummary {
              latest:        RawReading::from_row(row, 0)?,
              reading_count: row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSummary::into_summary).collect()
  }
}

/// `true` when `err` is a UNIQUE / FOREIGN KEY / CHECK violation.
fn is_constraint_violation(err: &rusqlite::Error) -> bool {
  matches!(
    err,
    rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
  )
}

// ─── TerrariumStore impl ─────────────────────────────────────────────────────

impl TerrariumStore for SqliteStore {
  type Error = Error;

  // ── Readings ──────────────────────────────────────────────────────────────

  async fn insert_reading(&self, input: NewReading) -> Result<Reading> {
    input.validate()?;

    let received_at = Utc::now();
    let subject     = input.subject.clone();
    let temperature = input.temperature;
    let timestamp   = input.timestamp.clone();
    let owner_id    = input.owner.map(|o| o.0);
    let at_str      = encode_dt(received_at);

    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          "INSERT INTO readings (subject, owner_id, temperature, timestamp, received_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![subject, owner_id, temperature, timestamp, at_str],
        );
        match inserted {
          Ok(_) => Ok(Some(conn.last_insert_rowid())),
          // The only constraint on this table is the owner foreign key.
          Err(e) if is_constraint_violation(&e) => Ok(None),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    let id = id.ok_or_else(|| {
      terrarium_core::Error::Validation(format!(
        "owner {} does not exist",
        input.owner.map(|o| o.to_string()).unwrap_or_default()
      ))
    })?;

    Ok(Reading {
      id: ReadingId(id),
      subject: input.subject,
      temperature: input.temperature,
      timestamp: input.timestamp,
      owner: input.owner,
      received_at,
    })
  }

  async fn query_by_subject(
    &self,
    subject: &str,
    owner:   Option<UserId>,
  ) -> Result<Vec<Reading>> {
    let subject  = subject.to_owned();
    let owner_id = owner.map(|o| o.0);

    let raws: Vec<RawReading> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {READING_COLUMNS} FROM readings
           WHERE subject = ?1 AND owner_id IS ?2
           ORDER BY id ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![subject, owner_id], |row| {
            RawReading::from_row(row, 0)
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawReading::into_reading).collect()
  }

  async fn latest(&self, subject: &str, owner: Option<UserId>) -> Result<Reading> {
    let subject_owned = subject.to_owned();
    let owner_id      = owner.map(|o| o.0);

    let raw: Option<RawReading> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {READING_COLUMNS} FROM readings
               WHERE subject = ?1 AND owner_id IS ?2
               ORDER BY id DESC
               LIMIT 1"
            ),
            rusqlite::params![subject_owned, owner_id],
            |row| RawReading::from_row(row, 0),
          )
          .optional()?)
      })
      .await?;

    match raw {
      Some(raw) => raw.into_reading(),
      None => Err(
        terrarium_core::Error::NotFound(format!("no readings for {subject:?}"))
          .into(),
      ),
    }
  }

  async fn subjects(&self, owner: Option<UserId>) -> Result<Vec<SubjectSummary>> {
    self
      .summaries("WHERE owner_id IS ?1", vec![owner.map(|o| o.0)])
      .await
  }

  async fn all_subjects(&self) -> Result<Vec<SubjectSummary>> {
    self.summaries("", Vec::new()).await
  }

  async fn count_readings(&self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM readings", [], |r| r.get(0))?)
      })
      .await?;
    Ok(n.max(0) as u64)
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    input.validate()?;

    let email      = normalize_email(&input.email);
    let created_at = Utc::now();

    let email_c = email.clone();
    let hash    = input.password_hash.clone();
    let name    = input.name.clone();
    let at_str  = encode_dt(created_at);

    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          "INSERT INTO users (email, password_hash, name, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![email_c, hash, name, at_str],
        );
        match inserted {
          Ok(_) => Ok(Some(conn.last_insert_rowid())),
          Err(e) if is_constraint_violation(&e) => Ok(None),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    let id = id.ok_or_else(|| {
      terrarium_core::Error::Conflict(format!("email {email} is already registered"))
    })?;

    Ok(User {
      id: UserId(id),
      email,
      password_hash: input.password_hash,
      name: input.name,
      created_at,
    })
  }

  async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
    let email = normalize_email(email);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
            rusqlite::params![email],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn user_by_id(&self, id: UserId) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            rusqlite::params![id.0],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn first_user_id(&self) -> Result<Option<UserId>> {
    let id: Option<i64> = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT MIN(id) FROM users", [], |r| r.get(0))?)
      })
      .await?;
    Ok(id.map(UserId))
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id ASC"))?;
        let rows = stmt
          .query_map([], RawUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }
}
