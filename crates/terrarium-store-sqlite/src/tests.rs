//! Integration tests for `SqliteStore` against an in-memory database.

use terrarium_core::{
  Error as CoreError,
  reading::NewReading,
  store::{StoreError, TerrariumStore},
  user::{NewUser, UserId},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_user(email: &str) -> NewUser {
  NewUser {
    email:         email.into(),
    password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
    name:          "Keeper".into(),
  }
}

fn domain(err: &Error) -> Option<&CoreError> { err.domain() }

// ─── Readings ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_then_latest_round_trips() {
  let s = store().await;

  let stored = s
    .insert_reading(NewReading::new("Apollo", 28.5, "2024-01-01T10:00:00"))
    .await
    .unwrap();

  let latest = s.latest("Apollo", None).await.unwrap();
  assert_eq!(latest, stored);
  assert_eq!(latest.subject, "Apollo");
  assert_eq!(latest.temperature, 28.5);
  assert_eq!(latest.timestamp, "2024-01-01T10:00:00");
  assert_eq!(latest.owner, None);
}

#[tokio::test]
async fn fractional_temperatures_are_not_truncated() {
  let s = store().await;
  s.insert_reading(NewReading::new("Apollo", 27.125, "t1"))
    .await
    .unwrap();
  let latest = s.latest("Apollo", None).await.unwrap();
  assert_eq!(latest.temperature, 27.125);
}

#[tokio::test]
async fn query_returns_every_reading_in_insertion_order() {
  let s = store().await;
  for i in 0..5 {
    s.insert_reading(NewReading::new("Apollo", 20.0 + i as f64, format!("t{i}")))
      .await
      .unwrap();
  }
  s.insert_reading(NewReading::new("Zeus", 30.0, "other"))
    .await
    .unwrap();

  let history = s.query_by_subject("Apollo", None).await.unwrap();
  assert_eq!(history.len(), 5);
  let stamps: Vec<_> = history.iter().map(|r| r.timestamp.as_str()).collect();
  assert_eq!(stamps, ["t0", "t1", "t2", "t3", "t4"]);
  assert!(history.windows(2).all(|w| w[0].id < w[1].id));
}

#[tokio::test]
async fn query_for_unknown_subject_is_empty() {
  let s = store().await;
  let history = s.query_by_subject("Nobody", None).await.unwrap();
  assert!(history.is_empty());
}

#[tokio::test]
async fn latest_without_readings_is_not_found() {
  let s = store().await;
  let err = s.latest("Nobody", None).await.unwrap_err();
  assert!(matches!(domain(&err), Some(CoreError::NotFound(_))), "{err}");
}

#[tokio::test]
async fn latest_is_the_most_recent_insert() {
  let s = store().await;
  s.insert_reading(NewReading::new("Apollo", 25.0, "morning"))
    .await
    .unwrap();
  s.insert_reading(NewReading::new("Apollo", 31.0, "noon"))
    .await
    .unwrap();

  let latest = s.latest("Apollo", None).await.unwrap();
  assert_eq!(latest.timestamp, "noon");
  assert_eq!(latest.temperature, 31.0);
}

#[tokio::test]
async fn identical_inserts_create_distinct_readings() {
  let s = store().await;
  let a = s
    .insert_reading(NewReading::new("Apollo", 28.0, "same"))
    .await
    .unwrap();
  let b = s
    .insert_reading(NewReading::new("Apollo", 28.0, "same"))
    .await
    .unwrap();
  assert_ne!(a.id, b.id);
  assert_eq!(s.count_readings().await.unwrap(), 2);
}

#[tokio::test]
async fn insert_rejects_blank_fields() {
  let s = store().await;

  let err = s
    .insert_reading(NewReading::new("", 28.0, "t"))
    .await
    .unwrap_err();
  assert!(matches!(domain(&err), Some(CoreError::Validation(_))));

  let err = s
    .insert_reading(NewReading::new("Apollo", 28.0, " "))
    .await
    .unwrap_err();
  assert!(matches!(domain(&err), Some(CoreError::Validation(_))));

  assert_eq!(s.count_readings().await.unwrap(), 0);
}

#[tokio::test]
async fn insert_rejects_unknown_owner() {
  let s = store().await;
  let err = s
    .insert_reading(NewReading::new("Apollo", 28.0, "t").owned_by(UserId(99)))
    .await
    .unwrap_err();
  assert!(matches!(domain(&err), Some(CoreError::Validation(_))), "{err}");
}

// ─── Ownership ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn owners_never_see_each_others_readings() {
  let s = store().await;
  let a = s.create_user(new_user("a@example.com")).await.unwrap();
  let b = s.create_user(new_user("b@example.com")).await.unwrap();

  s.insert_reading(NewReading::new("Apollo", 26.0, "a-1").owned_by(a.id))
    .await
    .unwrap();
  s.insert_reading(NewReading::new("Apollo", 33.0, "b-1").owned_by(b.id))
    .await
    .unwrap();

  let a_history = s.query_by_subject("Apollo", Some(a.id)).await.unwrap();
  assert_eq!(a_history.len(), 1);
  assert!(a_history.iter().all(|r| r.owner == Some(a.id)));

  // B inserted last, but A's latest is still A's own reading.
  let a_latest = s.latest("Apollo", Some(a.id)).await.unwrap();
  assert_eq!(a_latest.timestamp, "a-1");

  let b_latest = s.latest("Apollo", Some(b.id)).await.unwrap();
  assert_eq!(b_latest.timestamp, "b-1");

  // Owned readings stay out of the unowned scope.
  assert!(s.query_by_subject("Apollo", None).await.unwrap().is_empty());
  let err = s.latest("Apollo", None).await.unwrap_err();
  assert!(matches!(domain(&err), Some(CoreError::NotFound(_))), "{err}");
}

#[tokio::test]
async fn unowned_scope_holds_only_unowned_readings() {
  let s = store().await;
  let a = s.create_user(new_user("a@example.com")).await.unwrap();

  s.insert_reading(NewReading::new("Apollo", 24.0, "legacy"))
    .await
    .unwrap();
  s.insert_reading(NewReading::new("Apollo", 31.0, "a-1").owned_by(a.id))
    .await
    .unwrap();

  let history = s.query_by_subject("Apollo", None).await.unwrap();
  assert_eq!(history.len(), 1);
  assert_eq!(history[0].owner, None);

  // The owned reading is newer, but the unowned latest ignores it.
  let latest = s.latest("Apollo", None).await.unwrap();
  assert_eq!(latest.timestamp, "legacy");

  let unowned = s.subjects(None).await.unwrap();
  assert_eq!(unowned.len(), 1);
  assert_eq!(unowned[0].owner, None);
  assert_eq!(unowned[0].reading_count, 1);
}

#[tokio::test]
async fn subjects_lists_one_row_per_owner_and_name() {
  let s = store().await;
  let a = s.create_user(new_user("a@example.com")).await.unwrap();
  let b = s.create_user(new_user("b@example.com")).await.unwrap();

  for (name, owner, stamp) in [
    ("Zeus", a.id, "z-1"),
    ("Apollo", a.id, "a-1"),
    ("Apollo", a.id, "a-2"),
    ("Apollo", b.id, "b-1"),
  ] {
    s.insert_reading(NewReading::new(name, 28.0, stamp).owned_by(owner))
      .await
      .unwrap();
  }

  let mine = s.subjects(Some(a.id)).await.unwrap();
  let names: Vec<_> = mine.iter().map(|m| m.subject.as_str()).collect();
  assert_eq!(names, ["Apollo", "Zeus"]);
  assert_eq!(mine[0].reading_count, 2);
  assert_eq!(mine[0].latest.timestamp, "a-2");

  assert!(s.subjects(None).await.unwrap().is_empty());

  let everyone = s.all_subjects().await.unwrap();
  let rows: Vec<_> = everyone
    .iter()
    .map(|m| (m.subject.as_str(), m.owner))
    .collect();
  assert_eq!(
    rows,
    [("Apollo", Some(a.id)), ("Apollo", Some(b.id)), ("Zeus", Some(a.id))]
  );
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
  let s = store().await;
  s.create_user(new_user("ada@example.com")).await.unwrap();

  let err = s
    .create_user(new_user("  ADA@example.com"))
    .await
    .unwrap_err();
  assert!(matches!(domain(&err), Some(CoreError::Conflict(_))), "{err}");
  assert_eq!(s.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn lookup_by_email_is_case_insensitive() {
  let s = store().await;
  let created = s.create_user(new_user("Ada@Example.com")).await.unwrap();
  assert_eq!(created.email, "ada@example.com");

  let found = s.user_by_email("ADA@EXAMPLE.COM").await.unwrap().unwrap();
  assert_eq!(found.id, created.id);
  assert!(s.user_by_email("bob@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn first_user_is_the_oldest_account() {
  let s = store().await;
  assert_eq!(s.first_user_id().await.unwrap(), None);

  let first = s.create_user(new_user("first@example.com")).await.unwrap();
  s.create_user(new_user("second@example.com")).await.unwrap();

  assert_eq!(s.first_user_id().await.unwrap(), Some(first.id));
  let fetched = s.user_by_id(first.id).await.unwrap().unwrap();
  assert_eq!(fetched.email, "first@example.com");
}

// ─── Durability ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn readings_survive_reopening_the_file() {
  let dir  = tempfile::tempdir().unwrap();
  let path = dir.path().join("terrarium.db");

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.insert_reading(NewReading::new("Apollo", 28.5, "persisted"))
      .await
      .unwrap();
  }

  let reopened = SqliteStore::open(&path).await.unwrap();
  let latest = reopened.latest("Apollo", None).await.unwrap();
  assert_eq!(latest.timestamp, "persisted");
}
