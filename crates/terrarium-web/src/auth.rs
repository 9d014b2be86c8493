//! Password hashing and the session-backed identity extractors.

use std::sync::LazyLock;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{extract::FromRequestParts, http::request::Parts};
use rand_core::OsRng;
use terrarium_core::{Error as CoreError, store::TerrariumStore, user::User};
use tower_sessions::Session;

use crate::{AppState, error::Error, session};

// ─── Passwords ───────────────────────────────────────────────────────────────

/// Hash `password` into an argon2 PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, Error> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| Error::Hashing(e.to_string()))
}

/// Checked in place of a stored hash when a login names no account, so both
/// failure paths do the same argon2 work.
static DUMMY_HASH: LazyLock<String> =
  LazyLock::new(|| hash_password("terrarium-no-such-account").unwrap_or_default());

#[cfg(test)]
thread_local! {
  static VERIFICATIONS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// `true` when `password` matches the PHC string `hash`. Unparseable hashes
/// never match.
pub fn verify_password(password: &str, hash: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(hash) else {
    return false;
  };
  #[cfg(test)]
  VERIFICATIONS.with(|n| n.set(n.get() + 1));
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

/// Look up `email` and check `password` against the stored hash.
///
/// Fails with [`CoreError::NotFound`] for an unknown email and
/// [`CoreError::InvalidCredentials`] for a wrong password. Both paths run
/// one argon2 verification. Callers must not let the difference reach the
/// client.
pub async fn authenticate<S>(store: &S, email: &str, password: &str) -> Result<User, Error>
where
  S: TerrariumStore,
{
  let user = store
    .user_by_email(email)
    .await
    .map_err(Error::from_store)?;

  let Some(user) = user else {
    verify_password(password, &DUMMY_HASH);
    return Err(CoreError::NotFound("no account for that email".into()).into());
  };

  if verify_password(password, &user.password_hash) {
    Ok(user)
  } else {
    Err(CoreError::InvalidCredentials.into())
  }
}

// ─── Extractors ──────────────────────────────────────────────────────────────

/// The logged-in user, if any.
///
/// A session pointing at an account that no longer exists counts as
/// anonymous.
pub struct CurrentUser(pub Option<User>);

impl<S> FromRequestParts<AppState<S>> for CurrentUser
where
  S: TerrariumStore + Clone + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let session = Session::from_request_parts(parts, state)
      .await
      .map_err(|(_, msg)| Error::Session(msg.to_owned()))?;

    let Some(id) = session::user_id(&session).await? else {
      return Ok(CurrentUser(None));
    };

    let user = state.store.user_by_id(id).await.map_err(Error::from_store)?;
    Ok(CurrentUser(user))
  }
}

/// Guard for administrator-only routes.
///
/// Only the first account ever created passes; everyone else, anonymous
/// callers included, is rejected with `403 Forbidden`.
pub struct AdminUser(pub User);

impl<S> FromRequestParts<AppState<S>> for AdminUser
where
  S: TerrariumStore + Clone + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
    let user = user.ok_or(CoreError::Forbidden)?;

    let admin = state.store.first_user_id().await.map_err(Error::from_store)?;
    if admin == Some(user.id) {
      Ok(AdminUser(user))
    } else {
      tracing::warn!(user = %user.id, "non-admin attempted to reach an admin route");
      Err(CoreError::Forbidden.into())
    }
  }
}

#[cfg(test)]
mod tests {
  use terrarium_core::user::NewUser;
  use terrarium_store_sqlite::SqliteStore;

  use super::*;

  #[test]
  fn hash_is_salted_and_never_plaintext() {
    let a = hash_password("hunter2").unwrap();
    let b = hash_password("hunter2").unwrap();
    assert_ne!(a, "hunter2");
    assert!(a.starts_with("$argon2"));
    assert_ne!(a, b, "two hashes of one password must use different salts");
  }

  #[test]
  fn verify_accepts_only_the_right_password() {
    let hash = hash_password("hunter2").unwrap();
    assert!(verify_password("hunter2", &hash));
    assert!(!verify_password("hunter3", &hash));
  }

  #[test]
  fn verify_rejects_garbage_hashes() {
    assert!(!verify_password("hunter2", "not-a-phc-string"));
    assert!(!verify_password("", ""));
  }

  fn verifications() -> usize { VERIFICATIONS.with(|n| n.get()) }

  #[tokio::test]
  async fn unknown_email_costs_a_verification_like_a_wrong_password() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    store
      .create_user(NewUser {
        email:         "ada@example.com".into(),
        password_hash: hash_password("hunter2").unwrap(),
        name:          "Ada".into(),
      })
      .await
      .unwrap();
    assert!(PasswordHash::new(&DUMMY_HASH).is_ok(), "{}", *DUMMY_HASH);

    let before = verifications();
    let err = authenticate(&store, "bob@example.com", "hunter2")
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Domain(CoreError::NotFound(_))), "{err}");
    assert_eq!(verifications(), before + 1);

    let before = verifications();
    let err = authenticate(&store, "ada@example.com", "hunter3")
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Domain(CoreError::InvalidCredentials)), "{err}");
    assert_eq!(verifications(), before + 1);

    let user = authenticate(&store, "ada@example.com", "hunter2").await.unwrap();
    assert_eq!(user.name, "Ada");
  }
}
