//! Session keys and helpers on top of [`tower_sessions::Session`].
//!
//! The session carries the authenticated user's id and a queue of one-shot
//! notices ("flashes") shown on the next rendered page.

use terrarium_core::user::UserId;
use tower_sessions::Session;

use crate::error::Error;

/// Key under which the authenticated user's id is stored.
pub const USER_ID_KEY: &str = "user_id";

/// Key under which pending notices are queued.
pub const FLASH_KEY: &str = "flash";

pub async fn user_id(session: &Session) -> Result<Option<UserId>, Error> {
  Ok(session.get::<UserId>(USER_ID_KEY).await?)
}

/// Mark the session as belonging to `id`. The session id is rotated first so
/// a pre-login cookie cannot be reused.
pub async fn log_in(session: &Session, id: UserId) -> Result<(), Error> {
  session.cycle_id().await?;
  session.insert(USER_ID_KEY, id).await?;
  Ok(())
}

/// Drop every value, including pending notices.
pub async fn log_out(session: &Session) -> Result<(), Error> {
  session.flush().await?;
  Ok(())
}

/// Queue a notice for the next rendered page.
pub async fn flash(session: &Session, message: impl Into<String>) -> Result<(), Error> {
  let mut queue: Vec<String> = session.get(FLASH_KEY).await?.unwrap_or_default();
  queue.push(message.into());
  session.insert(FLASH_KEY, queue).await?;
  Ok(())
}

/// Remove and return every queued notice.
pub async fn take_flashes(session: &Session) -> Result<Vec<String>, Error> {
  Ok(session.remove::<Vec<String>>(FLASH_KEY).await?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use tower_sessions::MemoryStore;

  use super::*;

  fn session() -> Session { Session::new(None, Arc::new(MemoryStore::default()), None) }

  #[tokio::test]
  async fn flashes_are_returned_once_in_order() {
    let s = session();
    flash(&s, "first").await.unwrap();
    flash(&s, "second").await.unwrap();

    assert_eq!(take_flashes(&s).await.unwrap(), ["first", "second"]);
    assert!(take_flashes(&s).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn log_in_then_out() {
    let s = session();
    assert_eq!(user_id(&s).await.unwrap(), None);

    log_in(&s, UserId(7)).await.unwrap();
    assert_eq!(user_id(&s).await.unwrap(), Some(UserId(7)));

    log_out(&s).await.unwrap();
    assert_eq!(user_id(&s).await.unwrap(), None);
  }
}
