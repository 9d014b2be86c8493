//! `GET /admin` — accounts and storage overview for the administrator.

use axum::{extract::State, response::Html};
use terrarium_core::store::TerrariumStore;
use tower_sessions::Session;

use crate::{AppState, auth::AdminUser, error::Error, handlers::chrome, pages};

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  AdminUser(admin): AdminUser,
  session: Session,
) -> Result<Html<String>, Error>
where
  S: TerrariumStore + Clone + 'static,
{
  let users    = state.store.list_users().await.map_err(Error::from_store)?;
  let subjects = state.store.all_subjects().await.map_err(Error::from_store)?;
  let count    = state.store.count_readings().await.map_err(Error::from_store)?;

  let chrome = chrome(&session, Some(&admin)).await?;
  Ok(pages::admin(&chrome, &users, &subjects, count))
}
