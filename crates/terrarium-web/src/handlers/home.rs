//! `GET /` — the landing page.

use axum::response::Html;
use tower_sessions::Session;

use crate::{auth::CurrentUser, error::Error, handlers::chrome, pages};

pub async fn handler(
  CurrentUser(user): CurrentUser,
  session: Session,
) -> Result<Html<String>, Error> {
  let chrome = chrome(&session, user.as_ref()).await?;
  Ok(pages::landing(&chrome))
}
