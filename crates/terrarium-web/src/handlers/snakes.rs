//! Per-subject HTML views.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/name/{subject}` | Legacy name-only lookup, caller's scope |
//! | `GET`  | `/snake/{name}` | The caller's own subject; login required |
//! | `GET`  | `/list`, `/snakes` | The caller's subjects; login required |

use axum::{
  extract::{Path, State},
  response::{IntoResponse, Response},
};
use terrarium_core::{Error as CoreError, store::TerrariumStore};
use tower_sessions::Session;

use crate::{
  AppState,
  auth::CurrentUser,
  error::Error,
  handlers::{chrome, redirect_with_notice},
  pages,
};

pub const LOGIN_REQUIRED: &str = "Please log in to view your snakes.";
pub const NO_SUCH_SNAKE: &str = "No snake found with that name.";

/// `GET /name/{subject}` — latest reading by name alone.
///
/// Kept for sensors and bookmarks that predate accounts. Anonymous callers
/// see the unowned scope; logged-in callers see their own subject. Either
/// way the page and its embedded chart cover the same readings, and owned
/// readings never reach anyone but their owner.
pub async fn by_name<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  session: Session,
  Path(subject): Path<String>,
) -> Result<Response, Error>
where
  S: TerrariumStore + Clone + 'static,
{
  let owner  = user.as_ref().map(|u| u.id);
  let latest = state
    .store
    .latest(&subject, owner)
    .await
    .map_err(Error::from_store)?;

  let chrome = chrome(&session, user.as_ref()).await?;
  Ok(pages::summary(&chrome, &subject, &latest).into_response())
}

/// `GET /snake/{name}` — latest reading of the caller's own subject.
///
/// A name the caller does not own is reported exactly like a name nobody
/// owns.
pub async fn owned<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  session: Session,
  Path(name): Path<String>,
) -> Result<Response, Error>
where
  S: TerrariumStore + Clone + 'static,
{
  let Some(user) = user else {
    return redirect_with_notice(&session, "/login", LOGIN_REQUIRED).await;
  };

  let latest = match state.store.latest(&name, Some(user.id)).await {
    Ok(reading) => reading,
    Err(e) => match Error::from_store(e) {
      Error::Domain(CoreError::NotFound(_)) => {
        tracing::debug!(user = %user.id, %name, "snake lookup outside caller's scope");
        return redirect_with_notice(&session, "/", NO_SUCH_SNAKE).await;
      }
      other => return Err(other),
    },
  };

  let chrome = chrome(&session, Some(&user)).await?;
  Ok(pages::summary(&chrome, &name, &latest).into_response())
}

/// `GET /snakes` (alias `/list`) — the caller's subjects.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  session: Session,
) -> Result<Response, Error>
where
  S: TerrariumStore + Clone + 'static,
{
  let Some(user) = user else {
    return redirect_with_notice(&session, "/login", LOGIN_REQUIRED).await;
  };

  let subjects = state
    .store
    .subjects(Some(user.id))
    .await
    .map_err(Error::from_store)?;

  let chrome = chrome(&session, Some(&user)).await?;
  Ok(pages::snake_list(&chrome, &subjects).into_response())
}
