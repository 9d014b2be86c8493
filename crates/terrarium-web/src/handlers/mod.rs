pub mod account;
pub mod admin;
pub mod home;
pub mod plot;
pub mod sensors;
pub mod snakes;

use axum::response::{IntoResponse, Redirect, Response};
use terrarium_core::user::User;
use tower_sessions::Session;

use crate::{error::Error, html::Chrome, session};

/// Page chrome for the current request. Consumes any queued notices.
pub(super) async fn chrome(session: &Session, user: Option<&User>) -> Result<Chrome, Error> {
  Ok(Chrome {
    user_name: user.map(|u| u.name.clone()),
    notices:   session::take_flashes(session).await?,
  })
}

/// Queue `notice` and answer with `303 See Other` to `to`.
pub(super) async fn redirect_with_notice(
  session: &Session,
  to:      &str,
  notice:  &str,
) -> Result<Response, Error> {
  session::flash(session, notice).await?;
  Ok(Redirect::to(to).into_response())
}
