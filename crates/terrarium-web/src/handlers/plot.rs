//! `GET /{subject}/plot.png` — temperature history chart.
//!
//! Logged-in callers get the chart for their own subject of that name;
//! anonymous callers get the unowned history. A subject without readings
//! renders as an empty chart, never an error.

use axum::{
  extract::{Path, State},
  http::{HeaderMap, StatusCode, header},
  response::{IntoResponse, Response},
};
use terrarium_core::store::TerrariumStore;

use crate::{
  AppState,
  auth::CurrentUser,
  error::Error,
  etag::{compute_etag, if_none_match},
};

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(subject): Path<String>,
  headers: HeaderMap,
) -> Result<Response, Error>
where
  S: TerrariumStore + Clone + 'static,
{
  let owner = user.as_ref().map(|u| u.id);
  let history = state
    .store
    .query_by_subject(&subject, owner)
    .await
    .map_err(Error::from_store)?;

  let png  = terrarium_chart::render(&history)?;
  let etag = compute_etag(&png);

  if if_none_match(headers.get(header::IF_NONE_MATCH), &etag) {
    return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
  }

  Ok(
    (
      StatusCode::OK,
      [
        (header::CONTENT_TYPE, "image/png".to_owned()),
        (header::CACHE_CONTROL, "no-cache".to_owned()),
        (header::ETAG, etag),
      ],
      png,
    )
      .into_response(),
  )
}
