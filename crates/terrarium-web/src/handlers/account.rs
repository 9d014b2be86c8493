//! Registration, login and logout.
//!
//! Failures on these form-backed routes never surface as error statuses: the
//! caller is sent back to the form with a notice explaining what to do.

use axum::{
  Form,
  extract::State,
  response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use terrarium_core::{Error as CoreError, store::TerrariumStore, user::NewUser};
use tower_sessions::Session;

use crate::{
  AppState,
  auth::{self, CurrentUser},
  error::Error,
  handlers::{chrome, redirect_with_notice},
  pages, session,
};

pub const REGISTER_INCOMPLETE: &str = "Name, email and password are all required.";
pub const EMAIL_TAKEN: &str = "That email is already registered, log in instead.";
pub const LOGIN_FAILED: &str = "Login failed, please try again.";

// ─── Register ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
  pub email:    String,
  pub password: String,
  pub name:     String,
}

/// `GET /register`
pub async fn register_form(
  CurrentUser(user): CurrentUser,
  session: Session,
) -> Result<Html<String>, Error> {
  let chrome = chrome(&session, user.as_ref()).await?;
  Ok(pages::register(&chrome))
}

/// `POST /register` — create the account and log it in.
pub async fn register<S>(
  State(state): State<AppState<S>>,
  session: Session,
  Form(form): Form<RegisterForm>,
) -> Result<Response, Error>
where
  S: TerrariumStore + Clone + 'static,
{
  if form.email.trim().is_empty()
    || form.name.trim().is_empty()
    || form.password.is_empty()
  {
    return redirect_with_notice(&session, "/register", REGISTER_INCOMPLETE).await;
  }

  let existing = state
    .store
    .user_by_email(&form.email)
    .await
    .map_err(Error::from_store)?;
  if existing.is_some() {
    return redirect_with_notice(&session, "/register", EMAIL_TAKEN).await;
  }

  let new_user = NewUser {
    email:         form.email,
    password_hash: auth::hash_password(&form.password)?,
    name:          form.name.trim().to_owned(),
  };

  let user = match state.store.create_user(new_user).await {
    Ok(user) => user,
    Err(e) => match Error::from_store(e) {
      // Lost a race with a concurrent registration for the same email.
      Error::Domain(CoreError::Conflict(_)) => {
        return redirect_with_notice(&session, "/register", EMAIL_TAKEN).await;
      }
      other => return Err(other),
    },
  };

  tracing::info!(user = %user.id, "user registered");
  session::log_in(&session, user.id).await?;
  redirect_with_notice(&session, "/snakes", &format!("Welcome, {}!", user.name)).await
}

// ─── Login ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginForm {
  pub email:    String,
  pub password: String,
}

/// `GET /login`
pub async fn login_form(
  CurrentUser(user): CurrentUser,
  session: Session,
) -> Result<Html<String>, Error> {
  let chrome = chrome(&session, user.as_ref()).await?;
  Ok(pages::login(&chrome))
}

/// `POST /login`
///
/// An unknown email and a wrong password produce the same redirect and the
/// same notice.
pub async fn login<S>(
  State(state): State<AppState<S>>,
  session: Session,
  Form(form): Form<LoginForm>,
) -> Result<Response, Error>
where
  S: TerrariumStore + Clone + 'static,
{
  match auth::authenticate(state.store.as_ref(), &form.email, &form.password).await {
    Ok(user) => {
      session::log_in(&session, user.id).await?;
      tracing::info!(user = %user.id, "user logged in");
      Ok(Redirect::to("/snakes").into_response())
    }
    Err(Error::Domain(CoreError::NotFound(_) | CoreError::InvalidCredentials)) => {
      tracing::warn!("failed login attempt");
      redirect_with_notice(&session, "/login", LOGIN_FAILED).await
    }
    Err(other) => Err(other),
  }
}

// ─── Logout ──────────────────────────────────────────────────────────────────

/// `GET /logout`
pub async fn logout(CurrentUser(user): CurrentUser, session: Session) -> Result<Response, Error> {
  session::log_out(&session).await?;
  if let Some(user) = user {
    tracing::info!(user = %user.id, "user logged out");
  }
  Ok(Redirect::to("/").into_response())
}
