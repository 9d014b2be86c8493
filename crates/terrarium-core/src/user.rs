//! User accounts. A user owns the subjects whose readings carry their id.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Store-assigned account identifier; never reused.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
  pub id:            UserId,
  /// Unique, stored in [`normalize_email`] form.
  pub email:         String,
  /// Argon2 PHC string, e.g. `$argon2id$v=19$…`. Never the plaintext.
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub name:          String,
  pub created_at:    DateTime<Utc>,
}

/// Input to [`crate::store::TerrariumStore::create_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
  pub email:         String,
  pub password_hash: String,
  pub name:          String,
}

impl NewUser {
  pub fn validate(&self) -> Result<()> {
    if self.email.trim().is_empty() {
      return Err(Error::Validation("email must not be empty".into()));
    }
    if self.name.trim().is_empty() {
      return Err(Error::Validation("name must not be empty".into()));
    }
    if self.password_hash.is_empty() {
      return Err(Error::Validation("password hash must not be empty".into()));
    }
    Ok(())
  }
}

/// Emails compare case-insensitively and without surrounding whitespace.
pub fn normalize_email(email: &str) -> String { email.trim().to_lowercase() }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalize_email_trims_and_lowercases() {
    assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
  }

  #[test]
  fn new_user_requires_every_field() {
    let ok = NewUser {
      email:         "ada@example.com".into(),
      password_hash: "$argon2id$v=19$stub".into(),
      name:          "Ada".into(),
    };
    assert!(ok.validate().is_ok());

    let mut no_name = ok.clone();
    no_name.name = " ".into();
    assert!(matches!(no_name.validate(), Err(Error::Validation(_))));

    let mut no_email = ok.clone();
    no_email.email = String::new();
    assert!(matches!(no_email.validate(), Err(Error::Validation(_))));
  }

  #[test]
  fn password_hash_is_not_serialised() {
    let user = User {
      id:            UserId(1),
      email:         "ada@example.com".into(),
      password_hash: "secret-hash".into(),
      name:          "Ada".into(),
      created_at:    Utc::now(),
    };
    let json = serde_json::to_string(&user).unwrap();
    assert!(!json.contains("secret-hash"));
  }
}
