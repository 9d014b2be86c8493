//! `POST /sensors` — sensor ingestion.
//!
//! Body: `{"Snake": "...", "Temp": 28.5, "Data": "...", "Owner_ID": 1}` where
//! `Owner_ID` may be omitted for readings that belong to nobody. The decoded
//! JSON is echoed back on success.

use axum::{Json, extract::State};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::Value;
use terrarium_core::{
  Error as CoreError,
  reading::NewReading,
  store::TerrariumStore,
  user::UserId,
};

use crate::{AppState, error::ApiError};

/// Keys that must be present, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 3] = ["Snake", "Temp", "Data"];

/// The wire shape of one sensor reading.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SensorPayload {
  #[serde(rename = "Snake")]
  pub snake:    String,
  #[serde(rename = "Temp")]
  pub temp:     f64,
  #[serde(rename = "Data")]
  pub data:     String,
  #[serde(rename = "Owner_ID", default)]
  pub owner_id: Option<UserId>,
}

impl From<SensorPayload> for NewReading {
  fn from(p: SensorPayload) -> Self {
    NewReading {
      subject:     p.snake,
      temperature: p.temp,
      timestamp:   p.data,
      owner:       p.owner_id,
    }
  }
}

/// Decode `body` exactly once into both the raw JSON (for the echo) and the
/// typed payload.
///
/// Not JSON, or JSON that is not an object, is a `MalformedRequest`; the
/// first absent required key is a `MissingField`; a present key of the wrong
/// type is a `Validation` error.
pub fn decode(body: &[u8]) -> Result<(Value, SensorPayload), CoreError> {
  let value: Value = serde_json::from_slice(body)
    .map_err(|e| CoreError::MalformedRequest(format!("body is not valid JSON: {e}")))?;

  let object = value
    .as_object()
    .ok_or_else(|| CoreError::MalformedRequest("body must be a JSON object".into()))?;

  if let Some(missing) = REQUIRED_FIELDS.into_iter().find(|k| !object.contains_key(*k)) {
    return Err(CoreError::MissingField(missing));
  }

  let payload = SensorPayload::deserialize(&value)
    .map_err(|e| CoreError::Validation(e.to_string()))?;

  Ok((value, payload))
}

pub async fn ingest<S>(
  State(state): State<AppState<S>>,
  body: Bytes,
) -> Result<Json<Value>, ApiError>
where
  S: TerrariumStore + Clone + 'static,
{
  let (echo, payload) = decode(&body).inspect_err(|e| {
    tracing::warn!(error = %e, "rejected sensor payload");
  })?;

  if let Some(owner) = payload.owner_id {
    let exists = state
      .store
      .user_by_id(owner)
      .await
      .map_err(crate::error::Error::from_store)?
      .is_some();
    if !exists {
      tracing::warn!(%owner, "sensor payload names an unknown owner");
      return Err(CoreError::Validation(format!("unknown Owner_ID {owner}")).into());
    }
  }

  let reading = state
    .store
    .insert_reading(payload.into())
    .await
    .map_err(crate::error::Error::from_store)?;

  tracing::info!(
    id = %reading.id,
    subject = %reading.subject,
    owner = ?reading.owner,
    temperature = reading.temperature,
    "reading ingested"
  );

  Ok(Json(echo))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decodes_a_full_payload() {
    let body = br#"{"Snake":"Apollo","Temp":28.5,"Data":"2024-01-01T10:00:00","Owner_ID":3}"#;
    let (echo, payload) = decode(body).unwrap();
    assert_eq!(payload.snake, "Apollo");
    assert_eq!(payload.temp, 28.5);
    assert_eq!(payload.data, "2024-01-01T10:00:00");
    assert_eq!(payload.owner_id, Some(UserId(3)));
    assert_eq!(echo["Snake"], "Apollo");
  }

  #[test]
  fn owner_is_optional_and_integers_widen() {
    let (_, payload) = decode(br#"{"Snake":"Apollo","Temp":28,"Data":"t"}"#).unwrap();
    assert_eq!(payload.owner_id, None);
    assert_eq!(payload.temp, 28.0);

    let (_, payload) =
      decode(br#"{"Snake":"Apollo","Temp":28,"Data":"t","Owner_ID":null}"#).unwrap();
    assert_eq!(payload.owner_id, None);
  }

  #[test]
  fn not_json_is_malformed() {
    assert!(matches!(decode(b"Snake=Apollo"), Err(CoreError::MalformedRequest(_))));
    assert!(matches!(decode(b""), Err(CoreError::MalformedRequest(_))));
  }

  #[test]
  fn non_object_json_is_malformed() {
    // A JSON string holding JSON is what a double-encoding client sends.
    let double = br#""{\"Snake\":\"Apollo\",\"Temp\":1,\"Data\":\"t\"}""#;
    assert!(matches!(decode(double), Err(CoreError::MalformedRequest(_))));
    assert!(matches!(decode(b"[1, 2]"), Err(CoreError::MalformedRequest(_))));
  }

  #[test]
  fn first_missing_key_is_named() {
    assert_eq!(
      decode(br#"{"Data":"t"}"#).unwrap_err(),
      CoreError::MissingField("Snake")
    );
    assert_eq!(
      decode(br#"{"Snake":"Apollo","Data":"t"}"#).unwrap_err(),
      CoreError::MissingField("Temp")
    );
    assert_eq!(
      decode(br#"{"Snake":"Apollo","Temp":1}"#).unwrap_err(),
      CoreError::MissingField("Data")
    );
  }

  #[test]
  fn wrong_types_are_validation_errors() {
    for body in [
      br#"{"Snake":"Apollo","Temp":"hot","Data":"t"}"#.as_slice(),
      br#"{"Snake":7,"Temp":1,"Data":"t"}"#.as_slice(),
      br#"{"Snake":"Apollo","Temp":1,"Data":"t","Owner_ID":"me"}"#.as_slice(),
    ] {
      assert!(
        matches!(decode(body), Err(CoreError::Validation(_))),
        "{}",
        String::from_utf8_lossy(body)
      );
    }
  }
}
