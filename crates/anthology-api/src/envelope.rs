//! The uniform response envelope.
//!
//! Success: `{"code": 200, "message": "...", "data": ...}`.
//! Created: `{"code": 201, "message": "...", "insertedId": 7}`.
//! Error:   `{"code": 404, "message": "..."}`.
//!
//! `code` always mirrors the HTTP status of the response.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
  pub code:    u16,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data:    Option<T>,
}

impl<T> Envelope<T> {
  /// `200 OK` carrying `data`.
  pub fn ok(message: impl Into<String>, data: T) -> Self {
    Self {
      code:    StatusCode::OK.as_u16(),
      message: message.into(),
      data:    Some(data),
    }
  }

  pub fn status(&self) -> StatusCode {
    StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
  }
}

impl Envelope<()> {
  /// An error envelope; never carries `data`.
  pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
    Self {
      code:    status.as_u16(),
      message: message.into(),
      data:    None,
    }
  }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
  fn into_response(self) -> Response { (self.status(), Json(self)).into_response() }
}

// ─── Created ─────────────────────────────────────────────────────────────────

/// `201 Created`. The fields of `body` sit next to `code` and `message`
/// instead of under `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Created<T> {
  pub code:    u16,
  pub message: String,
  #[serde(flatten)]
  pub body:    T,
}

impl<T> Created<T> {
  pub fn new(message: impl Into<String>, body: T) -> Self {
    Self {
      code: StatusCode::CREATED.as_u16(),
      message: message.into(),
      body,
    }
  }
}

impl<T: Serialize> IntoResponse for Created<T> {
  fn into_response(self) -> Response { (StatusCode::CREATED, Json(self)).into_response() }
}

#[cfg(test)]
mod tests {
  use anthology_core::model::Inserted;

  use super::*;

  #[test]
  fn created_body_is_flattened() {
    let json = serde_json::to_value(Created::new("comment added", Inserted { inserted_id: 7 })).unwrap();
    assert_eq!(json, serde_json::json!({
      "code": 201,
      "message": "comment added",
      "insertedId": 7,
    }));
  }

  #[test]
  fn error_envelope_omits_data() {
    let json = serde_json::to_value(Envelope::error(StatusCode::NOT_FOUND, "poem 9 not found")).unwrap();
    assert_eq!(json["code"], 404);
    assert!(json.get("data").is_none());
  }
}
