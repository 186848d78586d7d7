//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error is logged before it is turned into a response. Storage and
//! mapping failures reach the client only as a generic message; their detail
//! stays in the log.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::envelope::Envelope;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Malformed or missing input. The message is shown to the client.
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("not found: {0}")]
  NotFound(String),

  /// Any failure reported by the storage backend.
  #[error("{context}: {source}")]
  Storage {
    context: &'static str,
    #[source]
    source:  Box<dyn std::error::Error + Send + Sync>,
  },

  /// A row did not have the expected shape.
  #[error("{context}: {source}")]
  Mapping {
    context: &'static str,
    #[source]
    source:  anthology_core::Error,
  },
}

impl ApiError {
  /// `map_err` adapter for storage results; `context` is client-safe.
  pub fn storage<E>(context: &'static str) -> impl FnOnce(E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    move |e| ApiError::Storage {
      context,
      source: Box::new(e),
    }
  }

  /// `map_err` adapter for row-mapping results; `context` is client-safe.
  pub fn mapping(context: &'static str) -> impl FnOnce(anthology_core::Error) -> Self {
    move |source| ApiError::Mapping { context, source }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Storage { .. } | ApiError::Mapping { .. } => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  /// The message shown to the client.
  pub fn public_message(&self) -> String {
    match self {
      ApiError::BadRequest(m) | ApiError::NotFound(m) => m.clone(),
      ApiError::Storage { context, .. } | ApiError::Mapping { context, .. } => {
        format!("server error: {context}")
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    } else {
      tracing::warn!(error = %self, "request rejected");
    }
    Envelope::error(status, self.public_message()).into_response()
  }
}
