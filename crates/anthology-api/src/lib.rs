//! JSON REST API for Anthology.
//!
//! Exposes an axum [`Router`] backed by any [`anthology_core::store::Storage`].
//! CORS, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", anthology_api::api_router(state))
//! ```

pub mod comments;
pub mod envelope;
pub mod error;
pub mod mapper;
pub mod poems;
pub mod queries;
pub mod relationships;

use std::sync::Arc;

use anthology_core::{dynasty::DynastyClassifier, store::Storage};
use axum::{
  Router,
  routing::{get, post},
};

pub use envelope::{Created, Envelope};
pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<S> {
  pub store:      Arc<S>,
  pub classifier: Arc<DynastyClassifier>,
}

impl<S> AppState<S> {
  pub fn new(store: Arc<S>, classifier: DynastyClassifier) -> Self {
    Self {
      store,
      classifier: Arc::new(classifier),
    }
  }
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:      self.store.clone(),
      classifier: self.classifier.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: Storage + 'static,
{
  Router::new()
    // Graph
    .route("/relationships", get(relationships::graph::<S>))
    // Poems
    .route("/poems", get(poems::list::<S>))
    .route("/poem/{id}", get(poems::get_one::<S>))
    // Comments
    .route("/comments", post(comments::create::<S>))
    .route("/comments/{poem_id}", get(comments::list::<S>))
    .with_state(state)
}
