//! Handler for `GET /relationships`.
//!
//! Returns every poet as a graph node and every relationship as a graph
//! edge, for the front-end's force-directed view.

use anthology_core::{model::RelationshipGraph, store::Storage};
use axum::extract::State;

use crate::{AppState, envelope::Envelope, error::ApiError, mapper, queries};

const CONTEXT: &str = "failed to load relationship graph";

/// `GET /relationships`
pub async fn graph<S>(
  State(state): State<AppState<S>>,
) -> Result<Envelope<RelationshipGraph>, ApiError>
where
  S: Storage,
{
  let poets = state
    .store
    .query(&queries::poet_nodes())
    .await
    .map_err(ApiError::storage(CONTEXT))?;
  let links = state
    .store
    .query(&queries::poet_links())
    .await
    .map_err(ApiError::storage(CONTEXT))?;

  let graph = mapper::relationship_graph(&poets, &links, &state.classifier)
    .map_err(ApiError::mapping(CONTEXT))?;

  let orphans = graph.orphan_links().count();
  if orphans > 0 {
    tracing::warn!(orphans, "relationship links reference unknown poets");
  }

  Ok(Envelope::ok("relationship graph loaded", graph))
}
