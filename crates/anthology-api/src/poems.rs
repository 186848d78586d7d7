//! Handlers for `/poems` and `/poem/{id}`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/poems` | Optional `?search=`; at most 200 rows, preview content |
//! | `GET`  | `/poem/{id}` | Full content; 400 on a non-integer id, 404 if missing |

use anthology_core::{model::Poem, store::Storage};
use axum::extract::{
  Path, Query, State,
  rejection::{PathRejection, QueryRejection},
};
use serde::Deserialize;

use crate::{AppState, envelope::Envelope, error::ApiError, mapper, queries};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  /// Substring matched against title, author name, and dynasty.
  pub search: Option<String>,
}

/// `GET /poems[?search=<text>]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Envelope<Vec<Poem>>, ApiError>
where
  S: Storage,
{
  const CONTEXT: &str = "failed to list poems";

  let Query(params) =
    params.map_err(|e| ApiError::BadRequest(format!("invalid query string: {e}")))?;
  // An empty `search` is the same as none.
  let search = params.search.as_deref().filter(|s| !s.is_empty());

  let stmt = queries::poem_list(search);
  tracing::debug!(
    search = ?search,
    sql = %stmt.compact_sql(),
    args = ?stmt.args(),
    "listing poems"
  );

  let rows = state
    .store
    .query(&stmt)
    .await
    .map_err(ApiError::storage(CONTEXT))?;
  let poems = rows
    .iter()
    .map(mapper::poem_summary)
    .collect::<Result<Vec<_>, _>>()
    .map_err(ApiError::mapping(CONTEXT))?;

  Ok(Envelope::ok("poems loaded", poems))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /poem/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  path: Result<Path<String>, PathRejection>,
) -> Result<Envelope<Poem>, ApiError>
where
  S: Storage,
{
  const CONTEXT: &str = "failed to load poem";

  let id = queries::path_id(path, "poem id")?;

  let rows = state
    .store
    .query(&queries::poem_detail(id))
    .await
    .map_err(ApiError::storage(CONTEXT))?;
  let row = rows
    .first()
    .ok_or_else(|| ApiError::NotFound(format!("poem {id} not found")))?;
  let poem = mapper::poem(row).map_err(ApiError::mapping(CONTEXT))?;

  Ok(Envelope::ok("poem loaded", poem))
}
