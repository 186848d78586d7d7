//! Handlers for `/comments` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/comments/{poem_id}` | Oldest first, so replies follow their parents |
//! | `POST` | `/comments` | Body: [`NewCommentBody`]; returns 201 with a top-level `insertedId` |

use anthology_core::{
  model::{ANONYMOUS_USERNAME, Comment, Inserted, NewComment},
  store::Storage,
};
use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::{
  AppState,
  envelope::{Created, Envelope},
  error::ApiError,
  mapper, queries,
};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /comments/{poem_id}`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  path: Result<Path<String>, PathRejection>,
) -> Result<Envelope<Vec<Comment>>, ApiError>
where
  S: Storage,
{
  const CONTEXT: &str = "failed to load comments";

  let poem_id = queries::path_id(path, "poem id")?;

  let rows = state
    .store
    .query(&queries::comments_for_poem(poem_id))
    .await
    .map_err(ApiError::storage(CONTEXT))?;
  let comments = rows
    .iter()
    .map(mapper::comment)
    .collect::<Result<Vec<_>, _>>()
    .map_err(ApiError::mapping(CONTEXT))?;

  Ok(Envelope::ok("comments loaded", comments))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /comments`.
///
/// Ids may be sent as numbers or numeric strings.
#[derive(Debug, Default, Deserialize)]
pub struct NewCommentBody {
  #[serde(rename = "poemID", default, deserialize_with = "lenient_id")]
  pub poem_id:   Option<i64>,
  pub content:   Option<String>,
  pub username:  Option<String>,
  #[serde(rename = "parentID", default, deserialize_with = "lenient_id")]
  pub parent_id: Option<i64>,
}

impl NewCommentBody {
  /// Check required fields and fill defaults.
  ///
  /// A zero `poemID` counts as missing; blank `content` counts as empty; a
  /// missing or blank `username` becomes [`ANONYMOUS_USERNAME`]. Whether the
  /// referenced poem or parent comment exists is left to the store.
  pub fn validate(self, created_at: DateTime<Utc>) -> Result<NewComment, ApiError> {
    let poem_id = self.poem_id.filter(|id| *id != 0);
    let content = self.content.filter(|c| !c.trim().is_empty());
    let (Some(poem_id), Some(content)) = (poem_id, content) else {
      return Err(ApiError::BadRequest("poemID and content are required".into()));
    };

    let username = self
      .username
      .filter(|u| !u.trim().is_empty())
      .unwrap_or_else(|| ANONYMOUS_USERNAME.to_owned());

    Ok(NewComment {
      poem_id,
      content,
      username,
      parent_id: self.parent_id,
      created_at,
    })
  }
}

/// `POST /comments`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<NewCommentBody>, JsonRejection>,
) -> Result<Created<Inserted>, ApiError>
where
  S: Storage,
{
  const CONTEXT: &str = "failed to add comment";

  let Json(body) = body.map_err(|e| {
    ApiError::BadRequest(format!("request body must be a JSON comment: {}", e.body_text()))
  })?;
  let comment = body.validate(Utc::now())?;

  let executed = state
    .store
    .execute(&queries::insert_comment(&comment))
    .await
    .map_err(ApiError::storage(CONTEXT))?;

  tracing::info!(
    comment_id = executed.insert_id,
    poem_id = comment.poem_id,
    parent_id = ?comment.parent_id,
    "comment added"
  );

  Ok(Created::new("comment added", Inserted {
    inserted_id: executed.insert_id,
  }))
}

// ─── Deserialisation helpers ─────────────────────────────────────────────────

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Repr {
    Int(i64),
    Text(String),
  }

  match Option::<Repr>::deserialize(deserializer)? {
    None => Ok(None),
    Some(Repr::Int(id)) => Ok(Some(id)),
    Some(Repr::Text(s)) if s.trim().is_empty() => Ok(None),
    Some(Repr::Text(s)) => s
      .trim()
      .parse()
      .map(Some)
      .map_err(|_| serde::de::Error::custom(format!("{s:?} is not an integer id"))),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn body(json: &str) -> NewCommentBody { serde_json::from_str(json).unwrap() }

  #[test]
  fn username_defaults_to_placeholder() {
    let now = Utc::now();
    for json in [
      r#"{"poemID": 1, "content": "好诗"}"#,
      r#"{"poemID": 1, "content": "好诗", "username": null}"#,
      r#"{"poemID": 1, "content": "好诗", "username": "  "}"#,
    ] {
      let c = body(json).validate(now).unwrap();
      assert_eq!(c.username, ANONYMOUS_USERNAME, "{json}");
      assert_eq!(c.parent_id, None);
    }
  }

  #[test]
  fn explicit_fields_are_kept() {
    let c = body(r#"{"poemID": "4", "content": "同感", "username": "子美", "parentID": 9}"#)
      .validate(Utc::now())
      .unwrap();
    assert_eq!(c.poem_id, 4);
    assert_eq!(c.username, "子美");
    assert_eq!(c.parent_id, Some(9));
  }

  #[test]
  fn missing_required_fields_are_rejected() {
    for json in [
      r#"{"content": "好诗"}"#,
      r#"{"poemID": 0, "content": "好诗"}"#,
      r#"{"poemID": "", "content": "好诗"}"#,
      r#"{"poemID": 1}"#,
      r#"{"poemID": 1, "content": ""}"#,
      r#"{"poemID": 1, "content": "   "}"#,
      r#"{}"#,
    ] {
      assert!(
        matches!(body(json).validate(Utc::now()), Err(ApiError::BadRequest(_))),
        "{json} should be rejected"
      );
    }
  }

  #[test]
  fn non_numeric_id_fails_to_deserialize() {
    assert!(serde_json::from_str::<NewCommentBody>(r#"{"poemID": "abc", "content": "x"}"#).is_err());
  }
}
