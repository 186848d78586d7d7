//! Per-endpoint statement builders and input validation.
//!
//! Every value that originates from a request is attached with
//! [`Statement::bind`]; the SQL text below is fixed.

use anthology_core::{
  model::{NewComment, POEM_LIST_LIMIT, PREVIEW_CHARS},
  statement::Statement,
};

use axum::extract::{Path, rejection::PathRejection};

use crate::{error::ApiError, mapper::encode_timestamp};

// ─── Validation ──────────────────────────────────────────────────────────────

/// Parse a path segment as an integer id.
///
/// The whole segment must be a decimal integer; `"12abc"` is rejected.
pub fn parse_id(raw: &str, field: &str) -> Result<i64, ApiError> {
  raw
    .parse::<i64>()
    .map_err(|_| ApiError::BadRequest(format!("invalid {field}: {raw:?} is not an integer")))
}

/// Extract and parse a single-segment id path. Segments axum cannot decode
/// (e.g. invalid percent-encoded UTF-8) get the same 400 as non-integers.
pub fn path_id(path: Result<Path<String>, PathRejection>, field: &str) -> Result<i64, ApiError> {
  let Path(raw) =
    path.map_err(|e| ApiError::BadRequest(format!("invalid {field}: {}", e.body_text())))?;
  parse_id(&raw, field)
}

/// Escape LIKE metacharacters and wrap in `%` so `search` matches as a
/// literal substring (paired with `ESCAPE '\'`).
pub fn like_pattern(search: &str) -> String {
  let mut pattern = String::with_capacity(search.len() + 2);
  pattern.push('%');
  for c in search.chars() {
    if matches!(c, '%' | '_' | '\\') {
      pattern.push('\\');
    }
    pattern.push(c);
  }
  pattern.push('%');
  pattern
}

// ─── Relationship graph ──────────────────────────────────────────────────────

pub fn poet_nodes() -> Statement { Statement::new("SELECT name, dynasty FROM poet") }

pub fn poet_links() -> Statement {
  Statement::new("SELECT poetA_name, poetB_name, relation, value FROM poet_relationship")
}

// ─── Poems ───────────────────────────────────────────────────────────────────

/// Poem listing with preview content, optionally filtered by `search`
/// against title, author name, or dynasty.
pub fn poem_list(search: Option<&str>) -> Statement {
  let stmt = Statement::new(
    "SELECT
       p.id,
       p.title,
       substr(p.content, 1, ?) AS content,
       pt.name AS author,
       pt.dynasty
     FROM poem p
     JOIN poet pt ON p.poetID = pt.id",
  )
  .bind(PREVIEW_CHARS as i64);

  let stmt = match search {
    Some(search) => {
      let pattern = like_pattern(search);
      stmt
        .push(
          "WHERE p.title   LIKE ? ESCAPE '\\'
              OR pt.name    LIKE ? ESCAPE '\\'
              OR pt.dynasty LIKE ? ESCAPE '\\'",
        )
        .bind(pattern.as_str())
        .bind(pattern.as_str())
        .bind(pattern)
    }
    None => stmt,
  };

  stmt.push("LIMIT ?").bind(POEM_LIST_LIMIT as i64)
}

/// A single poem with its full content.
pub fn poem_detail(id: i64) -> Statement {
  Statement::new(
    "SELECT
       p.id,
       p.title,
       p.content,
       pt.name AS author,
       pt.dynasty
     FROM poem p
     JOIN poet pt ON p.poetID = pt.id
     WHERE p.id = ?",
  )
  .bind(id)
}

// ─── Comments ────────────────────────────────────────────────────────────────

/// All comments on a poem, oldest first; equal timestamps keep insertion
/// order.
pub fn comments_for_poem(poem_id: i64) -> Statement {
  Statement::new(
    "SELECT id, poemID, content, username, createdAt, parentID
     FROM comment
     WHERE poemID = ?
     ORDER BY createdAt ASC, id ASC",
  )
  .bind(poem_id)
}

pub fn insert_comment(comment: &NewComment) -> Statement {
  Statement::new(
    "INSERT INTO comment (poemID, content, username, parentID, createdAt)
     VALUES (?, ?, ?, ?, ?)",
  )
  .bind(comment.poem_id)
  .bind(comment.content.as_str())
  .bind(comment.username.as_str())
  .bind(comment.parent_id)
  .bind(encode_timestamp(comment.created_at))
}
