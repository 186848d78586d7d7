//! Response entities.
//!
//! Field names on the wire follow the front-end's camelCase conventions
//! (`poemID`, `parentID`, `createdAt`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Placeholder stored when a comment is posted without a username.
pub const ANONYMOUS_USERNAME: &str = "匿名用户";

/// Maximum number of characters of poem content shown in list views.
pub const PREVIEW_CHARS: usize = 100;

/// Row cap for the poem listing.
pub const POEM_LIST_LIMIT: usize = 200;

// ─── Poems ───────────────────────────────────────────────────────────────────

/// A poem joined to its poet. List views carry a truncated `content`;
/// the detail view carries the full text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poem {
  pub id:      i64,
  pub title:   String,
  pub content: String,
  pub author:  String,
  pub dynasty: String,
}

/// Truncate `content` to at most [`PREVIEW_CHARS`] characters.
pub fn preview(content: &str) -> String {
  match content.char_indices().nth(PREVIEW_CHARS) {
    Some((cut, _)) => content[..cut].to_owned(),
    None => content.to_owned(),
  }
}

// ─── Comments ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
  pub id:         i64,
  #[serde(rename = "poemID")]
  pub poem_id:    i64,
  pub content:    String,
  pub username:   String,
  pub created_at: DateTime<Utc>,
  /// The comment this one replies to; `None` for top-level comments.
  #[serde(rename = "parentID")]
  pub parent_id:  Option<i64>,
}

/// A validated comment ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
  pub poem_id:    i64,
  pub content:    String,
  pub username:   String,
  pub parent_id:  Option<i64>,
  pub created_at: DateTime<Utc>,
}

/// Result of a successful comment insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inserted {
  pub inserted_id: i64,
}

// ─── Relationship graph ──────────────────────────────────────────────────────

/// A poet as a graph node; `id` is the poet's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoetNode {
  pub id:      String,
  pub dynasty: String,
  pub group:   u32,
}

/// A relationship as a graph edge between two poet names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoetLink {
  pub source:   String,
  pub target:   String,
  pub relation: String,
  /// Edge weight. Whole numbers go out as JSON integers (`2`, not `2.0`).
  #[serde(serialize_with = "serialize_weight")]
  pub value:    f64,
}

fn serialize_weight<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
  let v = *value;
  if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
    serializer.serialize_i64(v as i64)
  } else {
    serializer.serialize_f64(v)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipGraph {
  pub nodes: Vec<PoetNode>,
  pub links: Vec<PoetLink>,
}

impl RelationshipGraph {
  /// Links whose `source` or `target` names no node in this graph.
  ///
  /// The storage layer does not guarantee referential integrity for
  /// relationships, so this is a data-quality signal rather than an error.
  pub fn orphan_links(&self) -> impl Iterator<Item = &PoetLink> {
    self.links.iter().filter(|link| {
      let known = |name: &str| self.nodes.iter().any(|n| n.id == name);
      !known(&link.source) || !known(&link.target)
    })
  }
}
