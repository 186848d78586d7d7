//! Row → response entity mapping.

use anthology_core::{
  Error, Result,
  dynasty::DynastyClassifier,
  model::{Comment, Poem, PoetLink, PoetNode, RelationshipGraph, preview},
  row::Row,
};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

// ─── Timestamps ──────────────────────────────────────────────────────────────

/// Fixed-width RFC 3339 (millisecond precision, `Z` suffix), so stored
/// timestamps sort lexicographically in time order.
pub fn encode_timestamp(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Accepts RFC 3339 as well as SQL-style `YYYY-MM-DD HH:MM:SS[.fff]`
/// (read as UTC).
pub fn decode_timestamp(s: &str) -> Result<DateTime<Utc>> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Ok(dt.with_timezone(&Utc));
  }
  NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
    .map(|naive| naive.and_utc())
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Poems ───────────────────────────────────────────────────────────────────

/// Full poem row; content untouched.
pub fn poem(row: &Row) -> Result<Poem> {
  Ok(Poem {
    id:      row.integer("id")?,
    title:   row.text("title")?,
    content: row.text_or_empty("content")?,
    author:  row.text("author")?,
    dynasty: row.text_or_empty("dynasty")?,
  })
}

/// Listing row; content cut to the preview length even if the backend
/// returned more.
pub fn poem_summary(row: &Row) -> Result<Poem> {
  let mut poem = poem(row)?;
  poem.content = preview(&poem.content);
  Ok(poem)
}

// ─── Comments ────────────────────────────────────────────────────────────────

pub fn comment(row: &Row) -> Result<Comment> {
  Ok(Comment {
    id:         row.integer("id")?,
    poem_id:    row.integer("poemID")?,
    content:    row.text("content")?,
    username:   row.text("username")?,
    created_at: decode_timestamp(&row.text("createdAt")?)?,
    parent_id:  row.opt_integer("parentID")?,
  })
}

// ─── Relationship graph ──────────────────────────────────────────────────────

pub fn poet_node(row: &Row, classifier: &DynastyClassifier) -> Result<PoetNode> {
  let dynasty = row.text_or_empty("dynasty")?;
  Ok(PoetNode {
    id: row.text("name")?,
    group: classifier.classify(&dynasty),
    dynasty,
  })
}

/// Endpoints are copied verbatim; they are not checked against the poet set.
pub fn poet_link(row: &Row) -> Result<PoetLink> {
  Ok(PoetLink {
    source:   row.text("poetA_name")?,
    target:   row.text("poetB_name")?,
    relation: row.text_or_empty("relation")?,
    value:    row.real("value")?,
  })
}

pub fn relationship_graph(
  poets: &[Row],
  links: &[Row],
  classifier: &DynastyClassifier,
) -> Result<RelationshipGraph> {
  Ok(RelationshipGraph {
    nodes: poets
      .iter()
      .map(|row| poet_node(row, classifier))
      .collect::<Result<_>>()?,
    links: links.iter().map(poet_link).collect::<Result<_>>()?,
  })
}

#[cfg(test)]
mod tests {
  use anthology_core::{dynasty::OTHER_GROUP, model::PREVIEW_CHARS};

  use super::*;

  fn poem_row(content: &str) -> Row {
    Row::new()
      .with("id", 1_i64)
      .with("title", "将进酒")
      .with("content", content)
      .with("author", "李白")
      .with("dynasty", "唐")
  }

  #[test]
  fn summary_truncates_but_detail_does_not() {
    let long = "君不见黄河之水天上来".repeat(20);
    let row = poem_row(&long);

    let summary = poem_summary(&row).unwrap();
    assert_eq!(summary.content.chars().count(), PREVIEW_CHARS);

    let detail = poem(&row).unwrap();
    assert_eq!(detail.content, long);
    assert_eq!(detail.author, "李白");
  }

  #[test]
  fn comment_row_maps_nullable_parent() {
    let row = Row::new()
      .with("id", 7_i64)
      .with("poemID", 1_i64)
      .with("content", "好诗")
      .with("username", "游客")
      .with("createdAt", "2024-05-01T10:00:00.250Z")
      .with("parentID", None::<i64>);
    let c = comment(&row).unwrap();
    assert_eq!(c.parent_id, None);
    assert_eq!(encode_timestamp(c.created_at), "2024-05-01T10:00:00.250Z");

    let reply = Row::new()
      .with("id", 8_i64)
      .with("poemID", 1_i64)
      .with("content", "同感")
      .with("username", "游客")
      .with("createdAt", "2024-05-01 10:05:00")
      .with("parentID", 7_i64);
    let c = comment(&reply).unwrap();
    assert_eq!(c.parent_id, Some(7));
  }

  #[test]
  fn bad_timestamp_is_a_mapping_error() {
    assert!(matches!(decode_timestamp("yesterday"), Err(Error::DateParse(_))));
  }

  #[test]
  fn encoded_timestamps_sort_in_time_order() {
    let a = decode_timestamp("2024-05-01T10:00:00Z").unwrap();
    let b = a + chrono::Duration::milliseconds(5);
    let c = a + chrono::Duration::seconds(1);
    let mut encoded = vec![encode_timestamp(c), encode_timestamp(a), encode_timestamp(b)];
    encoded.sort();
    assert_eq!(encoded, vec![encode_timestamp(a), encode_timestamp(b), encode_timestamp(c)]);
  }

  #[test]
  fn graph_uses_classifier_and_raw_names() {
    let poets = vec![
      Row::new().with("name", "李白").with("dynasty", "盛唐"),
      Row::new().with("name", "屈原").with("dynasty", "战国"),
    ];
    let links = vec![
      Row::new()
        .with("poetA_name", "李白")
        .with("poetB_name", "孟浩然")
        .with("relation", "仰慕")
        .with("value", 3_i64),
    ];
    let graph = relationship_graph(&poets, &links, &DynastyClassifier::default()).unwrap();

    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.nodes[0].group, 1);
    assert_eq!(graph.nodes[1].group, OTHER_GROUP);
    assert_eq!(graph.links[0].target, "孟浩然");
    assert_eq!(graph.links[0].value, 3.0);
    assert_eq!(graph.orphan_links().count(), 1);
  }

  #[test]
  fn missing_column_fails_the_whole_graph() {
    let poets = vec![Row::new().with("dynasty", "唐")];
    let err = relationship_graph(&poets, &[], &DynastyClassifier::default()).unwrap_err();
    assert!(matches!(err, Error::MissingColumn(_)));
  }
}
