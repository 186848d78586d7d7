//! Dynasty → graph group classification.
//!
//! The relationship graph colours poets by era. Dynasty labels are free text
//! ("盛唐", "北宋", "东汉末年", ...), so classification is substring
//! containment evaluated against an ordered rule list: the first rule whose
//! pattern occurs in the label wins. Containment checks are not mutually
//! exclusive, so the order of the list is part of its meaning.

use serde::{Deserialize, Serialize};

/// Group assigned to labels that match no rule.
pub const OTHER_GROUP: u32 = 99;

/// A single `(pattern, group)` classification rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynastyRule {
  pub pattern: String,
  pub group:   u32,
}

impl DynastyRule {
  pub fn new(pattern: impl Into<String>, group: u32) -> Self {
    Self {
      pattern: pattern.into(),
      group,
    }
  }
}

/// Canonical priority list, highest priority first.
pub const CANONICAL_RULES: &[(&str, u32)] = &[
  ("唐", 1),
  ("宋", 2),
  ("清", 3),
  ("明", 4),
  ("魏晋", 5),
  ("汉", 6),
];

/// Ordered, first-match-wins dynasty classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynastyClassifier {
  rules: Vec<DynastyRule>,
}

impl Default for DynastyClassifier {
  fn default() -> Self {
    Self::new(
      CANONICAL_RULES
        .iter()
        .map(|(pattern, group)| DynastyRule::new(*pattern, *group)),
    )
  }
}

impl DynastyClassifier {
  /// Build a classifier from rules given in priority order. Rules with an
  /// empty pattern would match every label and are dropped.
  pub fn new(rules: impl IntoIterator<Item = DynastyRule>) -> Self {
    Self {
      rules: rules.into_iter().filter(|r| !r.pattern.is_empty()).collect(),
    }
  }

  pub fn rules(&self) -> &[DynastyRule] { &self.rules }

  /// Group id for `dynasty`, or [`OTHER_GROUP`] if no rule matches.
  pub fn classify(&self, dynasty: &str) -> u32 {
    self
      .rules
      .iter()
      .find(|rule| dynasty.contains(rule.pattern.as_str()))
      .map_or(OTHER_GROUP, |rule| rule.group)
  }
}
