//! The [`Curie`] identifier type and namespace-bucket derivation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A compact URI identifying an ontology term, e.g. `GO:0008150`.
///
/// Any string is a valid `Curie`. Namespace derivation is total: malformed
/// identifiers land in their own bucket and fail at lookup time instead of
/// at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Curie(String);

impl Curie {
  pub fn new(s: impl Into<String>) -> Self {
    Self(s.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// The prefix before the first `:`, or `None` when there is no colon.
  pub fn prefix(&self) -> Option<&str> {
    self.0.split_once(':').map(|(p, _)| p)
  }

  /// The namespace bucket this CURIE's cache entries belong to.
  ///
  /// The prefix lower-cased, or the whole identifier when there is no
  /// colon. Path separators are replaced and an empty result maps to
  /// `unprefixed`, so a bucket is always a single usable path component.
  pub fn namespace(&self) -> String {
    let raw = self.prefix().unwrap_or(&self.0);
    let bucket: String = raw
      .to_lowercase()
      .chars()
      .map(|c| if c == '/' || c == '\\' { '_' } else { c })
      .collect();

    if bucket.is_empty() {
      "unprefixed".to_string()
    } else {
      bucket
    }
  }
}

impl fmt::Display for Curie {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for Curie {
  fn from(s: &str) -> Self {
    Self::new(s)
  }
}

impl From<String> for Curie {
  fn from(s: String) -> Self {
    Self(s)
  }
}
