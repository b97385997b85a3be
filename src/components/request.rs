// src/components/request.rs

use std::collections::HashSet;
use std::fmt;

/// Normalized list of requested component identifiers
///
/// Entries are trimmed, empties dropped, and repeats removed keeping the
/// first occurrence, so order follows the raw input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentRequest {
    ids: Vec<String>,
}

impl ComponentRequest {
    /// Parse a raw comma-separated list such as `"cloud-run-proxy, beta"`
    pub fn parse(raw: &str) -> Self {
        let mut seen = HashSet::new();
        let ids = raw
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .filter(|id| seen.insert(*id))
            .map(String::from)
            .collect();
        Self { ids }
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

/// Canonical comma-separated form; parsing it yields the same request
impl fmt::Display for ComponentRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ids.join(","))
    }
}

impl<S: AsRef<str>> FromIterator<S> for ComponentRequest {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let joined: Vec<String> = iter.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse(&joined.join(","))
    }
}
