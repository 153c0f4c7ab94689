//! Account identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An account name.
///
/// Names order lexicographically; member iteration and payout cursors rely on
/// that ordering. The empty name sorts before every other name and marks a
/// cursor that has not started yet.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Name(String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The empty name.
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Name {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Name {
    fn from(name: String) -> Self {
        Self(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sorts_first() {
        assert!(Name::empty() < Name::from("a"));
        assert!(Name::empty().is_empty());
        assert_eq!(Name::default(), Name::empty());
    }

    #[test]
    fn test_lexicographic_order() {
        let mut names = vec![Name::from("carol"), Name::from("alice"), Name::from("bob")];
        names.sort();
        assert_eq!(
            names,
            vec![Name::from("alice"), Name::from("bob"), Name::from("carol")]
        );
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Name::from("alice")).expect("serialize");
        assert_eq!(json, "\"alice\"");
    }
}
