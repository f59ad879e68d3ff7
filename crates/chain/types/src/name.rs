//! Identifiers: declaration names and resolution run ids

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Name of a declaration or of an external service
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Name {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Name {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&Name> for Name {
    fn from(name: &Name) -> Self {
        name.clone()
    }
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Unique identifier for one resolution run
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolutionId(pub String);

impl ResolutionId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// First eight characters, for log lines and summaries
    pub fn short(&self) -> &str {
        self.0
            .char_indices()
            .nth(8)
            .map_or(&self.0[..], |(end, _)| &self.0[..end])
    }
}

impl std::fmt::Display for ResolutionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_name_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(Name::new("alpha"), 1);
        assert_eq!(map.get("alpha"), Some(&1));
    }

    #[test]
    fn test_name_serializes_as_plain_string() {
        let json = serde_json::to_string(&Name::new("svc")).unwrap();
        assert_eq!(json, "\"svc\"");
    }

    #[test]
    fn test_resolution_id_short() {
        let id = ResolutionId::generate();
        assert_eq!(id.short().len(), 8);
        assert_eq!(ResolutionId::new("abc").short(), "abc");
    }

    #[test]
    fn test_resolution_id_short_multibyte() {
        assert_eq!(ResolutionId::new("aéééé").short(), "aéééé");
        assert_eq!(ResolutionId::new("aéééééééé").short(), "aééééééé");
        assert_eq!(ResolutionId::new("運用-識別子-長い").short(), "運用-識別子-長");
    }
}
