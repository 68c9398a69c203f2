//! Part entity - a named byte blob uploaded alongside a Workers script
//!
//! `Parts` is shared between binding resolution (wasm modules) and import
//! rewriting (imported assets) within one push. It keeps insertion order so
//! uploads are deterministic.

use indexmap::IndexMap;

use crate::error::{EdgeError, EdgeResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Logical name, referenced by bindings and rewritten imports
    pub name: String,
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl Part {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            file_name: None,
            bytes,
            content_type: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Ordered part map keyed by logical name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parts {
    parts: IndexMap<String, Part>,
}

impl Parts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a part
    ///
    /// Registering the same name twice is accepted only when the bytes are
    /// identical (the same asset imported from two modules).
    pub fn insert(&mut self, part: Part) -> EdgeResult<()> {
        if let Some(existing) = self.parts.get(&part.name) {
            if existing.bytes == part.bytes {
                return Ok(());
            }
            return Err(EdgeError::DuplicatePart { name: part.name });
        }
        self.parts.insert(part.name.clone(), part);
        Ok(())
    }

    /// Look up a part that something else refers to
    pub fn require(&self, name: &str) -> EdgeResult<&Part> {
        self.parts.get(name).ok_or_else(|| EdgeError::PartMissingBytes {
            name: name.to_string(),
        })
    }

    pub fn get(&self, name: &str) -> Option<&Part> {
        self.parts.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parts.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Part> {
        self.parts.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<Part> {
        self.parts.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order() {
        let mut parts = Parts::new();
        parts.insert(Part::new("b", vec![1])).unwrap();
        parts.insert(Part::new("a", vec![2])).unwrap();
        assert_eq!(parts.names().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn identical_reinsert_is_a_noop() {
        let mut parts = Parts::new();
        parts.insert(Part::new("a", vec![1, 2])).unwrap();
        parts.insert(Part::new("a", vec![1, 2])).unwrap();
        assert_eq!(parts.len(), 1);
    }

    #[test]
    fn conflicting_reinsert_fails() {
        let mut parts = Parts::new();
        parts.insert(Part::new("a", vec![1])).unwrap();
        let err = parts.insert(Part::new("a", vec![2])).unwrap_err();
        assert_eq!(err.kind(), "duplicate-part");
    }

    #[test]
    fn require_reports_missing_part() {
        let parts = Parts::new();
        let err = parts.require("W").unwrap_err();
        assert_eq!(err.kind(), "part-missing-bytes");
    }
}
