//! Hierarchical document paths
//!
//! A path alternates collection and document segments:
//! `collection/documentId/subcollection/documentId/...`. A [`CollectionPath`]
//! always has an odd number of segments, a [`DocumentPath`] an even number.

use crate::{Error, Result};
use std::fmt;

fn check_segment(segment: &str) -> Result<()> {
    if segment.is_empty() {
        return Err(Error::InvalidPath("empty path segment".to_string()));
    }
    if segment.contains('/') {
        return Err(Error::InvalidPath(format!(
            "segment '{segment}' must not contain '/'"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath {
    segments: Vec<String>,
}

impl CollectionPath {
    /// Top-level collection.
    pub fn root(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        check_segment(&name)?;
        Ok(Self {
            segments: vec![name],
        })
    }

    /// Document `id` inside this collection.
    pub fn doc(&self, id: impl Into<String>) -> Result<DocumentPath> {
        let id = id.into();
        check_segment(&id)?;
        let mut segments = self.segments.clone();
        segments.push(id);
        Ok(DocumentPath { segments })
    }

    pub fn as_string(&self) -> String {
        self.segments.join("/")
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentPath {
    segments: Vec<String>,
}

impl DocumentPath {
    pub fn id(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Collection holding this document.
    pub fn parent(&self) -> CollectionPath {
        CollectionPath {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        }
    }

    /// Sub-collection `name` nested under this document.
    pub fn collection(&self, name: impl Into<String>) -> Result<CollectionPath> {
        let name = name.into();
        check_segment(&name)?;
        let mut segments = self.segments.clone();
        segments.push(name);
        Ok(CollectionPath { segments })
    }

    pub fn as_string(&self) -> String {
        self.segments.join("/")
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_nested_paths() {
        let surveys = CollectionPath::root("surveys_acme").unwrap();
        let survey = surveys.doc("s1").unwrap();
        let responses = survey.collection("responses").unwrap();
        let response = responses.doc("r1").unwrap();

        assert_eq!(response.as_string(), "surveys_acme/s1/responses/r1");
        assert_eq!(response.id(), "r1");
        assert_eq!(response.parent(), responses);
        assert_eq!(survey.parent(), surveys);
    }

    #[test]
    fn rejects_bad_segments() {
        let surveys = CollectionPath::root("surveys").unwrap();
        assert!(matches!(surveys.doc(""), Err(Error::InvalidPath(_))));
        assert!(matches!(surveys.doc("a/b"), Err(Error::InvalidPath(_))));
        assert!(CollectionPath::root("").is_err());
    }
}
