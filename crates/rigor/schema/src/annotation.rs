//! The raw declaration syntax attached to a parameter.

use serde::{Deserialize, Serialize};

use rigor_types::Kind;

/// A declared expectation in its raw, heterogeneous form: a single concrete
/// kind, a whitespace-separated keyword string, or a group mixing both.
///
/// In schema files the variants deserialize untagged, so `"int"` is a kind
/// and `"private nonable"` is a keyword string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Annotation {
    Kind(Kind),
    Keywords(String),
    Group(Vec<Annotation>),
}

impl Annotation {
    /// A group mixing kinds and keyword strings.
    pub fn group<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Annotation>,
    {
        Annotation::Group(items.into_iter().map(Into::into).collect())
    }
}

impl From<Kind> for Annotation {
    fn from(kind: Kind) -> Self {
        Annotation::Kind(kind)
    }
}

impl From<&str> for Annotation {
    fn from(keywords: &str) -> Self {
        Annotation::Keywords(keywords.to_string())
    }
}

impl From<String> for Annotation {
    fn from(keywords: String) -> Self {
        Annotation::Keywords(keywords)
    }
}

impl From<Vec<Annotation>> for Annotation {
    fn from(items: Vec<Annotation>) -> Self {
        Annotation::Group(items)
    }
}
