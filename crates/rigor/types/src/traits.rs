//! The trait vocabulary fields are declared with.
//!
//! A trait names a capability request attached to one field: "this field
//! backs boolean conversion", "this field must stay private", and so on.
//! `nonable` is the nullability token; it travels with the trait set so the
//! consistency checker sees the full declaration.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A named capability request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraitName {
    Private,
    Boolean,
    Number,
    String,
    Container,
    Compare,
    Local,
    Nonable,
}

impl TraitName {
    /// Traits that cannot co-occur with `local` on one field.
    pub const LOCAL_INCOMPATIBLE: [TraitName; 6] = [
        TraitName::Private,
        TraitName::Boolean,
        TraitName::Number,
        TraitName::String,
        TraitName::Container,
        TraitName::Compare,
    ];

    /// Traits that may back at most one field per type.
    pub const UNIQUE: [TraitName; 4] = [
        TraitName::Boolean,
        TraitName::Number,
        TraitName::Container,
        TraitName::Compare,
    ];

    /// The keyword written in annotations.
    pub fn token(self) -> &'static str {
        match self {
            TraitName::Private => "private",
            TraitName::Boolean => "boolean",
            TraitName::Number => "number",
            TraitName::String => "string",
            TraitName::Container => "container",
            TraitName::Compare => "compare",
            TraitName::Local => "local",
            TraitName::Nonable => "nonable",
        }
    }

    pub fn from_token(token: &str) -> Option<TraitName> {
        match token {
            "private" => Some(TraitName::Private),
            "boolean" => Some(TraitName::Boolean),
            "number" => Some(TraitName::Number),
            "string" => Some(TraitName::String),
            "container" => Some(TraitName::Container),
            "compare" => Some(TraitName::Compare),
            "local" => Some(TraitName::Local),
            "nonable" => Some(TraitName::Nonable),
            _ => None,
        }
    }
}

impl fmt::Display for TraitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// The set of traits declared on one field, or accumulated over one
/// construction pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitSet(BTreeSet<TraitName>);

impl TraitSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: TraitName) {
        self.0.insert(name);
    }

    pub fn contains(&self, name: TraitName) -> bool {
        self.0.contains(&name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = TraitName> + '_ {
        self.0.iter().copied()
    }

    /// Merge another set into this one.
    pub fn extend(&mut self, other: &TraitSet) {
        self.0.extend(other.iter());
    }

    /// Members of `candidates` present in this set, in `candidates` order.
    pub fn intersect(&self, candidates: &[TraitName]) -> Vec<TraitName> {
        candidates
            .iter()
            .copied()
            .filter(|name| self.contains(*name))
            .collect()
    }
}

impl FromIterator<TraitName> for TraitSet {
    fn from_iter<I: IntoIterator<Item = TraitName>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Ordered trait names rendered quoted in error messages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraitList(Vec<TraitName>);

impl TraitList {
    pub fn names(&self) -> &[TraitName] {
        &self.0
    }
}

impl fmt::Display for TraitList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "'{name}'")?;
        }
        Ok(())
    }
}

impl From<Vec<TraitName>> for TraitList {
    fn from(names: Vec<TraitName>) -> Self {
        Self(names)
    }
}
