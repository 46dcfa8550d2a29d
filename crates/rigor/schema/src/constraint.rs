//! Parsed expectations: acceptable kinds, nullability, requested traits.

use serde::{Deserialize, Serialize};
use tracing::warn;

use rigor_types::{Kind, KindSet, TraitName, TraitSet, Value};

use crate::annotation::Annotation;

/// A single declared expectation. An empty kind set means the value is not
/// checked; traits request capability installation; `nullable` admits the
/// absent value regardless of the kind set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub kinds: KindSet,
    pub nullable: bool,
    pub traits: TraitSet,
}

impl Constraint {
    /// Parse a raw annotation. Kinds accumulate into the kind set; keyword
    /// strings split on whitespace into trait tokens; the `nonable` token
    /// additionally sets nullability. Unrecognized tokens are inert.
    pub fn parse(annotation: &Annotation) -> Self {
        let mut constraint = Constraint::default();
        constraint.absorb(annotation);
        constraint
    }

    /// Absent annotation parses to the empty constraint: nothing is checked.
    pub fn parse_opt(annotation: Option<&Annotation>) -> Self {
        annotation.map(Self::parse).unwrap_or_default()
    }

    fn absorb(&mut self, annotation: &Annotation) {
        match annotation {
            Annotation::Kind(kind) => self.kinds.insert(*kind),
            Annotation::Keywords(keywords) => {
                for token in keywords.split_whitespace() {
                    match TraitName::from_token(token) {
                        Some(TraitName::Nonable) => {
                            self.nullable = true;
                            self.traits.insert(TraitName::Nonable);
                        }
                        Some(name) => self.traits.insert(name),
                        None => warn!(token, "ignoring unrecognized trait token"),
                    }
                }
            }
            Annotation::Group(items) => {
                for item in items {
                    self.absorb(item);
                }
            }
        }
    }

    /// True when no kind checking applies.
    pub fn is_unchecked(&self) -> bool {
        self.kinds.is_empty()
    }

    /// The admission rule: an empty kind set admits everything; otherwise the
    /// value's kind must be listed, or the value must be absent under a
    /// nullable constraint.
    pub fn admits(&self, value: &Value) -> bool {
        if self.kinds.is_empty() {
            return true;
        }
        self.kinds.contains(value.kind()) || (self.nullable && value.is_none())
    }
}
