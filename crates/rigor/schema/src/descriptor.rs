//! Validated (name, value, constraint) triples.

use rigor_types::{ArgumentTypeError, TraitSet, Value};

use crate::constraint::Constraint;

/// One declared field of one construction: a name, the runtime value bound
/// to it, and the parsed constraint. Construction applies the admission rule
/// immediately; a descriptor that exists has already passed it.
///
/// The name may be rewritten once by the composer (privacy renaming) before
/// the value is attached to an instance.
#[derive(Clone, Debug)]
pub struct Descriptor {
    name: String,
    value: Value,
    constraint: Constraint,
}

impl Descriptor {
    /// Validate `value` against `constraint`. `owner` names the declaring
    /// entry point in the error.
    pub fn new(
        owner: &str,
        name: impl Into<String>,
        value: Value,
        constraint: Constraint,
    ) -> Result<Self, ArgumentTypeError> {
        let name = name.into();
        if !constraint.admits(&value) {
            return Err(ArgumentTypeError {
                function: owner.to_string(),
                argument: name,
                expected: constraint.kinds.clone(),
                received: value.kind(),
            });
        }
        Ok(Self {
            name,
            value,
            constraint,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rewrite the field name. Used by the composer for privacy renaming.
    pub fn rename(&mut self, name: String) {
        self.name = name;
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    pub fn traits(&self) -> &TraitSet {
        &self.constraint.traits
    }

    /// Consume into the (possibly renamed) name/value pair to attach.
    pub fn into_parts(self) -> (String, Value) {
        (self.name, self.value)
    }
}
