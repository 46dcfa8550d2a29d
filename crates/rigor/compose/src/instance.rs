//! Composed instances.
//!
//! An `Instance` is the dynamic record a construction produces: named fields
//! plus the shared per-type capability state. Conversion, rendering,
//! container, and comparison behaviors consult the state; a capability that
//! was never installed for the type answers `None`, `false`, or the fallback
//! rendering rather than existing at all.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use rigor_types::{ContainerError, TraitName, Value};

use crate::state::TypeState;

/// A composed dynamic record.
#[derive(Clone, Debug)]
pub struct Instance {
    type_name: String,
    fields: BTreeMap<String, Value>,
    state: Arc<TypeState>,
}

/// Failures of capability operations on an instance.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InstanceError {
    #[error("type '{type_name}' does not support {operation}")]
    Unsupported {
        type_name: String,
        operation: &'static str,
    },

    #[error(transparent)]
    Container(#[from] ContainerError),
}

impl Instance {
    pub(crate) fn new(
        type_name: String,
        fields: BTreeMap<String, Value>,
        state: Arc<TypeState>,
    ) -> Self {
        Self {
            type_name,
            fields,
            state,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Look up a field by its stored name. Privacy-renamed fields are only
    /// reachable through their qualified name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields.get_mut(name)
    }

    /// Attach or overwrite a field. Constructor bodies use this for derived
    /// fields; no validation or capability wiring applies here.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Whether a capability is installed for this instance's type.
    pub fn supports(&self, name: TraitName) -> bool {
        match name {
            TraitName::String => !self.state.string_fields.is_empty(),
            other => self.state.backing_field(other).is_some(),
        }
    }

    fn backing(&self, name: TraitName) -> Option<&Value> {
        self.state
            .backing_field(name)
            .and_then(|field| self.fields.get(field))
    }

    /// Boolean conversion: truthiness of the backing field, when installed.
    pub fn as_bool(&self) -> Option<bool> {
        self.backing(TraitName::Boolean).map(Value::truthy)
    }

    /// Integer conversion through the backing field, when installed.
    pub fn to_int(&self) -> Option<i64> {
        self.backing(TraitName::Number).and_then(Value::as_int)
    }

    /// Float conversion through the backing field, when installed.
    pub fn to_float(&self) -> Option<f64> {
        self.backing(TraitName::Number).and_then(Value::as_float)
    }

    /// Container length, when installed.
    pub fn len(&self) -> Option<usize> {
        self.backing(TraitName::Container).and_then(Value::len)
    }

    pub fn is_empty(&self) -> Option<bool> {
        self.len().map(|n| n == 0)
    }

    /// Membership test against the backing container.
    pub fn contains(&self, item: &Value) -> bool {
        self.backing(TraitName::Container)
            .is_some_and(|value| value.contains(item))
    }

    /// Index lookup on the backing container.
    pub fn get_item(&self, key: &Value) -> Option<Value> {
        self.backing(TraitName::Container)
            .and_then(|value| value.item(key))
    }

    /// Index assignment on the backing container.
    pub fn set_item(&mut self, key: &Value, value: Value) -> Result<(), InstanceError> {
        let field = self.container_field("item assignment")?;
        self.fields
            .get_mut(&field)
            .ok_or(InstanceError::Unsupported {
                type_name: self.type_name.clone(),
                operation: "item assignment",
            })?
            .set_item(key, value)
            .map_err(Into::into)
    }

    /// Index deletion on the backing container.
    pub fn del_item(&mut self, key: &Value) -> Result<(), InstanceError> {
        let field = self.container_field("item deletion")?;
        self.fields
            .get_mut(&field)
            .ok_or(InstanceError::Unsupported {
                type_name: self.type_name.clone(),
                operation: "item deletion",
            })?
            .del_item(key)
            .map_err(Into::into)
    }

    /// Forward iteration over the backing container, when installed.
    pub fn items(&self) -> Option<Vec<Value>> {
        self.backing(TraitName::Container).and_then(Value::items)
    }

    /// Reverse iteration over the backing container, when installed.
    pub fn items_rev(&self) -> Option<Vec<Value>> {
        self.items().map(|mut items| {
            items.reverse();
            items
        })
    }

    fn container_field(&self, operation: &'static str) -> Result<String, InstanceError> {
        self.state
            .backing_field(TraitName::Container)
            .map(str::to_string)
            .ok_or(InstanceError::Unsupported {
                type_name: self.type_name.clone(),
                operation,
            })
    }
}

impl fmt::Display for Instance {
    /// `<TypeName: field1=value1, field2=value2>` over the declared string
    /// fields; types without the string capability render as `<TypeName>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.state.string_fields.is_empty() {
            return write!(f, "<{}>", self.type_name);
        }
        write!(f, "<{}: ", self.type_name)?;
        for (i, field) in self.state.string_fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match self.fields.get(field) {
                Some(value) => write!(f, "{field}={value}")?,
                None => write!(f, "{field}=none")?,
            }
        }
        f.write_str(">")
    }
}

impl PartialEq for Instance {
    /// Equality compares the backing field between instances of the same
    /// type; without the compare capability instances are never equal.
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Instance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.type_name != other.type_name {
            return None;
        }
        let a = self.backing(TraitName::Compare)?;
        let b = other.backing(TraitName::Compare)?;
        a.partial_cmp(b)
    }
}

impl<'a> IntoIterator for &'a Instance {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    /// Iterates the backing container; empty for types without it.
    fn into_iter(self) -> Self::IntoIter {
        self.items().unwrap_or_default().into_iter()
    }
}
