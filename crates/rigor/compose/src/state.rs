//! Per-type capability state.

use rigor_types::TraitName;

/// What one type's first successful construction wired up: which field backs
/// each single-field capability, which fields contribute to rendering, and
/// whether finalization happened. Created lazily on the first construction
/// of a type and immutable once finalized.
#[derive(Clone, Debug, Default)]
pub struct TypeState {
    pub(crate) bool_field: Option<String>,
    pub(crate) number_field: Option<String>,
    pub(crate) items_field: Option<String>,
    pub(crate) compare_field: Option<String>,
    pub(crate) string_fields: Vec<String>,
    pub(crate) initialized: bool,
}

impl TypeState {
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The field backing a single-field capability, if installed.
    pub fn backing_field(&self, name: TraitName) -> Option<&str> {
        match name {
            TraitName::Boolean => self.bool_field.as_deref(),
            TraitName::Number => self.number_field.as_deref(),
            TraitName::Container => self.items_field.as_deref(),
            TraitName::Compare => self.compare_field.as_deref(),
            _ => None,
        }
    }

    /// Fields contributing to string rendering, in declaration order.
    pub fn string_fields(&self) -> &[String] {
        &self.string_fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backing_field_lookup() {
        let state = TypeState {
            bool_field: Some("count".to_string()),
            ..TypeState::default()
        };
        assert_eq!(state.backing_field(TraitName::Boolean), Some("count"));
        assert_eq!(state.backing_field(TraitName::Compare), None);
        assert_eq!(state.backing_field(TraitName::Private), None);
    }
}
