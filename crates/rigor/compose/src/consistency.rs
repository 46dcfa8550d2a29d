//! Trait consistency rules.
//!
//! Each of boolean/number/container/compare selects exactly one backing
//! field per type; a second claim would make the installed behavior
//! ambiguous. `local` requests no capability at all, so combining it with
//! capability traits is contradictory on its face.

use rigor_types::{AnnotationError, TraitName, TraitSet};

/// Check one descriptor's traits against the traits already claimed in this
/// construction pass, then merge them in.
pub fn check(seen: &mut TraitSet, new: &TraitSet) -> Result<(), AnnotationError> {
    if new.contains(TraitName::Local) {
        let incompatible = new.intersect(&TraitName::LOCAL_INCOMPATIBLE);
        if !incompatible.is_empty() {
            return Err(AnnotationError::LocalConflict {
                traits: incompatible.into(),
            });
        }
    }

    let reclaimed: Vec<TraitName> = new
        .intersect(&TraitName::UNIQUE)
        .into_iter()
        .filter(|name| seen.contains(*name))
        .collect();
    if !reclaimed.is_empty() {
        return Err(AnnotationError::DuplicateTrait {
            traits: reclaimed.into(),
        });
    }

    seen.extend(new);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[TraitName]) -> TraitSet {
        names.iter().copied().collect()
    }

    #[test]
    fn test_local_conflicts_with_capability_traits() {
        let mut seen = TraitSet::new();
        let err = check(&mut seen, &set(&[TraitName::Local, TraitName::Boolean])).unwrap_err();
        assert_eq!(
            err,
            AnnotationError::LocalConflict {
                traits: vec![TraitName::Boolean].into(),
            }
        );
        // A rejected descriptor claims nothing.
        assert!(seen.is_empty());
    }

    #[test]
    fn test_local_alone_is_fine() {
        let mut seen = TraitSet::new();
        check(&mut seen, &set(&[TraitName::Local])).unwrap();
        check(&mut seen, &set(&[TraitName::Local, TraitName::Nonable])).unwrap();
    }

    #[test]
    fn test_unique_traits_claimed_once() {
        let mut seen = TraitSet::new();
        check(&mut seen, &set(&[TraitName::Boolean])).unwrap();
        let err = check(&mut seen, &set(&[TraitName::Boolean])).unwrap_err();
        assert_eq!(
            err,
            AnnotationError::DuplicateTrait {
                traits: vec![TraitName::Boolean].into(),
            }
        );
    }

    #[test]
    fn test_string_may_repeat() {
        let mut seen = TraitSet::new();
        check(&mut seen, &set(&[TraitName::String])).unwrap();
        check(&mut seen, &set(&[TraitName::String])).unwrap();
    }

    #[test]
    fn test_private_combines_with_unique_traits() {
        let mut seen = TraitSet::new();
        check(&mut seen, &set(&[TraitName::Private, TraitName::Compare])).unwrap();
        check(&mut seen, &set(&[TraitName::Private, TraitName::Boolean])).unwrap();
    }
}
