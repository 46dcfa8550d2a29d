//! Rigor Schema - Declared expectations as plain data
//!
//! Annotations are the raw declaration syntax (a kind, a keyword string, or
//! a group mixing both); constraints are their parsed form; descriptors pair
//! a name and value with a constraint, validating at construction; call
//! schemas are the explicit signature descriptors the enforcement layers
//! consume in place of reflective introspection.

#![deny(unsafe_code)]

pub mod annotation;
pub mod constraint;
pub mod descriptor;
pub mod signature;

pub use annotation::Annotation;
pub use constraint::Constraint;
pub use descriptor::Descriptor;
pub use signature::{CallSchema, ParamSpec, SchemaError, SignatureSource};
