//! Explicit signature descriptors.
//!
//! A `CallSchema` is the ordered parameter list, per-parameter annotations,
//! defaults, and return annotation the enforcement layers consume. It is
//! declared by the caller (in code or loaded from a schema file) instead of
//! recovered by reflection over the callable.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use rigor_types::Value;

use crate::annotation::Annotation;

/// One declared parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<Annotation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// The declared signature of a callable or constructor.
///
/// For a constructor, `function` doubles as the type name and the receiver
/// flag is irrelevant. For a wrapped method, `receiver: true` marks that the
/// call's argument 0 is the receiver and is never validated; `params` lists
/// only the declared parameters after it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CallSchema {
    pub function: String,
    #[serde(default)]
    pub receiver: bool,
    #[serde(default)]
    pub params: Vec<ParamSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<Annotation>,
}

impl CallSchema {
    /// Schema for a free function.
    pub fn function(name: impl Into<String>) -> Self {
        Self {
            function: name.into(),
            receiver: false,
            params: Vec::new(),
            returns: None,
        }
    }

    /// Schema for a method; argument 0 is the receiver and is skipped.
    pub fn method(name: impl Into<String>) -> Self {
        Self {
            receiver: true,
            ..Self::function(name)
        }
    }

    /// Schema for a constructor; the function name is the type name.
    pub fn constructor(type_name: impl Into<String>) -> Self {
        Self::function(type_name)
    }

    /// Append an annotated parameter.
    pub fn param(mut self, name: impl Into<String>, annotation: impl Into<Annotation>) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            annotation: Some(annotation.into()),
            default: None,
        });
        self
    }

    /// Append an unannotated parameter; its values pass unchecked.
    pub fn plain(mut self, name: impl Into<String>) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            annotation: None,
            default: None,
        });
        self
    }

    /// Append an annotated parameter with a default value.
    pub fn param_default(
        mut self,
        name: impl Into<String>,
        annotation: impl Into<Annotation>,
        default: impl Into<Value>,
    ) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            annotation: Some(annotation.into()),
            default: Some(default.into()),
        });
        self
    }

    /// Declare the return annotation.
    pub fn returns(mut self, annotation: impl Into<Annotation>) -> Self {
        self.returns = Some(annotation.into());
        self
    }

    /// Pad missing trailing arguments from declared defaults. Extra
    /// arguments beyond the declared parameters pass through untouched.
    pub fn fill_defaults(&self, mut args: Vec<Value>) -> Result<Vec<Value>, SchemaError> {
        for param in self.params.iter().skip(args.len()) {
            match &param.default {
                Some(default) => args.push(default.clone()),
                None => {
                    return Err(SchemaError::MissingArgument {
                        function: self.function.clone(),
                        argument: param.name.clone(),
                    })
                }
            }
        }
        Ok(args)
    }
}

/// A source of signature descriptors. `CallSchema` is its own source; other
/// providers (schema files, registries) implement this seam.
pub trait SignatureSource {
    fn signature(&self) -> &CallSchema;
}

impl SignatureSource for CallSchema {
    fn signature(&self) -> &CallSchema {
        self
    }
}

/// Structural problems resolving arguments against a schema.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("missing argument '{argument}' for '{function}'")]
    MissingArgument { function: String, argument: String },
}
