//! The capability composer.
//!
//! One composer owns the per-type capability states. Each construction runs
//! the descriptor pipeline over the declared parameters, and the first
//! construction of a type additionally records the capability wiring. Field
//! assignment happens on every construction; capability installation happens
//! once per type.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use thiserror::Error;
use tracing::{debug, trace};

use rigor_schema::{CallSchema, Constraint, Descriptor, SchemaError};
use rigor_types::{AnnotationError, ArgumentTypeError, Switch, TraitName, TraitSet, Value};

use crate::consistency;
use crate::instance::Instance;
use crate::state::TypeState;

/// The declaring entry point named in construction-time argument errors.
const INIT_FN: &str = "init";

/// Composes capabilities onto types and produces instances.
pub struct Composer {
    registry: RwLock<HashMap<String, Arc<TypeState>>>,
    switch: Switch,
}

/// Errors from the construction pipeline.
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error(transparent)]
    Argument(#[from] ArgumentTypeError),

    #[error(transparent)]
    Annotation(#[from] AnnotationError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("lock error")]
    LockError,
}

impl Composer {
    /// A composer observing the process-wide enforcement switch.
    pub fn new() -> Self {
        Self::with_switch(Switch::default())
    }

    /// A composer observing its own switch handle.
    pub fn with_switch(switch: Switch) -> Self {
        Self {
            registry: RwLock::new(HashMap::new()),
            switch,
        }
    }

    pub fn switch(&self) -> &Switch {
        &self.switch
    }

    /// Whether a type has been finalized by a successful construction.
    pub fn is_initialized(&self, type_name: &str) -> bool {
        self.registry
            .read()
            .map(|reg| reg.get(type_name).is_some_and(|s| s.initialized))
            .unwrap_or(false)
    }

    /// Construct an instance of the schema's type from positional arguments.
    pub fn construct(&self, schema: &CallSchema, args: Vec<Value>) -> Result<Instance, ComposeError> {
        self.construct_with(schema, args, |_| {})
    }

    /// Construct an instance, then run the original constructor body on it.
    /// The body always runs, enforcement switch or not.
    pub fn construct_with<F>(
        &self,
        schema: &CallSchema,
        args: Vec<Value>,
        body: F,
    ) -> Result<Instance, ComposeError>
    where
        F: FnOnce(&mut Instance),
    {
        let type_name = schema.function.as_str();
        let args = schema.fill_defaults(args)?;

        if !self.switch.is_enabled() {
            trace!(type_name, "enforcement disabled, assigning fields unchecked");
            let mut fields = BTreeMap::new();
            for (param, value) in schema.params.iter().zip(args) {
                fields.insert(param.name.clone(), value);
            }
            let state = self.state_or_empty(type_name)?;
            let mut instance = Instance::new(type_name.to_string(), fields, state);
            body(&mut instance);
            return Ok(instance);
        }

        let finalized = self.lookup(type_name)?;
        let installing = finalized.is_none();
        let mut working = TypeState::default();
        let mut seen = TraitSet::new();
        let mut fields = BTreeMap::new();

        for (param, value) in schema.params.iter().zip(args) {
            let constraint = Constraint::parse_opt(param.annotation.as_ref());
            let mut descriptor = Descriptor::new(INIT_FN, param.name.as_str(), value, constraint)?;
            consistency::check(&mut seen, descriptor.traits())?;

            // Renaming precedes backing-field recording, so installed
            // capabilities address the stored name.
            if descriptor.traits().contains(TraitName::Private) {
                descriptor.rename(private_name(type_name, descriptor.name()));
            }

            if installing {
                install(&mut working, type_name, &descriptor);
            }

            let (name, value) = descriptor.into_parts();
            fields.insert(name, value);
        }

        let state = match finalized {
            Some(state) => state,
            None => {
                working.initialized = true;
                debug!(type_name, "type finalized");
                self.finalize(type_name, working)?
            }
        };

        let mut instance = Instance::new(type_name.to_string(), fields, state);
        body(&mut instance);
        Ok(instance)
    }

    fn lookup(&self, type_name: &str) -> Result<Option<Arc<TypeState>>, ComposeError> {
        Ok(self
            .registry
            .read()
            .map_err(|_| ComposeError::LockError)?
            .get(type_name)
            .cloned())
    }

    fn state_or_empty(&self, type_name: &str) -> Result<Arc<TypeState>, ComposeError> {
        Ok(self
            .lookup(type_name)?
            .unwrap_or_else(|| Arc::new(TypeState::default())))
    }

    fn finalize(&self, type_name: &str, state: TypeState) -> Result<Arc<TypeState>, ComposeError> {
        let mut registry = self.registry.write().map_err(|_| ComposeError::LockError)?;
        // Another thread may have finalized the type meanwhile; first write wins.
        Ok(registry
            .entry(type_name.to_string())
            .or_insert_with(|| Arc::new(state))
            .clone())
    }
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

/// Record one descriptor's capability wiring into the working state.
fn install(state: &mut TypeState, type_name: &str, descriptor: &Descriptor) {
    let field = descriptor.name();
    for name in descriptor.traits().iter() {
        match name {
            TraitName::Boolean => {
                debug!(type_name, field, "installing boolean capability");
                state.bool_field = Some(field.to_string());
            }
            TraitName::Number => {
                debug!(type_name, field, "installing number capability");
                state.number_field = Some(field.to_string());
            }
            TraitName::Container => {
                debug!(type_name, field, "installing container capability");
                state.items_field = Some(field.to_string());
            }
            TraitName::Compare => {
                debug!(type_name, field, "installing compare capability");
                state.compare_field = Some(field.to_string());
            }
            TraitName::String => {
                state.string_fields.push(field.to_string());
            }
            TraitName::Private | TraitName::Local | TraitName::Nonable => {}
        }
    }
}

/// The storage name of a privacy-renamed field.
pub fn private_name(type_name: &str, field: &str) -> String {
    format!("_{type_name}__{field}")
}

/// A wrapped constructor: composer, schema, and original body bound into a
/// reusable entry point with the declared call signature.
pub struct Initializer {
    composer: Arc<Composer>,
    schema: CallSchema,
    body: Box<dyn Fn(&mut Instance) + Send + Sync>,
}

impl Initializer {
    pub fn new(composer: Arc<Composer>, schema: CallSchema) -> Self {
        Self::with_body(composer, schema, |_| {})
    }

    pub fn with_body<F>(composer: Arc<Composer>, schema: CallSchema, body: F) -> Self
    where
        F: Fn(&mut Instance) + Send + Sync + 'static,
    {
        Self {
            composer,
            schema,
            body: Box::new(body),
        }
    }

    pub fn schema(&self) -> &CallSchema {
        &self.schema
    }

    /// Run the full pipeline, then the original body.
    pub fn call(&self, args: Vec<Value>) -> Result<Instance, ComposeError> {
        self.composer
            .construct_with(&self.schema, args, |instance| (self.body)(instance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigor_schema::Annotation;
    use rigor_types::Kind;

    fn counter_schema() -> CallSchema {
        CallSchema::constructor("Counter")
            .param(
                "count",
                Annotation::group([Annotation::from(Kind::Int), Annotation::from("boolean")]),
            )
            .param(
                "label",
                Annotation::group([Annotation::from(Kind::Str), Annotation::from("string")]),
            )
    }

    #[test]
    fn test_construct_assigns_fields() {
        let composer = Composer::new();
        let inst = composer
            .construct(&counter_schema(), vec![Value::Int(3), Value::from("c")])
            .unwrap();
        assert_eq!(inst.field("count"), Some(&Value::Int(3)));
        assert_eq!(inst.field("label"), Some(&Value::from("c")));
    }

    #[test]
    fn test_second_construction_skips_installation() {
        let composer = Composer::new();
        let schema = counter_schema();
        composer
            .construct(&schema, vec![Value::Int(1), Value::from("a")])
            .unwrap();
        assert!(composer.is_initialized("Counter"));
        // Same declared traits seen again: no consistency error, identical
        // capabilities.
        let second = composer
            .construct(&schema, vec![Value::Int(0), Value::from("b")])
            .unwrap();
        assert_eq!(second.as_bool(), Some(false));
        assert_eq!(second.to_string(), "<Counter: label=b>");
    }

    #[test]
    fn test_duplicate_unique_trait_fails_construction() {
        let composer = Composer::new();
        let schema = CallSchema::constructor("Broken")
            .param("a", "boolean")
            .param("b", "boolean");
        let err = composer
            .construct(&schema, vec![Value::Int(1), Value::Int(2)])
            .unwrap_err();
        assert!(matches!(err, ComposeError::Annotation(_)));
        // The failed pass never finalized the type.
        assert!(!composer.is_initialized("Broken"));
    }

    #[test]
    fn test_wrong_kind_fails_with_argument_error() {
        let composer = Composer::new();
        let err = composer
            .construct(&counter_schema(), vec![Value::from("x"), Value::from("c")])
            .unwrap_err();
        let ComposeError::Argument(err) = err else {
            panic!("expected argument error");
        };
        assert_eq!(err.function, "init");
        assert_eq!(err.argument, "count");
        assert_eq!(err.received, Kind::Str);
    }

    #[test]
    fn test_private_fields_are_renamed_every_construction() {
        let composer = Composer::new();
        let schema = CallSchema::constructor("Vault").param("secret", "private");
        for _ in 0..2 {
            let inst = composer.construct(&schema, vec![Value::Int(7)]).unwrap();
            assert_eq!(inst.field("secret"), None);
            assert_eq!(inst.field("_Vault__secret"), Some(&Value::Int(7)));
        }
    }

    #[test]
    fn test_disabled_switch_assigns_without_checks() {
        let composer = Composer::with_switch(Switch::local(false));
        let schema = CallSchema::constructor("Broken")
            .param("a", "boolean")
            .param("b", "boolean");
        // Conflicting declaration, wrong kinds: nothing raises while disabled.
        let inst = composer
            .construct(&schema, vec![Value::from("x"), Value::Int(2)])
            .unwrap();
        assert_eq!(inst.field("a"), Some(&Value::from("x")));
        assert!(!composer.is_initialized("Broken"));

        composer.switch().enable();
        let err = composer
            .construct(&schema, vec![Value::Int(1), Value::Int(2)])
            .unwrap_err();
        assert!(matches!(err, ComposeError::Annotation(_)));
    }

    #[test]
    fn test_defaults_fill_before_validation() {
        let composer = Composer::new();
        let schema = CallSchema::constructor("Job")
            .param("name", Kind::Str)
            .param_default("retries", Kind::Int, 3);
        let inst = composer.construct(&schema, vec![Value::from("sync")]).unwrap();
        assert_eq!(inst.field("retries"), Some(&Value::Int(3)));
    }

    #[test]
    fn test_initializer_runs_body_on_every_call() {
        let composer = Arc::new(Composer::new());
        let schema = CallSchema::constructor("Task").param("name", Kind::Str);
        let init = Initializer::with_body(composer, schema, |instance| {
            instance.set_field("done", false);
        });
        let inst = init.call(vec![Value::from("a")]).unwrap();
        assert_eq!(inst.field("done"), Some(&Value::Bool(false)));
    }
}
