//! Rigor Contract - Call-time enforcement of declared signatures
//!
//! A `Contract` validates positional arguments and the return value of one
//! callable against its declared schema. `StrictFn` packages a contract with
//! the callable itself: check arguments, invoke, check the result, return it
//! unchanged. When the enforcement switch is off, calls pass straight
//! through and no contract error can be raised.

#![deny(unsafe_code)]

use thiserror::Error;
use tracing::trace;

use rigor_schema::{CallSchema, Constraint, SignatureSource};
use rigor_types::{ArgumentTypeError, ReturnTypeError, Switch, Value};

/// Errors from contract enforcement.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error(transparent)]
    Argument(#[from] ArgumentTypeError),

    #[error(transparent)]
    Return(#[from] ReturnTypeError),
}

/// Call-time validator for one declared signature.
pub struct Contract {
    schema: CallSchema,
    switch: Switch,
}

impl Contract {
    /// A contract observing the process-wide enforcement switch.
    pub fn new(schema: CallSchema) -> Self {
        Self::with_switch(schema, Switch::default())
    }

    /// A contract observing its own switch handle.
    pub fn with_switch(schema: CallSchema, switch: Switch) -> Self {
        Self { schema, switch }
    }

    pub fn switch(&self) -> &Switch {
        &self.switch
    }

    /// Validate positional arguments against the declared parameters.
    ///
    /// A leading receiver argument is never validated; arguments beyond the
    /// declared parameters pass unchecked, as do parameters without an
    /// annotation.
    pub fn check_args(&self, args: &[Value]) -> Result<(), ContractError> {
        if !self.switch.is_enabled() {
            return Ok(());
        }
        let skip = usize::from(self.schema.receiver);
        for (param, value) in self.schema.params.iter().zip(args.iter().skip(skip)) {
            let constraint = Constraint::parse_opt(param.annotation.as_ref());
            if !constraint.admits(value) {
                return Err(ArgumentTypeError {
                    function: self.schema.function.clone(),
                    argument: param.name.clone(),
                    expected: constraint.kinds,
                    received: value.kind(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Validate the returned value against the declared return annotation.
    pub fn check_return(&self, value: &Value) -> Result<(), ContractError> {
        if !self.switch.is_enabled() {
            return Ok(());
        }
        let Some(annotation) = &self.schema.returns else {
            return Ok(());
        };
        let constraint = Constraint::parse(annotation);
        if constraint.admits(value) {
            Ok(())
        } else {
            Err(ReturnTypeError {
                function: self.schema.function.clone(),
                expected: constraint.kinds,
                received: value.kind(),
            }
            .into())
        }
    }
}

impl SignatureSource for Contract {
    fn signature(&self) -> &CallSchema {
        &self.schema
    }
}

/// A callable wrapped with its contract.
pub struct StrictFn<F>
where
    F: Fn(&[Value]) -> Value,
{
    contract: Contract,
    inner: F,
}

impl<F> StrictFn<F>
where
    F: Fn(&[Value]) -> Value,
{
    pub fn new(schema: CallSchema, inner: F) -> Self {
        Self {
            contract: Contract::new(schema),
            inner,
        }
    }

    pub fn with_switch(schema: CallSchema, switch: Switch, inner: F) -> Self {
        Self {
            contract: Contract::with_switch(schema, switch),
            inner,
        }
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    /// Check arguments, invoke, check the result, return it unchanged.
    pub fn call(&self, args: &[Value]) -> Result<Value, ContractError> {
        if !self.contract.switch.is_enabled() {
            trace!(
                function = %self.contract.schema.function,
                "enforcement disabled, calling through"
            );
            return Ok((self.inner)(args));
        }
        self.contract.check_args(args)?;
        let result = (self.inner)(args);
        self.contract.check_return(&result)?;
        Ok(result)
    }
}

/// Wrap a callable with contract enforcement.
pub fn strict<F>(schema: CallSchema, inner: F) -> StrictFn<F>
where
    F: Fn(&[Value]) -> Value,
{
    StrictFn::new(schema, inner)
}
