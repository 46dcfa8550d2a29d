//! End-to-end contract enforcement, including schema files.

use rigor_contract::{strict, ContractError, StrictFn};
use rigor_schema::CallSchema;
use rigor_types::{Kind, Switch, Value};

fn label(args: &[Value]) -> Value {
    match &args[0] {
        Value::Int(n) => Value::from(format!("#{n}")),
        other => other.clone(),
    }
}

#[test]
fn declared_signature_enforces_both_directions() {
    let schema = CallSchema::function("label")
        .param("n", Kind::Int)
        .returns(Kind::Str);
    let f = strict(schema, label);

    assert_eq!(f.call(&[Value::Int(5)]).unwrap(), Value::from("#5"));

    let err = f.call(&[Value::from("5")]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "argument 'n' of 'label' is incorrect: expected 'int' but 'str' received"
    );
}

#[test]
fn return_violation_names_the_callable() {
    let schema = CallSchema::function("label")
        .param("n", Kind::Int)
        .returns(Kind::Str);
    // Returns its argument unchanged: an int comes back where str was declared.
    let f = strict(schema, |args: &[Value]| args[0].clone());

    let err = f.call(&[Value::Int(5)]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "return value of 'label' is incorrect: expected 'str' but 'int' returned"
    );
}

#[test]
fn schema_loaded_from_json_behaves_like_built_schema() {
    let schema: CallSchema = serde_json::from_str(
        r#"{
            "function": "scale",
            "params": [
                {"name": "base", "annotation": ["int", "float"]},
                {"name": "factor", "annotation": "int"}
            ],
            "returns": "float"
        }"#,
    )
    .unwrap();

    let f = strict(schema, |args: &[Value]| {
        let base = args[0].as_float().unwrap_or(0.0);
        let factor = args[1].as_float().unwrap_or(0.0);
        Value::Float(base * factor)
    });

    assert_eq!(
        f.call(&[Value::Float(1.5), Value::Int(2)]).unwrap(),
        Value::Float(3.0)
    );
    assert_eq!(
        f.call(&[Value::Int(3), Value::Int(2)]).unwrap(),
        Value::Float(6.0)
    );

    let err = f.call(&[Value::from("x"), Value::Int(2)]).unwrap_err();
    let ContractError::Argument(err) = err else {
        panic!("expected argument error");
    };
    assert_eq!(err.function, "scale");
    assert_eq!(err.argument, "base");
}

#[test]
fn toggling_back_on_restores_enforcement_for_subsequent_calls() {
    let switch = Switch::local(true);
    let schema = CallSchema::function("label")
        .param("n", Kind::Int)
        .returns(Kind::Str);
    let f = StrictFn::with_switch(schema, switch.clone(), label);

    assert!(f.call(&[Value::from("bad")]).is_err());

    switch.disable();
    // The same ill-typed call now passes straight through, result unchecked.
    assert_eq!(f.call(&[Value::from("bad")]).unwrap(), Value::from("bad"));

    switch.enable();
    assert!(f.call(&[Value::from("bad")]).is_err());
}
