use crate::composer;
use crate::instantiator;
use crate::primordials::RealmOptions;
use crate::result::{ExecutionError, ProtoResult};
use crate::values::function::Invocation;
use crate::values::key::PropertyKey;
use crate::values::object::ProtoObject;
use crate::values::value::Value;
use std::rc::Rc;

/// Builds the root prototype. Its methods are non-enumerable, so they are
/// inherited by everything composed from it without ever being copied.
pub(crate) fn bind(options: &Rc<RealmOptions>) -> ProtoObject {
    let create_options = Rc::clone(options);

    ProtoObject::builder()
        .with_method("extend", extend)
        .with_method("mixin", mixin)
        .with_method("create", move |invocation| create(invocation, &create_options))
        .with_method("proxy", proxy)
        .with_method("isPrototypeOf", is_prototype_of)
        .build()
}

fn extend(invocation: &Invocation) -> ProtoResult<Value> {
    let (definitions, base) = composition_arguments(invocation)?;

    Ok(composer::extend(&base, &definitions)?.into())
}

fn mixin(invocation: &Invocation) -> ProtoResult<Value> {
    let (definitions, target) = composition_arguments(invocation)?;

    Ok(composer::mixin(&target, &definitions)?.into())
}

fn create(invocation: &Invocation, options: &RealmOptions) -> ProtoResult<Value> {
    let receiver = invocation.this_object()?;

    Ok(instantiator::create(&receiver, invocation.arguments(), options)?.into())
}

fn proxy(invocation: &Invocation) -> ProtoResult<Value> {
    let receiver = invocation.this_object()?;
    let key = PropertyKey::from_value(&invocation.argument(0))?;
    let partial = invocation.arguments().get(1..).unwrap_or_default();

    Ok(receiver.proxy(key, partial).into())
}

fn is_prototype_of(invocation: &Invocation) -> ProtoResult<Value> {
    let result = match (invocation.this(), invocation.argument(0)) {
        (Value::Object(this), Value::Object(other)) => this.is_prototype_of(&other),
        _ => false,
    };

    Ok(result.into())
}

/// Splits `(definitions..., subject)`: with two or more arguments the last one
/// is the object to compose onto, unless it is `undefined` or `null`, in which
/// case the receiver is used.
fn composition_arguments(invocation: &Invocation) -> ProtoResult<(Vec<ProtoObject>, ProtoObject)> {
    let arguments = invocation.arguments();

    let (definitions, subject) = match arguments.split_last() {
        Some((last, rest)) if !rest.is_empty() => (rest, Some((rest.len(), last))),
        _ => (arguments, None),
    };

    let subject = match subject {
        Some((position, value)) if !value.is_nullish() => object_argument(position, value)?,
        _ => invocation.this_object()?,
    };

    let definitions = definitions
        .iter()
        .enumerate()
        .map(|(position, value)| object_argument(position, value))
        .collect::<ProtoResult<Vec<_>>>()?;

    Ok((definitions, subject))
}

fn object_argument(position: usize, value: &Value) -> ProtoResult<ProtoObject> {
    match value {
        Value::Object(object) => Ok(object.clone()),
        other => Err(ExecutionError::InvalidDefinition {
            position,
            found: other.type_of(),
        }),
    }
}

#[cfg(test)]
mod test {
    use crate::primordials::Realm;
    use crate::result::ExecutionError;
    use crate::values::object::ProtoObject;
    use crate::values::value::Value;
    use assert_matches::assert_matches;

    fn named(name: &str) -> ProtoObject {
        ProtoObject::builder().with_property("name", name).build()
    }

    #[test]
    fn extend_with_a_single_definition_uses_the_receiver() {
        let realm = Realm::new();

        let extended = realm
            .proto()
            .call_method("extend", &[named("a").into()])
            .unwrap();
        let extended = extended.as_object().unwrap();

        assert!(realm.proto().is_prototype_of(extended));
        assert_eq!(extended.get("name").unwrap(), Value::from("a"));
    }

    #[test]
    fn trailing_argument_is_the_base() {
        let realm = Realm::new();
        let base = named("base");

        let extended = realm
            .proto()
            .call_method("extend", &[ProtoObject::new().into(), (&base).into()])
            .unwrap();

        assert!(base.is_prototype_of(extended.as_object().unwrap()));
        assert!(!realm.proto().is_prototype_of(extended.as_object().unwrap()));
    }

    #[test]
    fn nullish_trailing_argument_means_the_receiver() {
        let realm = Realm::new();

        let target = realm
            .proto()
            .call_method("mixin", &[named("a").into(), Value::Null])
            .unwrap();

        assert_eq!(target, Value::from(realm.proto()));
        assert_eq!(realm.proto().get("name").unwrap(), Value::from("a"));
    }

    #[test]
    fn non_object_definitions_are_rejected() {
        let realm = Realm::new();

        assert_matches!(
            realm.proto().call_method("extend", &[Value::from(1)]),
            Err(ExecutionError::InvalidDefinition { position: 0, found: "number" })
        );
        assert_matches!(
            realm.proto().call_method("mixin", &[ProtoObject::new().into(), "target".into()]),
            Err(ExecutionError::InvalidDefinition { position: 1, found: "string" })
        );
    }

    #[test]
    fn is_prototype_of_ignores_primitives() {
        let realm = Realm::new();
        let child = ProtoObject::inheriting(realm.proto());

        assert_eq!(
            realm.proto().call_method("isPrototypeOf", &[child.into()]).unwrap(),
            Value::from(true)
        );
        assert_eq!(
            realm.proto().call_method("isPrototypeOf", &["x".into()]).unwrap(),
            Value::from(false)
        );
    }
}
