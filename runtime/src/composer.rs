use crate::result::{ExecutionError, ProtoResult};
use crate::values::function::WrappedMethod;
use crate::values::key::PropertyKey;
use crate::values::object::{Property, ProtoObject};
use crate::values::value::Value;
use ahash::AHashSet;
use log::{debug, trace};

/// Copies the properties of every definition onto `target`, left to right.
/// Function values that override a function already reachable from the
/// target are wrapped so the override can reach the previous version.
pub fn mixin(target: &ProtoObject, definitions: &[ProtoObject]) -> ProtoResult<ProtoObject> {
    for definition in definitions {
        let properties = collect_properties(target, definition);

        debug!("mixin {} properties", properties.len());

        for (key, property) in properties {
            apply_property(target, key, property)?;
        }
    }

    #[cfg(feature = "debugging")]
    trace!("composed {:?}", target);

    Ok(target.clone())
}

/// Creates a new object delegating to `base` and mixes the definitions into it.
pub fn extend(base: &ProtoObject, definitions: &[ProtoObject]) -> ProtoResult<ProtoObject> {
    let extended = ProtoObject::inheriting(base);

    debug!("extend with {} definitions", definitions.len());

    mixin(&extended, definitions)
}

/// Own properties of `definition` first, then those it inherits from
/// ancestors the target does not already delegate to. Keys seen earlier
/// shadow later ones.
fn collect_properties(
    target: &ProtoObject,
    definition: &ProtoObject,
) -> Vec<(PropertyKey, Property)> {
    let mut seen = AHashSet::new();
    let mut properties = vec![];
    let mut current = Some(definition.clone());

    while let Some(source) = current {
        if &source != definition && (&source == target || source.is_prototype_of(target)) {
            break;
        }

        for key in source.own_keys() {
            if !seen.insert(key.clone()) {
                continue;
            }

            if let Some(property) = source.get_own_property(&key) {
                properties.push((key, property));
            }
        }

        current = source.prototype();
    }

    properties
}

fn apply_property(target: &ProtoObject, key: PropertyKey, property: Property) -> ProtoResult<()> {
    if let Some(existing) = target.get_own_property(&key) {
        if !existing.is_configurable() {
            return Err(ExecutionError::TypeError(format!(
                "Cannot redefine property: {}",
                key
            )));
        }
    }

    let implementation = match property.data_value() {
        Some(Value::Object(function)) if function.is_callable() => function.clone(),
        _ => {
            trace!("install {}", key);
            target.define_property(key, property);
            return Ok(());
        }
    };

    let predecessor = match target.get(key.clone())? {
        Value::Object(previous) if previous.is_callable() && previous != implementation => previous,
        _ => {
            trace!("install {}", key);
            target.define_property(key, property);
            return Ok(());
        }
    };

    trace!("wrap {}", key);

    let wrapped = wrap_method(key.clone(), &implementation, &predecessor);
    target.define_property(key, property.with_value(wrapped.into()));

    Ok(())
}

/// Builds the function object installed for an override. It carries the
/// predecessor's attached properties overlaid with the implementation's.
fn wrap_method(
    key: PropertyKey,
    implementation: &ProtoObject,
    predecessor: &ProtoObject,
) -> ProtoObject {
    let wrapped = ProtoObject::builder()
        .with_callable(WrappedMethod::new(
            key,
            implementation.clone(),
            predecessor.clone(),
        ))
        .build();

    for source in [predecessor, implementation] {
        for attached in source.own_keys() {
            if let Some(property) = source.get_own_property(&attached) {
                wrapped.define_property(attached, property);
            }
        }
    }

    wrapped
}

impl ProtoObject {
    /// Creates a new object delegating to this one with the definitions
    /// mixed in.
    pub fn extend(&self, definitions: &[ProtoObject]) -> ProtoResult<ProtoObject> {
        extend(self, definitions)
    }

    /// Creates a new object delegating to `base` with the definitions mixed in.
    pub fn extend_from(base: &ProtoObject, definitions: &[ProtoObject]) -> ProtoResult<ProtoObject> {
        extend(base, definitions)
    }

    /// Mixes the definitions into this object in place and returns it.
    pub fn mixin(&self, definitions: &[ProtoObject]) -> ProtoResult<ProtoObject> {
        mixin(self, definitions)
    }

    /// Mixes the definitions into `target` in place and returns it.
    pub fn mixin_into(target: &ProtoObject, definitions: &[ProtoObject]) -> ProtoResult<ProtoObject> {
        mixin(target, definitions)
    }
}

#[cfg(test)]
mod test {
    use crate::result::ExecutionError;
    use crate::values::function::FunctionReference;
    use crate::values::object::{Property, ProtoObject};
    use crate::values::symbols::Symbol;
    use crate::values::value::Value;
    use assert_matches::assert_matches;

    fn greeter(greeting: &'static str) -> ProtoObject {
        ProtoObject::builder()
            .with_method("greet", move |invocation| {
                let name = invocation.this_object()?.get("name")?;
                Ok(format!("{} {}", greeting, name).into())
            })
            .build()
    }

    fn shouting() -> ProtoObject {
        ProtoObject::builder()
            .with_method("greet", |invocation| {
                let result = invocation.call_super(&[])?;
                Ok(format!("{}!", result).into())
            })
            .build()
    }

    #[test]
    fn extend_delegates_to_the_base() {
        let base = ProtoObject::builder().with_property("kind", "base").build();
        let extended = base.extend(&[greeter("hi")]).unwrap();

        assert!(base.is_prototype_of(&extended));
        assert_eq!(extended.get("kind").unwrap(), Value::from("base"));
        assert!(extended.has_own_property("greet"));
        assert!(!base.has_own_property("greet"));
    }

    #[test]
    fn non_overriding_functions_are_installed_unchanged() {
        let definition = greeter("hi");
        let function = definition.get("greet").unwrap();

        let extended = ProtoObject::new().extend(&[definition]).unwrap();

        assert_eq!(extended.get("greet").unwrap(), function);
        assert!(!extended.get_own_property(&"greet".into()).unwrap().is_enumerable());
    }

    #[test]
    fn overrides_are_wrapped_with_the_predecessor() {
        let base = ProtoObject::new().extend(&[greeter("hi")]).unwrap();
        let predecessor = base.get("greet").unwrap();
        let sub = base.extend(&[shouting()]).unwrap();

        let greet = sub.get("greet").unwrap();
        let greet = greet.as_object().unwrap();

        assert_matches!(
            greet.callable(),
            Some(FunctionReference::Wrapped(wrapped)) if Value::from(wrapped.predecessor()) == predecessor
        );

        let instance = ProtoObject::inheriting(&sub);
        instance.set("name", "Bo").unwrap();

        assert_eq!(instance.call_method("greet", &[]).unwrap(), Value::from("hi Bo!"));
    }

    #[test]
    fn functions_behind_accessors_are_overridden_with_super() {
        let previous = greeter("hi").get("greet").unwrap();
        let base = ProtoObject::new();
        base.define_accessor_property(
            "greet",
            Some(ProtoObject::function("get greet", move |_| Ok(previous.clone()))),
            None,
            false,
            true,
        );
        let target = ProtoObject::inheriting(&base);
        target.set("name", "Bo").unwrap();

        target.mixin(&[shouting()]).unwrap();

        assert_eq!(target.call_method("greet", &[]).unwrap(), Value::from("hi Bo!"));
        assert!(base.get_own_property(&"greet".into()).unwrap().data_value().is_none());
    }

    #[test]
    fn later_definitions_see_earlier_ones_as_super() {
        let base = ProtoObject::new().extend(&[greeter("hi")]).unwrap();
        let sub = base.extend(&[shouting(), shouting()]).unwrap();
        let instance = ProtoObject::inheriting(&sub);
        instance.set("name", "Bo").unwrap();

        assert_eq!(instance.call_method("greet", &[]).unwrap(), Value::from("hi Bo!!"));
    }

    #[test]
    fn data_values_replace_without_wrapping() {
        let target = ProtoObject::builder().with_property("count", 1).build();

        target
            .mixin(&[ProtoObject::builder().with_property("count", 2).build()])
            .unwrap();

        assert_eq!(target.get("count").unwrap(), Value::from(2));
    }

    #[test]
    fn symbol_keys_are_copied_with_identity() {
        let symbol = Symbol::new("marker");
        let marker = ProtoObject::new();
        let definition = ProtoObject::builder()
            .with_property(&symbol, &marker)
            .build();

        let extended = ProtoObject::new().extend(&[definition]).unwrap();

        assert_eq!(extended.get(&symbol).unwrap(), Value::from(&marker));
    }

    #[test]
    fn attached_metadata_survives_overrides() {
        let symbol = Symbol::new("marker");
        let base = ProtoObject::new().extend(&[greeter("hi")]).unwrap();
        base.get("greet")
            .unwrap()
            .as_object()
            .unwrap()
            .set(&symbol, true)
            .unwrap();

        base.mixin(&[shouting()]).unwrap();

        let greet = base.get("greet").unwrap();
        assert_eq!(greet.as_object().unwrap().get(&symbol).unwrap(), Value::from(true));
    }

    #[test]
    fn inherited_definition_properties_are_copied() {
        let class = greeter("hello");
        let instance = ProtoObject::inheriting(&class);
        instance.set("name", "David").unwrap();

        let extended = ProtoObject::new().extend(&[instance]).unwrap();

        assert!(extended.has_own_property("greet"));
        assert!(extended.get_own_property(&"name".into()).unwrap().is_enumerable());
        assert!(!extended.get_own_property(&"greet".into()).unwrap().is_enumerable());
        assert_eq!(extended.call_method("greet", &[]).unwrap(), Value::from("hello David"));
    }

    #[test]
    fn ancestors_shared_with_the_target_are_not_copied() {
        let base = greeter("hi");
        let definition = ProtoObject::inheriting(&base);
        let target = ProtoObject::inheriting(&base);

        target.mixin(&[definition]).unwrap();

        assert!(!target.has_own_property("greet"));
    }

    #[test]
    fn non_configurable_targets_reject_redefinition() {
        let target = ProtoObject::new();
        target.define_value_property("fixed", 1, true, true, false);

        assert_matches!(
            target.mixin(&[ProtoObject::builder().with_property("fixed", 2).build()]),
            Err(ExecutionError::TypeError(_))
        );
    }

    #[test]
    fn accessors_are_installed_as_is() {
        let getter = ProtoObject::function("get", |_| Ok(Value::from(42)));
        let definition = ProtoObject::builder()
            .with_descriptor(
                "answer",
                Property::AccessorDescriptor {
                    getter: Some(getter),
                    setter: None,
                    enumerable: true,
                    configurable: true,
                },
            )
            .build();

        let target = ProtoObject::new().extend(&[definition]).unwrap();

        assert_eq!(target.get("answer").unwrap(), Value::from(42));
    }
}
