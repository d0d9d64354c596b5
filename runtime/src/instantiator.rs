use crate::primordials::{RealmOptions, DEFAULT_OPTIONS};
use crate::result::ProtoResult;
use crate::values::key::PropertyKey;
use crate::values::object::ProtoObject;
use crate::values::value::Value;
use log::debug;

/// Creates an instance delegating to `receiver` and runs its initializer with
/// the instance as `this`.
pub fn create(
    receiver: &ProtoObject,
    args: &[Value],
    options: &RealmOptions,
) -> ProtoResult<ProtoObject> {
    let instance = ProtoObject::inheriting(receiver);
    let initializer = initializer_key(receiver, options)?;

    match instance.get(initializer.clone())? {
        Value::Object(function) if function.is_callable() => {
            debug!("create: running {} with {} arguments", initializer, args.len());
            function.call(&instance, args)?;
        }
        _ => debug!("create: no initializer {}, instance left uninitialized", initializer),
    }

    Ok(instance)
}

/// The alias property, if it names a method, wins over the default name.
fn initializer_key(receiver: &ProtoObject, options: &RealmOptions) -> ProtoResult<PropertyKey> {
    let key = match receiver.get(&*options.alias)? {
        Value::String(name) => name.into(),
        Value::Symbol(symbol) => symbol.into(),
        _ => PropertyKey::from(&*options.initializer),
    };

    Ok(key)
}

impl ProtoObject {
    /// Instantiates this object through the `create` it resolves, so the
    /// initializer names of the realm it descends from apply. Objects with no
    /// `create` of their own use the default names.
    pub fn create(&self, args: &[Value]) -> ProtoResult<ProtoObject> {
        match self.get("create")? {
            Value::Object(native) if native.is_callable() => {
                let instance = native.call(self, args)?;

                instance.as_object().cloned()
            }
            _ => create(self, args, &DEFAULT_OPTIONS),
        }
    }
}
