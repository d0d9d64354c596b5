use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

use ahash::AHashMap;
use log::trace;

use crate::debugging::Renderer;
use crate::result::{ExecutionError, ProtoResult};
use crate::values::function::{BoundMethod, FunctionReference, Invocation, NativeFunction};
use crate::values::key::PropertyKey;
use crate::values::string::ProtoString;
use crate::values::value::Value;

/// Shared handle to a prototype object.
///
/// Cloning a `ProtoObject` clones the handle, never the object: two handles
/// compare equal only if they point at the same allocation. Functions are
/// objects with a callable attached, so metadata can be stored on them like
/// on any other object.
#[derive(Clone)]
pub struct ProtoObject {
    inner: Rc<RefCell<ProtoObjectInner>>,
}

impl Debug for ProtoObject {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Renderer::debug(f, 3).render(self)
    }
}

#[derive(Default)]
struct ProtoObjectInner {
    properties: AHashMap<PropertyKey, Property>,
    order: Vec<PropertyKey>,
    prototype: Option<ProtoObject>,
    callable: Option<FunctionReference>,
}

impl ProtoObjectInner {
    fn insert(&mut self, key: PropertyKey, property: Property) {
        if self.properties.insert(key.clone(), property).is_none() {
            self.order.push(key);
        }
    }
}

#[derive(Clone)]
pub enum Property {
    DataDescriptor {
        value: Value,
        configurable: bool,
        enumerable: bool,
        writable: bool,
    },
    AccessorDescriptor {
        getter: Option<ProtoObject>,
        setter: Option<ProtoObject>,
        enumerable: bool,
        configurable: bool,
    },
}

impl Property {
    /// A writable, enumerable, configurable data property.
    pub fn value(value: impl Into<Value>) -> Property {
        Property::DataDescriptor {
            value: value.into(),
            configurable: true,
            enumerable: true,
            writable: true,
        }
    }

    /// A writable, configurable data property hidden from enumeration, the
    /// shape class-style method definitions take.
    pub fn method(value: impl Into<Value>) -> Property {
        Property::DataDescriptor {
            value: value.into(),
            configurable: true,
            enumerable: false,
            writable: true,
        }
    }

    #[must_use]
    pub fn is_enumerable(&self) -> bool {
        match self {
            Property::DataDescriptor { enumerable, .. }
            | Property::AccessorDescriptor { enumerable, .. } => *enumerable,
        }
    }

    #[must_use]
    pub fn is_configurable(&self) -> bool {
        match self {
            Property::DataDescriptor { configurable, .. }
            | Property::AccessorDescriptor { configurable, .. } => *configurable,
        }
    }

    #[must_use]
    pub fn is_writable(&self) -> bool {
        match self {
            Property::DataDescriptor { writable, .. } => *writable,
            Property::AccessorDescriptor { setter, .. } => setter.is_some(),
        }
    }

    /// The stored value of a data property; accessors have none.
    #[must_use]
    pub fn data_value(&self) -> Option<&Value> {
        match self {
            Property::DataDescriptor { value, .. } => Some(value),
            Property::AccessorDescriptor { .. } => None,
        }
    }

    pub(crate) fn with_value(&self, value: Value) -> Property {
        match self {
            Property::DataDescriptor {
                configurable,
                enumerable,
                writable,
                ..
            } => Property::DataDescriptor {
                value,
                configurable: *configurable,
                enumerable: *enumerable,
                writable: *writable,
            },
            Property::AccessorDescriptor {
                enumerable,
                configurable,
                ..
            } => Property::DataDescriptor {
                value,
                configurable: *configurable,
                enumerable: *enumerable,
                writable: true,
            },
        }
    }
}

impl Debug for Property {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Property::DataDescriptor { value, .. } => value.fmt(f),
            Property::AccessorDescriptor { .. } => f.write_str("[accessor]"),
        }
    }
}

pub struct ProtoObjectBuilder {
    inner: ProtoObjectInner,
}

impl ProtoObjectBuilder {
    pub fn with_prototype(mut self, prototype: &ProtoObject) -> Self {
        self.inner.prototype = Some(prototype.clone());
        self
    }

    pub fn with_callable(mut self, function: impl Into<FunctionReference>) -> Self {
        self.inner.callable = Some(function.into());
        self
    }

    /// Adds an enumerable data property.
    pub fn with_property(mut self, key: impl Into<PropertyKey>, value: impl Into<Value>) -> Self {
        self.inner.insert(key.into(), Property::value(value));
        self
    }

    /// Adds a non-enumerable method backed by a native closure.
    pub fn with_method<F>(mut self, key: impl Into<PropertyKey>, op: F) -> Self
    where
        F: Fn(&Invocation) -> ProtoResult<Value> + 'static,
    {
        let key = key.into();
        let function = ProtoObject::function(key.to_string(), op);

        self.inner.insert(key, Property::method(function));
        self
    }

    pub fn with_descriptor(mut self, key: impl Into<PropertyKey>, property: Property) -> Self {
        self.inner.insert(key.into(), property);
        self
    }

    #[must_use]
    pub fn build(self) -> ProtoObject {
        ProtoObject {
            inner: Rc::new(RefCell::new(self.inner)),
        }
    }
}

impl ProtoObject {
    #[must_use]
    pub fn builder() -> ProtoObjectBuilder {
        ProtoObjectBuilder {
            inner: ProtoObjectInner::default(),
        }
    }

    #[must_use]
    pub fn new() -> Self {
        ProtoObject::builder().build()
    }

    /// Creates an empty object delegating to `prototype`.
    #[must_use]
    pub fn inheriting(prototype: &ProtoObject) -> Self {
        ProtoObject::builder().with_prototype(prototype).build()
    }

    /// Creates a function object backed by a native closure.
    pub fn function<F>(name: impl Into<ProtoString>, op: F) -> Self
    where
        F: Fn(&Invocation) -> ProtoResult<Value> + 'static,
    {
        ProtoObject::from_callable(NativeFunction::new(name, op))
    }

    pub(crate) fn from_callable(callable: impl Into<FunctionReference>) -> Self {
        ProtoObject::builder().with_callable(callable).build()
    }

    #[must_use]
    pub fn prototype(&self) -> Option<ProtoObject> {
        self.inner.borrow().prototype.clone()
    }

    /// Replaces the ancestor of this object, refusing to create a cycle.
    pub fn set_prototype(&self, prototype: Option<&ProtoObject>) -> ProtoResult<()> {
        if let Some(prototype) = prototype {
            if prototype == self || self.is_prototype_of(prototype) {
                return Err(ExecutionError::TypeError(
                    "Cyclic prototype chain".to_owned(),
                ));
            }
        }

        self.inner.borrow_mut().prototype = prototype.cloned();

        Ok(())
    }

    /// Returns true if this object appears anywhere on `other`'s delegation
    /// chain (excluding `other` itself).
    #[must_use]
    pub fn is_prototype_of(&self, other: &ProtoObject) -> bool {
        let mut current = other.prototype();

        while let Some(ancestor) = current {
            if &ancestor == self {
                return true;
            }

            current = ancestor.prototype();
        }

        false
    }

    #[must_use]
    pub fn is_callable(&self) -> bool {
        self.inner.borrow().callable.is_some()
    }

    #[must_use]
    pub fn callable(&self) -> Option<FunctionReference> {
        self.inner.borrow().callable.clone()
    }

    /// The name of the function, if this object is callable.
    #[must_use]
    pub fn name(&self) -> Option<ProtoString> {
        self.inner
            .borrow()
            .callable
            .as_ref()
            .map(FunctionReference::name)
    }

    #[must_use]
    pub fn own_keys(&self) -> Vec<PropertyKey> {
        self.inner.borrow().order.clone()
    }

    /// Own enumerable string keys in insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<PropertyKey> {
        let inner = self.inner.borrow();

        inner
            .order
            .iter()
            .filter(|key| !key.is_symbol())
            .filter(|key| inner.properties.get(*key).map_or(false, Property::is_enumerable))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn get_own_property(&self, key: &PropertyKey) -> Option<Property> {
        self.inner.borrow().properties.get(key).cloned()
    }

    /// Finds the descriptor for `key` on this object or its ancestors.
    #[must_use]
    pub fn lookup_property(&self, key: &PropertyKey) -> Option<Property> {
        let mut current = Some(self.clone());

        while let Some(object) = current {
            if let Some(property) = object.get_own_property(key) {
                return Some(property);
            }

            current = object.prototype();
        }

        None
    }

    #[must_use]
    pub fn has_own_property(&self, key: impl Into<PropertyKey>) -> bool {
        self.inner.borrow().properties.contains_key(&key.into())
    }

    #[must_use]
    pub fn has_property(&self, key: impl Into<PropertyKey>) -> bool {
        self.lookup_property(&key.into()).is_some()
    }

    pub fn get(&self, key: impl Into<PropertyKey>) -> ProtoResult<Value> {
        let key = key.into();

        match self.lookup_property(&key) {
            Some(Property::DataDescriptor { value, .. }) => Ok(value),
            Some(Property::AccessorDescriptor {
                getter: Some(getter),
                ..
            }) => getter.call(self, &[]),
            _ => Ok(Value::Undefined),
        }
    }

    /// Assigns `value` to `key` following delegation rules: setters found on
    /// the chain are invoked, read-only properties reject the write, anything
    /// else becomes an own enumerable property of this object.
    pub fn set(&self, key: impl Into<PropertyKey>, value: impl Into<Value>) -> ProtoResult<()> {
        let key = key.into();
        let value = value.into();

        let own = self.get_own_property(&key);
        let found = own.clone().or_else(|| self.lookup_property(&key));

        match found {
            Some(Property::DataDescriptor {
                writable: false, ..
            }) => Err(ExecutionError::TypeError(format!(
                "Cannot assign to read only property '{}'",
                key
            ))),
            Some(Property::AccessorDescriptor {
                setter: Some(setter),
                ..
            }) => {
                setter.call(self, &[value])?;
                Ok(())
            }
            Some(Property::AccessorDescriptor { setter: None, .. }) => {
                Err(ExecutionError::TypeError(format!(
                    "Cannot set property '{}' which has only a getter",
                    key
                )))
            }
            Some(Property::DataDescriptor { .. }) if own.is_some() => {
                let mut inner = self.inner.borrow_mut();

                if let Some(Property::DataDescriptor { value: slot, .. }) =
                    inner.properties.get_mut(&key)
                {
                    *slot = value;
                }

                Ok(())
            }
            _ => {
                self.inner.borrow_mut().insert(key, Property::value(value));
                Ok(())
            }
        }
    }

    /// Installs `property` as an own property, replacing any previous one.
    pub fn define_property(&self, key: impl Into<PropertyKey>, property: Property) {
        let key = key.into();
        trace!("define {} (enumerable: {})", key, property.is_enumerable());

        self.inner.borrow_mut().insert(key, property);
    }

    pub fn define_value_property(
        &self,
        key: impl Into<PropertyKey>,
        value: impl Into<Value>,
        writable: bool,
        enumerable: bool,
        configurable: bool,
    ) {
        self.define_property(
            key,
            Property::DataDescriptor {
                value: value.into(),
                writable,
                enumerable,
                configurable,
            },
        );
    }

    pub fn define_accessor_property(
        &self,
        key: impl Into<PropertyKey>,
        getter: Option<ProtoObject>,
        setter: Option<ProtoObject>,
        enumerable: bool,
        configurable: bool,
    ) {
        self.define_property(
            key,
            Property::AccessorDescriptor {
                getter,
                setter,
                enumerable,
                configurable,
            },
        );
    }

    /// Removes an own configurable property. Returns whether the object no
    /// longer has `key` as an own property.
    pub fn delete(&self, key: impl Into<PropertyKey>) -> bool {
        let key = key.into();
        let mut inner = self.inner.borrow_mut();

        let configurable = match inner.properties.get(&key) {
            Some(property) => property.is_configurable(),
            None => return true,
        };

        if !configurable {
            return false;
        }

        inner.properties.remove(&key);
        inner.order.retain(|existing| existing != &key);

        true
    }

    /// Invokes this object as a function with the given `this`.
    pub fn call(&self, this: impl Into<Value>, args: &[Value]) -> ProtoResult<Value> {
        let callable = self.callable().ok_or_else(|| {
            ExecutionError::TypeError("object is not a function".to_owned())
        })?;

        callable.apply(this.into(), args)
    }

    /// Looks up `key` through the delegation chain and calls it with this
    /// object as `this`.
    pub fn call_method(&self, key: impl Into<PropertyKey>, args: &[Value]) -> ProtoResult<Value> {
        let key = key.into();

        match self.get(key.clone())? {
            Value::Object(function) if function.is_callable() => function.call(self, args),
            _ => Err(ExecutionError::TypeError(format!("{} is not a function", key))),
        }
    }

    /// Returns a function that calls `key` on this object, with `partial`
    /// prepended to the call-time arguments. The method is looked up when
    /// the returned function is invoked, not when it is created.
    pub fn proxy(&self, key: impl Into<PropertyKey>, partial: &[Value]) -> ProtoObject {
        ProtoObject::from_callable(BoundMethod::new(self.clone(), key.into(), partial.to_vec()))
    }
}

impl Default for ProtoObject {
    fn default() -> Self {
        ProtoObject::new()
    }
}

impl From<ProtoObject> for Value {
    fn from(obj: ProtoObject) -> Self {
        Value::Object(obj)
    }
}

impl PartialEq for ProtoObject {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}
