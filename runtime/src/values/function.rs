use crate::call_stack::{self, FrameGuard};
use crate::debugging::Renderer;
use crate::result::{ExecutionError, ProtoResult};
use crate::values::key::PropertyKey;
use crate::values::object::ProtoObject;
use crate::values::string::ProtoString;
use crate::values::value::Value;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

pub type NativeFn = dyn Fn(&Invocation) -> ProtoResult<Value>;

#[derive(Clone)]
pub enum FunctionReference {
    Native(NativeFunction),
    Wrapped(WrappedMethod),
    Bound(BoundMethod),
    Super(SuperReference),
}

impl FunctionReference {
    #[must_use]
    pub fn name(&self) -> ProtoString {
        match self {
            FunctionReference::Native(native) => native.name.clone(),
            FunctionReference::Wrapped(wrapped) => wrapped.key.to_string().into(),
            FunctionReference::Bound(bound) => format!("bound {}", bound.key).into(),
            FunctionReference::Super(reference) => format!("_super {}", reference.key).into(),
        }
    }

    pub(crate) fn apply(&self, this: Value, args: &[Value]) -> ProtoResult<Value> {
        match self {
            FunctionReference::Native(native) => {
                let frame = call_stack::enter(native.name.clone().into(), None)?;

                native.run(&this, args, &frame)
            }
            FunctionReference::Wrapped(wrapped) => wrapped.apply(this, args),
            FunctionReference::Bound(bound) => bound.apply(args),
            FunctionReference::Super(reference) => reference.apply(args),
        }
    }
}

/// A function implemented by a Rust closure.
#[derive(Clone)]
pub struct NativeFunction {
    name: ProtoString,
    op: Rc<NativeFn>,
}

impl NativeFunction {
    pub fn new<F>(name: impl Into<ProtoString>, op: F) -> Self
    where
        F: Fn(&Invocation) -> ProtoResult<Value> + 'static,
    {
        NativeFunction {
            name: name.into(),
            op: Rc::new(op),
        }
    }

    fn run(&self, this: &Value, args: &[Value], frame: &FrameGuard) -> ProtoResult<Value> {
        let invocation = Invocation {
            this,
            arguments: args,
            depth: frame.depth(),
        };

        (self.op)(&invocation).map_err(|err| err.fill_stack_trace(call_stack::snapshot()))
    }
}

impl Debug for FunctionReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Renderer::debug(f, 3).render(self)
    }
}

impl From<NativeFunction> for FunctionReference {
    fn from(native: NativeFunction) -> Self {
        FunctionReference::Native(native)
    }
}

/// An override installed by composition. While the implementation runs, the
/// frame it executes in has `predecessor` bound as its super method.
#[derive(Clone)]
pub struct WrappedMethod {
    key: PropertyKey,
    implementation: ProtoObject,
    predecessor: ProtoObject,
}

impl WrappedMethod {
    pub(crate) fn new(key: PropertyKey, implementation: ProtoObject, predecessor: ProtoObject) -> Self {
        WrappedMethod {
            key,
            implementation,
            predecessor,
        }
    }

    #[must_use]
    pub fn key(&self) -> &PropertyKey {
        &self.key
    }

    #[must_use]
    pub fn implementation(&self) -> &ProtoObject {
        &self.implementation
    }

    #[must_use]
    pub fn predecessor(&self) -> &ProtoObject {
        &self.predecessor
    }

    fn apply(&self, this: Value, args: &[Value]) -> ProtoResult<Value> {
        let frame = call_stack::enter(self.key.clone(), Some(self.predecessor.clone()))?;

        match self.implementation.callable() {
            Some(FunctionReference::Native(native)) => native.run(&this, args, &frame),
            // a wrapped or bound implementation binds its own frame
            Some(other) => other.apply(this, args),
            None => Err(ExecutionError::TypeError(format!(
                "{} is not a function",
                self.key
            ))),
        }
    }
}

impl From<WrappedMethod> for FunctionReference {
    fn from(wrapped: WrappedMethod) -> Self {
        FunctionReference::Wrapped(wrapped)
    }
}

/// The function returned by `proxy`: calls `receiver[key]` with the partial
/// arguments followed by the call-time arguments.
#[derive(Clone)]
pub struct BoundMethod {
    receiver: ProtoObject,
    key: PropertyKey,
    partial: Vec<Value>,
}

impl BoundMethod {
    pub(crate) fn new(receiver: ProtoObject, key: PropertyKey, partial: Vec<Value>) -> Self {
        BoundMethod {
            receiver,
            key,
            partial,
        }
    }

    fn apply(&self, args: &[Value]) -> ProtoResult<Value> {
        let mut arguments = Vec::with_capacity(self.partial.len() + args.len());
        arguments.extend_from_slice(&self.partial);
        arguments.extend_from_slice(args);

        self.receiver.call_method(self.key.clone(), &arguments)
    }
}

impl From<BoundMethod> for FunctionReference {
    fn from(bound: BoundMethod) -> Self {
        FunctionReference::Bound(bound)
    }
}

/// A first-class `_super` handle for one invocation.
#[derive(Clone)]
pub struct SuperReference {
    this: Value,
    key: PropertyKey,
    predecessor: Option<ProtoObject>,
}

impl SuperReference {
    fn apply(&self, args: &[Value]) -> ProtoResult<Value> {
        match &self.predecessor {
            Some(predecessor) => predecessor.call(self.this.clone(), args),
            None => Err(ExecutionError::NoSuperMethod {
                name: self.key.to_string(),
            }),
        }
    }
}

impl From<SuperReference> for FunctionReference {
    fn from(reference: SuperReference) -> Self {
        FunctionReference::Super(reference)
    }
}

/// The receiver and arguments of a native call, plus access to the super
/// method bound for this particular call.
pub struct Invocation<'c> {
    this: &'c Value,
    arguments: &'c [Value],
    depth: usize,
}

impl<'c> Invocation<'c> {
    #[must_use]
    pub fn this(&self) -> &Value {
        self.this
    }

    pub fn this_object(&self) -> ProtoResult<ProtoObject> {
        self.this.as_object().cloned()
    }

    #[must_use]
    pub fn arguments(&self) -> &[Value] {
        self.arguments
    }

    #[must_use]
    pub fn argument(&self, index: usize) -> Value {
        self.arguments.get(index).cloned().unwrap_or_default()
    }

    /// Name of the method being executed.
    #[must_use]
    pub fn name(&self) -> PropertyKey {
        call_stack::frame_at(self.depth)
            .map_or_else(|| "anonymous".into(), |frame| frame.name)
    }

    /// Whether this call overrides a method it can reach through `_super`.
    #[must_use]
    pub fn has_super(&self) -> bool {
        call_stack::predecessor_at(self.depth).is_some()
    }

    /// Calls the overridden method with the same `this`.
    pub fn call_super(&self, args: &[Value]) -> ProtoResult<Value> {
        match call_stack::predecessor_at(self.depth) {
            Some(predecessor) => predecessor.call(self.this.clone(), args),
            None => Err(ExecutionError::NoSuperMethod {
                name: self.name().to_string(),
            }),
        }
    }

    /// Returns `_super` as a function object bound to this call's `this`.
    /// Invoking it without a predecessor fails with `NoSuperMethod`.
    #[must_use]
    pub fn super_method(&self) -> ProtoObject {
        ProtoObject::from_callable(SuperReference {
            this: self.this.clone(),
            key: self.name(),
            predecessor: call_stack::predecessor_at(self.depth),
        })
    }
}
