use std::fmt::{Debug, Display, Formatter};

use super::object::ProtoObject;
use super::string::ProtoString;
use super::symbols::Symbol;
use crate::debugging::Renderer;
use crate::result::{ExecutionError, ProtoResult};

#[derive(Clone)]
pub enum Value {
    Undefined,
    Null,
    Boolean(bool),
    Float(f64),
    String(ProtoString),
    Symbol(Symbol),
    Object(ProtoObject),
}

impl Default for Value {
    fn default() -> Self {
        Value::Undefined
    }
}

impl Value {
    pub(crate) fn strict_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Boolean(b1), Value::Boolean(b2)) => b1 == b2,
            (Value::String(b1), Value::String(b2)) => b1 == b2,
            (Value::Float(b1), Value::Float(b2)) => b1 == b2,
            (Value::Symbol(b1), Value::Symbol(b2)) => b1 == b2,
            (Value::Object(b1), Value::Object(b2)) => b1 == b2,
            _ => false,
        }
    }

    #[must_use]
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Boolean(_) => "boolean",
            Value::Float(_) => "number",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Object(obj) if obj.is_callable() => "function",
            Value::Object(_) => "object",
        }
    }

    #[must_use]
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    #[must_use]
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Object(obj) if obj.is_callable())
    }

    pub fn as_object(&self) -> ProtoResult<&ProtoObject> {
        match self {
            Value::Object(obj) => Ok(obj),
            other => Err(ExecutionError::TypeError(format!(
                "Expected an object but found {}",
                other.type_of()
            ))),
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Calls this value as a function with the given `this`.
    pub fn call(&self, this: impl Into<Value>, args: &[Value]) -> ProtoResult<Value> {
        match self {
            Value::Object(function) => function.call(this, args),
            other => Err(ExecutionError::TypeError(format!(
                "{} is not a function",
                other.type_of()
            ))),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.strict_eq(other)
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Renderer::debug(f, 3).render(self)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Renderer::compact(f).render(self)
    }
}

impl From<Option<Value>> for Value {
    fn from(value: Option<Value>) -> Self {
        value.unwrap_or_default()
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value.into())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.into())
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Undefined
    }
}

impl From<&ProtoObject> for Value {
    fn from(obj: &ProtoObject) -> Self {
        Value::Object(obj.clone())
    }
}

impl From<&Value> for Value {
    fn from(value: &Value) -> Self {
        value.clone()
    }
}

#[cfg(test)]
mod test {
    use super::Value;
    use crate::values::object::ProtoObject;
    use crate::values::symbols::Symbol;

    #[test]
    fn strict_equality_uses_identity_for_objects() {
        let object = ProtoObject::new();

        assert_eq!(Value::from(&object), Value::from(&object));
        assert_ne!(Value::from(&object), Value::from(ProtoObject::new()));
        assert_eq!(Value::from("hi"), Value::from(String::from("hi")));
        assert_ne!(Value::from(1.0), Value::from("1"));
    }

    #[test]
    fn type_of_distinguishes_functions() {
        let function = ProtoObject::function("noop", |_| Ok(Value::Undefined));

        assert_eq!(Value::from(function).type_of(), "function");
        assert_eq!(Value::from(ProtoObject::new()).type_of(), "object");
        assert_eq!(Value::from(Symbol::new("s")).type_of(), "symbol");
        assert_eq!(Value::Null.type_of(), "object");
    }

    #[test]
    fn display_formats_like_to_string() {
        assert_eq!(Value::from(42.0).to_string(), "42");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::from("Bo").to_string(), "Bo");
        assert_eq!(Value::Undefined.to_string(), "undefined");
        assert_eq!(Value::from(true).to_string(), "true");
    }
}
