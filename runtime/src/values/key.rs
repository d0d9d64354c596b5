use crate::debugging::number_to_string;
use crate::result::{ExecutionError, ProtoResult};
use crate::values::string::ProtoString;
use crate::values::symbols::Symbol;
use crate::Value;
use std::fmt::{Debug, Display, Formatter};

#[derive(Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    String(ProtoString),
    Symbol(Symbol),
}

impl PropertyKey {
    #[must_use]
    pub fn is_symbol(&self) -> bool {
        matches!(self, PropertyKey::Symbol(_))
    }

    /// Converts a runtime value used as a property name into a key.
    pub fn from_value(value: &Value) -> ProtoResult<PropertyKey> {
        match value {
            Value::String(str) => Ok(PropertyKey::String(str.clone())),
            Value::Symbol(symbol) => Ok(PropertyKey::Symbol(symbol.clone())),
            Value::Float(number) => Ok(PropertyKey::String(number_to_string(*number).into())),
            Value::Boolean(bool) => Ok(PropertyKey::String(bool.to_string().into())),
            other => Err(ExecutionError::TypeError(format!(
                "{} cannot be used as a property key",
                other.type_of()
            ))),
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(value: &str) -> Self {
        PropertyKey::String(value.into())
    }
}

impl From<String> for PropertyKey {
    fn from(value: String) -> Self {
        PropertyKey::String(value.into())
    }
}

impl From<ProtoString> for PropertyKey {
    fn from(value: ProtoString) -> Self {
        PropertyKey::String(value)
    }
}

impl From<Symbol> for PropertyKey {
    fn from(value: Symbol) -> Self {
        PropertyKey::Symbol(value)
    }
}

impl From<&Symbol> for PropertyKey {
    fn from(value: &Symbol) -> Self {
        PropertyKey::Symbol(value.clone())
    }
}

impl From<&PropertyKey> for PropertyKey {
    fn from(value: &PropertyKey) -> Self {
        value.clone()
    }
}

impl From<PropertyKey> for Value {
    fn from(key: PropertyKey) -> Self {
        match key {
            PropertyKey::String(str) => Value::String(str),
            PropertyKey::Symbol(symbol) => Value::Symbol(symbol),
        }
    }
}

impl Debug for PropertyKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyKey::String(str) => Debug::fmt(str, f),
            PropertyKey::Symbol(symbol) => Debug::fmt(symbol, f),
        }
    }
}

impl Display for PropertyKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyKey::String(str) => Display::fmt(str, f),
            PropertyKey::Symbol(symbol) => Display::fmt(symbol, f),
        }
    }
}
