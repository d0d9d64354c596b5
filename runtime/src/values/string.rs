use crate::Value;
use ahash::AHasher;
use colored::Colorize;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Immutable, cheaply cloned string with a precomputed hash.
#[derive(Clone, Eq)]
pub struct ProtoString {
    inner: Rc<str>,
    hash: u64,
}

impl Debug for ProtoString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}", self.inner.as_ref().yellow()))
    }
}

impl Display for ProtoString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.inner.as_ref())
    }
}

impl Hash for ProtoString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl PartialEq for ProtoString {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.inner.as_ref() == other.inner.as_ref()
    }
}

impl PartialEq<str> for ProtoString {
    fn eq(&self, other: &str) -> bool {
        self.inner.as_ref() == other
    }
}

impl PartialEq<&str> for ProtoString {
    fn eq(&self, other: &&str) -> bool {
        self.inner.as_ref() == *other
    }
}

impl<T: Into<String>> From<T> for ProtoString {
    fn from(value: T) -> Self {
        let str = value.into();
        let mut hash = AHasher::default();
        hash.write(str.as_bytes());

        ProtoString {
            inner: Rc::from(str),
            hash: hash.finish(),
        }
    }
}

impl From<ProtoString> for Value {
    fn from(string: ProtoString) -> Self {
        Value::String(string)
    }
}

impl AsRef<str> for ProtoString {
    fn as_ref(&self) -> &str {
        self.inner.as_ref()
    }
}
