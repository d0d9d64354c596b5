use crate::values::string::ProtoString;
use crate::Value;
use ahash::AHashMap;
use colored::Colorize;
use std::cell::RefCell;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_SYMBOL: AtomicU32 = AtomicU32::new(1);

thread_local! {
    static REGISTRY: RefCell<SymbolRegistry> = RefCell::new(SymbolRegistry::new());
}

/// A unique property key. Two symbols are the same key only if they were
/// produced by the same allocation (or the same registry entry).
#[derive(Clone)]
pub struct Symbol {
    id: u32,
    description: ProtoString,
}

impl Symbol {
    /// Allocates a fresh symbol, distinct from every other symbol.
    pub fn new(description: impl Into<ProtoString>) -> Symbol {
        Symbol {
            id: NEXT_SYMBOL.fetch_add(1, Ordering::Relaxed),
            description: description.into(),
        }
    }

    /// Returns the registered symbol for `key`, creating it on first use.
    pub fn for_key(key: impl Into<ProtoString>) -> Symbol {
        REGISTRY.with(|registry| registry.borrow_mut().create(key.into()))
    }

    #[must_use]
    pub fn description(&self) -> &ProtoString {
        &self.description
    }

    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.id);
    }
}

impl Debug for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "{}",
            format!("Symbol({})", self.description).magenta()
        ))
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("Symbol({})", self.description))
    }
}

impl From<Symbol> for Value {
    fn from(symbol: Symbol) -> Self {
        Value::Symbol(symbol)
    }
}

struct SymbolRegistry {
    registry: AHashMap<ProtoString, Symbol>,
}

impl SymbolRegistry {
    fn new() -> SymbolRegistry {
        SymbolRegistry {
            registry: AHashMap::new(),
        }
    }

    fn create(&mut self, name: ProtoString) -> Symbol {
        self.registry
            .entry(name.clone())
            .or_insert_with(|| Symbol::new(name))
            .clone()
    }
}
