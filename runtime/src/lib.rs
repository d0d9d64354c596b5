#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::pedantic::large_types_passed_by_value,
    clippy::restriction::clone_on_ref_ptr
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_docs_in_private_items,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation
)]

mod builtins;
pub mod call_stack;
mod composer;
mod debugging;
mod instantiator;
mod primordials;
mod result;
mod values;

extern crate ahash;
extern crate anyhow;
extern crate colored;

pub use composer::{extend, mixin};
pub use instantiator::create;
pub use primordials::{Realm, RealmOptions, DEFAULT_OPTIONS};
pub use result::{ExecutionError, InternalError, ProtoResult, Stack};
pub use values::function::{FunctionReference, Invocation, NativeFunction, WrappedMethod};
pub use values::key::PropertyKey;
pub use values::object::{Property, ProtoObject, ProtoObjectBuilder};
pub use values::string::ProtoString;
pub use values::symbols::Symbol;
pub use values::value::Value;
