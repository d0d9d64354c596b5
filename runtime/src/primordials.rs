use crate::builtins::proto;
use crate::call_stack::{self, DEFAULT_CALL_STACK_LIMIT};
use crate::instantiator;
use crate::result::ProtoResult;
use crate::values::object::ProtoObject;
use crate::values::value::Value;
use std::borrow::Cow;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
pub struct RealmOptions {
    /// Method run by `create` when no alias is set.
    pub initializer: Cow<'static, str>,
    /// Property naming an alternative initializer.
    pub alias: Cow<'static, str>,
    pub call_stack_limit: usize,
}

pub const DEFAULT_OPTIONS: RealmOptions = RealmOptions {
    initializer: Cow::Borrowed("init"),
    alias: Cow::Borrowed("__init"),
    call_stack_limit: DEFAULT_CALL_STACK_LIMIT,
};

impl RealmOptions {
    #[must_use]
    pub fn with_initializer(mut self, initializer: impl Into<Cow<'static, str>>) -> Self {
        self.initializer = initializer.into();
        self
    }

    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<Cow<'static, str>>) -> Self {
        self.alias = alias.into();
        self
    }

    #[must_use]
    pub fn with_call_stack_limit(mut self, limit: usize) -> Self {
        self.call_stack_limit = limit;
        self
    }
}

impl Default for RealmOptions {
    fn default() -> Self {
        DEFAULT_OPTIONS
    }
}

/// Owns the root prototype every composed object descends from.
pub struct Realm {
    proto: ProtoObject,
    options: Rc<RealmOptions>,
}

impl Default for Realm {
    fn default() -> Self {
        Realm::new()
    }
}

impl Realm {
    #[must_use]
    pub fn new() -> Realm {
        Realm::with_options(DEFAULT_OPTIONS)
    }

    /// Builds a realm and applies its call stack limit to the current thread.
    ///
    /// The limit is a property of the thread, not of the realm: every realm on
    /// this thread shares the limit of the realm built most recently. Use
    /// [`call_stack::set_limit`] to change it afterwards.
    #[must_use]
    pub fn with_options(options: RealmOptions) -> Realm {
        call_stack::set_limit(options.call_stack_limit);

        let options = Rc::new(options);
        let proto = proto::bind(&options);

        Realm { proto, options }
    }

    /// The root prototype exposing `extend`, `mixin`, `create`, `proxy` and
    /// `isPrototypeOf`.
    #[must_use]
    pub fn proto(&self) -> &ProtoObject {
        &self.proto
    }

    #[must_use]
    pub fn options(&self) -> &RealmOptions {
        &self.options
    }

    /// Instantiates `receiver` using this realm's initializer names, whether
    /// or not `receiver` descends from the root prototype.
    pub fn create_from(&self, receiver: &ProtoObject, args: &[Value]) -> ProtoResult<ProtoObject> {
        instantiator::create(receiver, args, &self.options)
    }
}

#[cfg(test)]
mod test {
    use super::{Realm, RealmOptions, DEFAULT_OPTIONS};
    use crate::call_stack;
    use crate::values::object::ProtoObject;
    use crate::values::value::Value;

    #[test]
    fn proto_methods_are_not_enumerable() {
        let realm = Realm::new();

        assert!(realm.proto().keys().is_empty());
        for name in ["extend", "mixin", "create", "proxy", "isPrototypeOf"] {
            assert!(realm.proto().get(name).unwrap().is_callable(), "{}", name);
        }
    }

    #[test]
    fn options_configure_the_realm() {
        std::thread::spawn(|| {
            let options = RealmOptions::default()
                .with_initializer("setup")
                .with_alias("__setup")
                .with_call_stack_limit(16);
            let realm = Realm::with_options(options);

            assert_eq!(realm.options().initializer, "setup");
            assert_eq!(realm.options().alias, "__setup");
            assert_eq!(call_stack::limit(), 16);
            assert_ne!(realm.options(), &DEFAULT_OPTIONS);
        })
        .join()
        .unwrap();
    }

    #[test]
    fn create_from_uses_the_realm_initializer() {
        let realm = Realm::with_options(RealmOptions::default().with_initializer("setup"));
        let receiver = ProtoObject::builder()
            .with_method("setup", |invocation| {
                invocation.this_object()?.set("ready", true)?;
                Ok(Value::Undefined)
            })
            .build();

        let instance = realm.create_from(&receiver, &[]).unwrap();

        assert_eq!(instance.get("ready").unwrap(), Value::from(true));
    }

    #[test]
    fn typed_and_native_create_agree() {
        let realm = Realm::with_options(RealmOptions::default().with_initializer("setup"));
        let obj = realm
            .proto()
            .extend(&[ProtoObject::builder()
                .with_method("setup", |invocation| {
                    invocation.this_object()?.set("ready", true)?;
                    Ok(Value::Undefined)
                })
                .build()])
            .unwrap();

        let typed = obj.create(&[]).unwrap();
        let native = obj.call_method("create", &[]).unwrap();

        assert_eq!(typed.get("ready").unwrap(), Value::from(true));
        assert_eq!(
            native.as_object().unwrap().get("ready").unwrap(),
            Value::from(true)
        );
        assert!(obj.is_prototype_of(&typed));
    }

    #[test]
    fn the_latest_realm_sets_the_thread_limit() {
        std::thread::spawn(|| {
            let first = Realm::with_options(RealmOptions::default().with_call_stack_limit(8));
            assert_eq!(call_stack::limit(), 8);

            let _second = Realm::with_options(RealmOptions::default().with_call_stack_limit(64));

            assert_eq!(first.options().call_stack_limit, 8);
            assert_eq!(call_stack::limit(), 64);
        })
        .join()
        .unwrap();
    }
}
