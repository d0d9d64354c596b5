use crate::values::function::FunctionReference;
use crate::values::object::{Property, ProtoObject};
use crate::values::value::Value;
use colored::Colorize;
use std::cmp::Ordering;
use std::fmt::{Formatter, Result, Write};

pub struct Renderer<'b, 'c> {
    max_depth: usize,
    current_depth: usize,
    pub(crate) representation: Representation,
    pub(crate) formatter: &'b mut Formatter<'c>,
}

impl<'b, 'c> Renderer<'b, 'c> {
    pub fn render(&mut self, object: &dyn DebugRepresentation) -> Result {
        match self.current_depth.cmp(&self.max_depth) {
            Ordering::Equal | Ordering::Greater => {
                let representation = self.representation;
                self.representation = Representation::Compact;
                let result = object.render(self);
                self.representation = representation;

                result
            }
            Ordering::Less => {
                self.current_depth += 1;

                let result = object.render(self);

                self.current_depth -= 1;

                result
            }
        }
    }

    pub(crate) fn compact(formatter: &'b mut Formatter<'c>) -> Self {
        Renderer {
            max_depth: 0,
            current_depth: 1,
            formatter,
            representation: Representation::Compact,
        }
    }

    pub(crate) fn debug(formatter: &'b mut Formatter<'c>, depth: usize) -> Self {
        Renderer {
            max_depth: depth,
            current_depth: 0,
            formatter,
            representation: Representation::Debug,
        }
    }

    #[inline]
    pub(crate) fn start_internal(&mut self, internal_type: &str) -> Result {
        self.formatter.write_fmt(format_args!(
            "{}{}{}",
            "[[".blue(),
            internal_type.blue(),
            "| ".blue()
        ))
    }

    #[inline]
    pub(crate) fn end_internal(&mut self) -> Result {
        self.formatter.write_fmt(format_args!("{}", "]]".blue()))
    }

    #[inline]
    pub(crate) fn internal_key(&mut self, key: &str) -> Result {
        self.formatter.write_fmt(format_args!("{}: ", key.blue()))
    }

    #[inline]
    pub(crate) fn literal(&mut self, value: &str) -> Result {
        self.formatter
            .write_fmt(format_args!("{}", value.bright_yellow()))
    }

    #[inline]
    pub(crate) fn string_literal(&mut self, value: &str) -> Result {
        self.formatter
            .write_fmt(format_args!("\"{}\"", value.bright_yellow()))
    }

    #[inline]
    pub(crate) fn function(&mut self, name: &str) -> Result {
        self.formatter.write_fmt(format_args!(
            "{}{}{}",
            "[Function: ".green(),
            name.green(),
            "]".green()
        ))
    }
}

#[derive(Copy, Clone, PartialEq)]
pub enum Representation {
    Compact,
    Debug,
}

pub trait DebugRepresentation {
    fn render(&self, renderer: &mut Renderer<'_, '_>) -> Result;
}

pub(crate) fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_owned()
    } else if value.is_infinite() {
        let sign = if value > 0.0 { "" } else { "-" };
        format!("{}Infinity", sign)
    } else if value.fract() == 0.0 && value.abs() < 1e21 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

impl DebugRepresentation for Value {
    fn render(&self, renderer: &mut Renderer<'_, '_>) -> Result {
        match (renderer.representation, self) {
            (_, Value::Object(object)) => object.render(renderer),
            (Representation::Compact, Value::String(str)) => {
                renderer.formatter.write_str(str.as_ref())
            }
            (Representation::Compact, Value::Symbol(symbol)) => {
                renderer.formatter.write_fmt(format_args!("{}", symbol))
            }
            (Representation::Compact, Value::Float(value)) => {
                renderer.formatter.write_str(&number_to_string(*value))
            }
            (Representation::Compact, Value::Boolean(value)) => {
                renderer.formatter.write_fmt(format_args!("{}", value))
            }
            (Representation::Compact, Value::Undefined) => {
                renderer.formatter.write_str("undefined")
            }
            (Representation::Compact, Value::Null) => renderer.formatter.write_str("null"),
            (Representation::Debug, Value::String(str)) => renderer.string_literal(str.as_ref()),
            (Representation::Debug, Value::Symbol(symbol)) => {
                renderer.formatter.write_fmt(format_args!("{:?}", symbol))
            }
            (Representation::Debug, Value::Float(value)) => {
                renderer.literal(&number_to_string(*value))
            }
            (Representation::Debug, Value::Boolean(value)) => {
                renderer.literal(if *value { "true" } else { "false" })
            }
            (Representation::Debug, Value::Undefined) => renderer.literal("undefined"),
            (Representation::Debug, Value::Null) => renderer.literal("null"),
        }
    }
}

impl DebugRepresentation for FunctionReference {
    fn render(&self, renderer: &mut Renderer<'_, '_>) -> Result {
        renderer.function(&self.name().to_string())?;

        if renderer.representation == Representation::Debug {
            if let FunctionReference::Wrapped(wrapped) = self {
                renderer.formatter.write_char(' ')?;
                renderer.start_internal("SUPER")?;
                renderer.render(wrapped.predecessor())?;
                renderer.end_internal()?;
            }
        }

        Ok(())
    }
}

impl DebugRepresentation for ProtoObject {
    fn render(&self, renderer: &mut Renderer<'_, '_>) -> Result {
        if let Some(callable) = self.callable() {
            callable.render(renderer)?;

            if renderer.representation == Representation::Compact || self.own_keys().is_empty() {
                return Ok(());
            }

            renderer.formatter.write_char(' ')?;
        } else if renderer.representation == Representation::Compact {
            return renderer.formatter.write_str("[object Object]");
        }

        renderer.formatter.write_char('{')?;

        for key in self.own_keys() {
            renderer.formatter.write_fmt(format_args!("{}: ", key))?;

            match self.get_own_property(&key) {
                Some(Property::DataDescriptor { value, .. }) => renderer.render(&value)?,
                Some(Property::AccessorDescriptor { .. }) => renderer.literal("accessor")?,
                None => {}
            }

            renderer.formatter.write_str(", ")?;
        }

        if let Some(prototype) = self.prototype() {
            renderer.internal_key("[[Prototype]]")?;
            renderer.render(&prototype)?;
        }

        renderer.formatter.write_char('}')?;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::values::object::ProtoObject;
    use crate::values::value::Value;

    #[test]
    fn compact_rendering_hides_object_contents() {
        let object = ProtoObject::builder().with_property("name", "Bo").build();
        let function = ProtoObject::function("greet", |_| Ok(Value::Undefined));

        assert_eq!(Value::from(object).to_string(), "[object Object]");
        assert!(Value::from(function).to_string().contains("greet"));
    }

    #[test]
    fn function_references_render_their_name() {
        let function = ProtoObject::function("greet", |_| Ok(Value::Undefined));

        let rendered = format!("{:?}", function.callable());

        assert!(rendered.starts_with("Some("));
        assert!(rendered.contains("greet"));
    }

    #[test]
    fn debug_rendering_is_depth_limited() {
        let object = ProtoObject::new();
        object.set("self", &object).unwrap();

        let rendered = format!("{:?}", Value::from(&object));

        assert!(rendered.contains("self"));
        assert!(rendered.contains("[object Object]"));
    }
}
