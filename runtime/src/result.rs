use crate::values::value::Value;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub struct Stack {
    pub(crate) entries: Vec<StackTraceFrame>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StackTraceFrame {
    pub(crate) function: String,
    pub(crate) depth: usize,
}

impl Stack {
    #[must_use]
    pub fn functions(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|entry| entry.function.as_str())
            .collect()
    }
}

impl Display for Stack {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for entry in &self.entries {
            f.write_fmt(format_args!("{} ({})\n", entry.function, entry.depth))?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum ExecutionError {
    /// An error value raised by a method body.
    Thrown(Value, Option<Stack>),
    /// `_super` was invoked from a method that did not override anything.
    NoSuperMethod { name: String },
    /// Something other than an object was passed where a definition, base or
    /// target object was expected.
    InvalidDefinition { position: usize, found: &'static str },
    TypeError(String),
    InternalError(InternalError),
}

#[derive(Debug, Clone)]
pub struct InternalError {
    message: String,
    stack: Option<Stack>,
}

impl InternalError {
    pub fn new(message: impl Into<String>, stack: impl Into<Stack>) -> Self {
        InternalError {
            message: message.into(),
            stack: Some(stack.into()),
        }
    }

    pub fn new_stackless(message: impl Into<String>) -> Self {
        InternalError {
            message: message.into(),
            stack: None,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl ExecutionError {
    /// Raises an arbitrary value as an error, the way a method body would `throw`.
    pub fn thrown(value: impl Into<Value>) -> Self {
        ExecutionError::Thrown(value.into(), None)
    }

    pub(crate) fn fill_stack_trace(self, stack_trace: impl Into<Stack>) -> Self {
        match self {
            ExecutionError::Thrown(err, None) => {
                ExecutionError::Thrown(err, Some(stack_trace.into()))
            }
            ExecutionError::InternalError(InternalError {
                message,
                stack: Option::None,
            }) => ExecutionError::InternalError(InternalError {
                message,
                stack: Some(stack_trace.into()),
            }),
            other => other,
        }
    }

    #[must_use]
    pub fn stack(&self) -> Option<&Stack> {
        match self {
            ExecutionError::Thrown(_, stack) => stack.as_ref(),
            ExecutionError::InternalError(err) => err.stack.as_ref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn render(self) -> anyhow::Error {
        let stack = self.stack().cloned();
        let rendered_error = anyhow::Error::msg(self.to_string());

        if let Some(stack) = stack {
            return rendered_error.context(stack);
        }

        rendered_error
    }
}

impl Display for ExecutionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionError::Thrown(value, _) => f.write_fmt(format_args!("Uncaught {}", value)),
            ExecutionError::NoSuperMethod { name } => f.write_fmt(format_args!(
                "NoSuperMethod: {} does not override a method and has no _super",
                name
            )),
            ExecutionError::InvalidDefinition { position, found } => f.write_fmt(format_args!(
                "InvalidDefinition: argument {} must be an object but was {}",
                position, found
            )),
            ExecutionError::TypeError(message) => {
                f.write_fmt(format_args!("TypeError: {}", message))
            }
            ExecutionError::InternalError(err) => {
                f.write_fmt(format_args!("InternalError: {}", err.message))
            }
        }
    }
}

impl From<InternalError> for ExecutionError {
    fn from(err: InternalError) -> Self {
        ExecutionError::InternalError(err)
    }
}

impl From<Value> for ExecutionError {
    fn from(err: Value) -> Self {
        ExecutionError::Thrown(err, None)
    }
}

impl From<ExecutionError> for anyhow::Error {
    fn from(err: ExecutionError) -> Self {
        err.render()
    }
}

impl From<InternalError> for anyhow::Error {
    fn from(err: InternalError) -> Self {
        anyhow::Error::msg(err.message)
    }
}

pub type ProtoResult<T = Value> = std::result::Result<T, ExecutionError>;

#[cfg(test)]
mod test {
    use super::{ExecutionError, InternalError, Stack, StackTraceFrame};

    fn stack() -> Stack {
        Stack {
            entries: vec![
                StackTraceFrame {
                    function: "greet".to_owned(),
                    depth: 1,
                },
                StackTraceFrame {
                    function: "init".to_owned(),
                    depth: 0,
                },
            ],
        }
    }

    #[test]
    fn stack_is_filled_once() {
        let error = ExecutionError::thrown("boom").fill_stack_trace(stack());
        let error = error.fill_stack_trace(Stack { entries: vec![] });

        assert_eq!(error.stack().map(Stack::functions), Some(vec!["greet", "init"]));
    }

    #[test]
    fn type_errors_carry_no_stack() {
        let error = ExecutionError::TypeError("nope".to_owned()).fill_stack_trace(stack());

        assert!(error.stack().is_none());
        assert_eq!(error.to_string(), "TypeError: nope");
    }

    #[test]
    fn renders_into_anyhow_with_stack_context() {
        let error: anyhow::Error =
            ExecutionError::from(InternalError::new("Stack overflow", stack())).into();

        assert_eq!(error.to_string(), "greet (1)\ninit (0)\n");
        assert_eq!(error.root_cause().to_string(), "InternalError: Stack overflow");
    }
}
