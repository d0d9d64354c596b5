//! Thread-local call stack carrying super-bindings.
//!
//! Every function invocation pushes a [`Frame`]. Frames pushed for wrapped
//! methods carry the predecessor the method overrode; frames for any other
//! function carry none, so a plain method called from inside an override never
//! observes its caller's predecessor. Frames are released by [`FrameGuard`],
//! which truncates the stack back to the depth it was entered at on every exit
//! path, including unwinding.

use crate::result::{ExecutionError, InternalError, ProtoResult, Stack, StackTraceFrame};
use crate::values::key::PropertyKey;
use crate::values::object::ProtoObject;
use log::trace;
use std::cell::RefCell;

pub const DEFAULT_CALL_STACK_LIMIT: usize = 1024;

thread_local! {
    static CALL_STACK: RefCell<CallStack> = RefCell::new(CallStack::new());
}

#[derive(Clone)]
pub(crate) struct Frame {
    pub(crate) name: PropertyKey,
    pub(crate) predecessor: Option<ProtoObject>,
}

struct CallStack {
    frames: Vec<Frame>,
    limit: usize,
}

impl CallStack {
    fn new() -> CallStack {
        CallStack {
            frames: Vec::with_capacity(64),
            limit: DEFAULT_CALL_STACK_LIMIT,
        }
    }
}

/// Pops the frame it was created for (and anything left above it) on drop.
#[derive(Debug)]
pub(crate) struct FrameGuard {
    depth: usize,
}

impl FrameGuard {
    pub(crate) fn depth(&self) -> usize {
        self.depth
    }
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        let depth = self.depth;

        // try_with: the thread-local may already be gone during thread teardown
        let _ = CALL_STACK.try_with(|stack| {
            if let Ok(mut stack) = stack.try_borrow_mut() {
                trace!("leave frame {}", depth);
                stack.frames.truncate(depth);
            }
        });
    }
}

/// Pushes a frame for `name`, binding `predecessor` as its super method.
pub(crate) fn enter(name: PropertyKey, predecessor: Option<ProtoObject>) -> ProtoResult<FrameGuard> {
    CALL_STACK.with(|stack| {
        let mut stack = stack.borrow_mut();

        if stack.frames.len() >= stack.limit {
            return Err(ExecutionError::InternalError(InternalError::new_stackless(
                "Stack overflow",
            )));
        }

        let depth = stack.frames.len();
        trace!(
            "enter frame {} {} (super: {})",
            depth,
            name,
            predecessor.is_some()
        );

        stack.frames.push(Frame { name, predecessor });

        Ok(FrameGuard { depth })
    })
}

/// The frame at `depth`, if it is still on the stack.
pub(crate) fn frame_at(depth: usize) -> Option<Frame> {
    CALL_STACK.with(|stack| stack.borrow().frames.get(depth).cloned())
}

/// The super method bound for the frame at `depth`.
pub(crate) fn predecessor_at(depth: usize) -> Option<ProtoObject> {
    frame_at(depth).and_then(|frame| frame.predecessor)
}

/// Number of frames currently active on this thread.
#[must_use]
pub fn depth() -> usize {
    CALL_STACK.with(|stack| stack.borrow().frames.len())
}

/// Maximum number of nested calls before a call fails with a stack overflow.
pub fn set_limit(limit: usize) {
    CALL_STACK.with(|stack| stack.borrow_mut().limit = limit);
}

#[must_use]
pub fn limit() -> usize {
    CALL_STACK.with(|stack| stack.borrow().limit)
}

/// Snapshot of the active frames, innermost first.
pub(crate) fn snapshot() -> Stack {
    CALL_STACK.with(|stack| {
        let stack = stack.borrow();

        Stack {
            entries: stack
                .frames
                .iter()
                .enumerate()
                .rev()
                .map(|(depth, frame)| StackTraceFrame {
                    function: frame.name.to_string(),
                    depth,
                })
                .collect(),
        }
    })
}
