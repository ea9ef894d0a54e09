//! Error values produced by tasks.
//!
//! Every fallible computation in Tessera reports its outcome through
//! [`Result<T>`], which is the standard [`std::result::Result`] with
//! [`Error`] as the error type. All the usual combinators (`map`,
//! `and_then`, `or_else`, `unwrap_or`, ...) apply unchanged.

use crate::task::TaskId;

use std::any::Any;
use std::fmt::Display;
use std::sync::Arc;

/// Result type returned by fallible task operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An error produced by a task or by the caller's own logic.
///
/// `Error` is cheap to clone so that a single outcome can be handed to
/// several waiters (see [`SharedHandle`](crate::task::SharedHandle)).
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A panic was intercepted while running a panicable task.
    #[error("panic recover: {message}")]
    Panicked {
        /// Text of the original panic.
        message: String,
    },

    /// The task finished without delivering a value.
    ///
    /// This happens when the body of a plain task panics: the worker
    /// survives, but the handle never receives anything.
    #[error("task {id} terminated without producing a value")]
    Abandoned {
        /// Identifier of the task that was abandoned.
        id: TaskId,
    },

    /// A logical error described by a message.
    #[error("{0}")]
    Message(String),

    /// Any other error raised by user code.
    #[error(transparent)]
    Other(Arc<dyn std::error::Error + Send + Sync + 'static>),
}

impl Error {
    /// Creates an error from a displayable message.
    pub fn msg(message: impl Display) -> Self {
        Self::Message(message.to_string())
    }

    /// Wraps an arbitrary error value.
    pub fn new<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Other(Arc::new(error))
    }

    /// Converts a panic payload into an [`Error::Panicked`].
    ///
    /// Payloads raised by `panic!` carry either a `&'static str` or a
    /// `String`. Anything else is reported as `Box<dyn Any>`.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<&'static str>() {
            Ok(message) => (*message).to_owned(),
            Err(payload) => match payload.downcast::<String>() {
                Ok(message) => *message,
                Err(_) => "Box<dyn Any>".to_owned(),
            },
        };

        Self::Panicked { message }
    }

    /// Returns `true` if this error comes from an intercepted panic.
    pub fn is_panic(&self) -> bool {
        matches!(self, Self::Panicked { .. })
    }

    /// Returns `true` if the producing task never delivered a value.
    pub fn is_abandoned(&self) -> bool {
        matches!(self, Self::Abandoned { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io;
    use std::panic::{self, UnwindSafe};

    fn payload_of(f: impl FnOnce() + UnwindSafe) -> Box<dyn Any + Send> {
        panic::catch_unwind(f).unwrap_err()
    }

    #[test]
    fn panic_with_str_payload() {
        let payload = payload_of(|| panic!("lhs is 1"));
        let err = Error::from_panic(payload);

        assert!(err.is_panic());
        assert_eq!(err.to_string(), "panic recover: lhs is 1");
    }

    #[test]
    fn panic_with_formatted_payload() {
        let value = 7;
        let payload = payload_of(move || panic!("bad value {value}"));

        assert_eq!(
            Error::from_panic(payload).to_string(),
            "panic recover: bad value 7"
        );
    }

    #[test]
    fn panic_with_opaque_payload() {
        let payload = payload_of(|| panic::panic_any(42_u8));

        assert_eq!(
            Error::from_panic(payload).to_string(),
            "panic recover: Box<dyn Any>"
        );
    }

    #[test]
    fn wrapped_errors_display_transparently() {
        let err = Error::new(io::Error::other("disk on fire"));

        assert_eq!(err.to_string(), "disk on fire");
        assert!(!err.is_panic());
        assert!(!err.is_abandoned());
    }

    #[test]
    fn message_errors_clone() {
        let err = Error::msg("nope");
        let copy = err.clone();

        assert_eq!(err.to_string(), copy.to_string());
    }
}
