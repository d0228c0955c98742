//! Engine-originated error kinds.
//!
//! Terminal operations return [`anyhow::Result`]; failures raised by the engine
//! itself are wrapped [`StreamError`] values, so callers can recover the kind
//! with `err.downcast_ref::<StreamError>()`. Errors raised by caller-supplied
//! closures (see [`Stream::try_map`](crate::Stream::try_map)) are passed through
//! untouched.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// A value was requested from an empty stream.
    #[error("no value present: the stream produced no elements")]
    EmptyAccess,

    /// An erased element did not carry the type the stage was built for.
    #[error("type mismatch in {stage}: expected `{expected}`")]
    TypeMismatch {
        stage: &'static str,
        expected: &'static str,
    },

    /// A numeric range was declared with a zero step.
    #[error("invalid range: step must be non-zero")]
    InvalidRange,

    /// A stateful stage would have to drain an infinite source.
    #[error(
        "stage {index} ({stage}) buffers its whole input but reads from an infinite source \
         with no preceding limit"
    )]
    UnboundedStatefulStage { index: usize, stage: &'static str },
}
