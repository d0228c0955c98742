//! Type tags and the erased element carried between stages.
//!
//! A pipeline chains stages whose input and output types differ, so the
//! chain itself stores values as [`Element`]s and each typed closure downcasts
//! on the way in. [`Stream<T>`](crate::Stream) keeps the static type, which
//! means a failed downcast is an internal invariant violation; it is still
//! reported as [`StreamError::TypeMismatch`] rather than a panic.

use crate::error::StreamError;
use std::any::{Any, TypeId, type_name};

/// A single type-erased value flowing through a pipeline.
pub type Element = Box<dyn Any>;

/// A lightweight runtime type tag for debugging and error reporting.
///
/// ```
/// use ironstream::type_token::TypeTag;
/// let tag = TypeTag::of::<u32>();
/// assert_eq!(tag.name, "u32");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeTag {
    /// Stable Rust type identifier.
    pub id: TypeId,
    /// Human-readable type name (best-effort).
    pub name: &'static str,
}

impl TypeTag {
    /// Construct a tag for `T`.
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }
}

/// Box a typed value as an [`Element`].
pub(crate) fn erase<T: 'static>(value: T) -> Element {
    Box::new(value)
}

/// Recover a `T` from an owned [`Element`].
pub(crate) fn unerase<T: 'static>(e: Element, stage: &'static str) -> Result<T, StreamError> {
    e.downcast::<T>()
        .map(|b| *b)
        .map_err(|_| StreamError::TypeMismatch {
            stage,
            expected: TypeTag::of::<T>().name,
        })
}

/// Borrow a `T` out of an [`Element`].
pub(crate) fn unerase_ref<'a, T: 'static>(
    e: &'a Element,
    stage: &'static str,
) -> Result<&'a T, StreamError> {
    e.downcast_ref::<T>().ok_or(StreamError::TypeMismatch {
        stage,
        expected: TypeTag::of::<T>().name,
    })
}
