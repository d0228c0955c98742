//! Debug taps that print elements to stderr as they are pulled.
//!
//! Taps are ordinary `peek` stages, so they only print what a terminal
//! operation actually pulls through that point.

use crate::Stream;
use std::fmt::Debug;

/// Debugging methods for [`Stream`].
pub trait StreamDebugExt<T> {
    /// Print every element passing this point, tagged with `label`.
    ///
    /// ```
    /// use ironstream::*;
    /// use ironstream::testing::StreamDebugExt;
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let out = Stream::of([3, 1, 2])
    ///     .debug_inspect("source")
    ///     .sorted()
    ///     .debug_inspect("sorted")
    ///     .to_vec()?;
    /// assert_eq!(out, vec![1, 2, 3]);
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    fn debug_inspect(self, label: &str) -> Self;

    /// Print every element and also hand it to `inspector`.
    #[must_use]
    fn debug_inspect_with<F>(self, label: &str, inspector: F) -> Self
    where
        F: FnMut(&T) + 'static;

    /// Print only the first `n` elements passing this point.
    #[must_use]
    fn debug_sample(self, label: &str, n: usize) -> Self;
}

impl<T: Debug + 'static> StreamDebugExt<T> for Stream<T> {
    fn debug_inspect(self, label: &str) -> Self {
        self.debug_sample(label, usize::MAX)
    }

    fn debug_inspect_with<F>(self, label: &str, mut inspector: F) -> Self
    where
        F: FnMut(&T) + 'static,
    {
        let label = label.to_string();
        let mut seen = 0usize;
        self.peek(move |x: &T| {
            eprintln!("[Debug: {label}] [{seen}]: {x:?}");
            seen += 1;
            inspector(x);
        })
    }

    fn debug_sample(self, label: &str, n: usize) -> Self {
        let label = label.to_string();
        let mut seen = 0usize;
        self.peek(move |x: &T| {
            if seen < n {
                eprintln!("[Debug: {label}] [{seen}]: {x:?}");
            } else if seen == n {
                eprintln!("[Debug: {label}] ... (further elements not shown)");
            }
            seen = seen.saturating_add(1);
        })
    }
}
